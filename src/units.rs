#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowLength(pub u32);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnLength(pub u32);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub u32);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnIndex(pub u32);

/// Random weight given to a cell by the cost based Prim's generator, in `0..Cost::UPPER_BOUND`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct Cost(pub u8);

impl Cost {
    pub const UPPER_BOUND: u8 = 100;
}
