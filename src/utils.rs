use fnv::FnvHasher;
use std::{
    collections::HashMap,
    hash::{BuildHasherDefault, Hash}
};

pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Construct a hash map with the specified capacity, hashing with FNV.
/// Keys here are grid coordinates and set ids, short integer keys where FNV beats SipHash.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::<K, V, _>::with_capacity_and_hasher(capacity, fnv)
}
