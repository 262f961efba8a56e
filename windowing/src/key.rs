#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

/// Bound for [`crate::BoundedCache`] keys: `Hash + Eq` with `std`, `Ord` without.
#[cfg(feature = "std")]
pub trait CacheKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> CacheKey for K {}

/// Bound for [`crate::BoundedCache`] keys: `Hash + Eq` with `std`, `Ord` without.
#[cfg(not(feature = "std"))]
pub trait CacheKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> CacheKey for K {}
