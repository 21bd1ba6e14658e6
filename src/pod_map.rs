//! PodMap: statically typed view over [`UMap`] for plain-old-data types.
//!
//! Keys and values are stored as their raw bytes, so key equality is byte
//! equality. Values are read back with an unaligned copy because entry rows
//! carry no alignment guarantee.

use crate::error::Result;
use crate::fatal::OrAbort;
use crate::hasher::{KeyHasher, RandomKeyHasher};
use crate::umap::{Handle, UMap, UMapBuilder};
use bytemuck::Pod;
use core::marker::PhantomData;
use core::mem::size_of;

pub struct PodMap<K, V, H = RandomKeyHasher> {
    raw: UMap<H>,
    _kv: PhantomData<(K, V)>,
}

impl<K: Pod, V: Pod> PodMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomKeyHasher::new())
    }
}

impl<K: Pod, V: Pod> Default for PodMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Pod, V: Pod, H: KeyHasher> PodMap<K, V, H> {
    pub fn try_with_hasher(hasher: H) -> Result<Self> {
        Self::try_from_builder(UMapBuilder::new(size_of::<K>(), size_of::<V>()), hasher)
    }

    pub fn with_hasher(hasher: H) -> Self {
        Self::try_with_hasher(hasher).or_abort("podmap_create")
    }

    /// Build with a custom sizing policy. The builder's strides are
    /// replaced by `size_of::<K>()` and `size_of::<V>()`.
    pub fn try_from_builder(builder: UMapBuilder, hasher: H) -> Result<Self> {
        let raw = builder
            .strides(size_of::<K>(), size_of::<V>())
            .build(hasher)?;
        Ok(Self {
            raw,
            _kv: PhantomData,
        })
    }

    pub fn insert(&mut self, key: &K, value: &V) -> Handle {
        self.raw
            .try_insert(bytemuck::bytes_of(key), bytemuck::bytes_of(value))
            .or_abort("podmap_insert")
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.raw
            .try_lookup(bytemuck::bytes_of(key))
            .or_abort("podmap_get")
            .map(bytemuck::pod_read_unaligned)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(bytemuck::bytes_of(key))
    }

    /// Apply `f` to the value stored for `key`, writing the result back.
    /// Returns false when the key is absent.
    pub fn update<F>(&mut self, key: &K, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        match self.raw.lookup_mut(bytemuck::bytes_of(key)) {
            Some(bytes) => {
                let mut v: V = bytemuck::pod_read_unaligned(bytes);
                f(&mut v);
                bytes.copy_from_slice(bytemuck::bytes_of(&v));
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.raw.iter().map(|(k, v)| {
            (
                bytemuck::pod_read_unaligned(k),
                bytemuck::pod_read_unaligned(v),
            )
        })
    }
}

impl<K, V, H> PodMap<K, V, H> {
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn free(&mut self) {
        self.raw.free()
    }

    /// The underlying byte-level map.
    pub fn as_raw(&self) -> &UMap<H> {
        &self.raw
    }
}
