//! UMap: byte-keyed hash map with separate chaining and load-factor rehash.
//!
//! Layout
//! - `buckets[i]` is the head of chain `i`; chains link nodes through
//!   `Node::next`.
//! - Nodes live in a generational arena; a node caches the hash of its key
//!   and names the row holding its `key ++ value` bytes in `entries`.
//! - New nodes become their chain's head, so chains list entries most
//!   recently linked first.
//!
//! Rehash allocates a head table of twice the capacity and relinks every
//! node using its cached hash. Node and entry storage is never copied and
//! the hash function is not called again for existing keys.

use crate::error::{check_stride, Error, Result};
use crate::fatal::OrAbort;
use crate::hasher::{KeyHasher, RandomKeyHasher};
use crate::raw_buf::RawBuf;
use core::fmt;
use slotmap::{new_key_type, SlotMap};

pub const DEFAULT_INITIAL_CAPACITY: usize = 10;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;
/// Smallest accepted `max_load_factor`; bounds growth to about
/// `len / MIN_MAX_LOAD_FACTOR` chains.
pub const MIN_MAX_LOAD_FACTOR: f64 = 0.01;

new_key_type! {
    struct NodeKey;
}

/// Stable name for one map entry. Survives rehash; resolves to `None` once
/// the map has been freed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(NodeKey);

impl Handle {
    pub fn key<'a, H>(&self, map: &'a UMap<H>) -> Option<&'a [u8]> {
        map.handle_key(*self)
    }

    pub fn value<'a, H>(&self, map: &'a UMap<H>) -> Option<&'a [u8]> {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, H>(&self, map: &'a mut UMap<H>) -> Option<&'a mut [u8]> {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Node {
    next: Option<NodeKey>,
    hash: u64,
    row: usize,
}

/// Table sizing policy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UMapConfig {
    /// Number of chains allocated at creation.
    pub initial_capacity: usize,
    /// Rehash once `len / capacity` exceeds this ratio.
    pub max_load_factor: f64,
}

impl Default for UMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl UMapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig("initial capacity must be non-zero"));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(Error::InvalidConfig(
                "max load factor must be finite and positive",
            ));
        }
        if self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(Error::InvalidConfig("max load factor below 0.01"));
        }
        Ok(())
    }
}

/// Consuming builder returned by [`UMap::builder`].
#[derive(Clone, Debug)]
pub struct UMapBuilder {
    key_stride: usize,
    value_stride: usize,
    config: UMapConfig,
}

impl UMapBuilder {
    pub fn new(key_stride: usize, value_stride: usize) -> Self {
        Self {
            key_stride,
            value_stride,
            config: UMapConfig::default(),
        }
    }

    pub fn strides(mut self, key_stride: usize, value_stride: usize) -> Self {
        self.key_stride = key_stride;
        self.value_stride = value_stride;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn max_load_factor(mut self, load_factor: f64) -> Self {
        self.config.max_load_factor = load_factor;
        self
    }

    pub fn config(mut self, config: UMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build<H: KeyHasher>(self, hasher: H) -> Result<UMap<H>> {
        if self.key_stride == 0 || self.value_stride == 0 {
            return Err(Error::ZeroStride);
        }
        self.config.validate()?;
        let cap = self.config.initial_capacity;
        let entries = RawBuf::with_capacity(self.key_stride + self.value_stride, cap)?;
        log::trace!(
            "created umap: key_stride={}, value_stride={}, capacity={}",
            self.key_stride,
            self.value_stride,
            cap
        );
        Ok(UMap {
            buckets: vec![None; cap],
            nodes: SlotMap::with_key(),
            entries,
            hasher,
            key_stride: self.key_stride,
            value_stride: self.value_stride,
            max_load_factor: self.config.max_load_factor,
        })
    }
}

pub struct UMap<H = RandomKeyHasher> {
    buckets: Vec<Option<NodeKey>>,
    nodes: SlotMap<NodeKey, Node>,
    entries: RawBuf,
    hasher: H,
    key_stride: usize,
    value_stride: usize,
    max_load_factor: f64,
}

impl UMap<RandomKeyHasher> {
    pub fn builder(key_stride: usize, value_stride: usize) -> UMapBuilder {
        UMapBuilder::new(key_stride, value_stride)
    }

    pub fn with_default_hasher(key_stride: usize, value_stride: usize) -> Self {
        Self::new(key_stride, value_stride, RandomKeyHasher::new())
    }
}

/// Iterator over `(key, value)` byte slices, bucket by bucket and in chain
/// order within a bucket.
pub struct Iter<'a, H> {
    map: &'a UMap<H>,
    bucket: usize,
    cur: Option<NodeKey>,
}

impl<'a, H> Iterator for Iter<'a, H> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        loop {
            if let Some(k) = self.cur {
                let node = map.nodes.get(k)?;
                self.cur = node.next;
                let row = map.entries.get(node.row)?;
                return Some(row.split_at(map.key_stride));
            }
            self.cur = *map.buckets.get(self.bucket)?;
            self.bucket += 1;
        }
    }
}

impl<'a, H> IntoIterator for &'a UMap<H> {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H> UMap<H> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of chains in the bucket table; zero once freed.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn key_stride(&self) -> usize {
        self.key_stride
    }

    pub fn value_stride(&self) -> usize {
        self.value_stride
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.len() as f64 / self.capacity() as f64
        }
    }

    pub fn is_freed(&self) -> bool {
        self.entries.is_released()
    }

    pub fn try_iter(&self) -> Result<Iter<'_, H>> {
        self.live()?;
        Ok(Iter {
            map: self,
            bucket: 0,
            cur: None,
        })
    }

    pub fn iter(&self) -> Iter<'_, H> {
        self.try_iter().or_abort("umap_iter")
    }

    #[inline]
    fn live(&self) -> Result<()> {
        if self.is_freed() {
            Err(Error::UseAfterFree)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn bucket_of(hash: u64, cap: usize) -> usize {
        (hash % cap as u64) as usize
    }

    fn value_of(&self, k: NodeKey) -> Option<&[u8]> {
        let node = self.nodes.get(k)?;
        self.entries.get(node.row).map(|row| &row[self.key_stride..])
    }

    fn value_of_mut(&mut self, k: NodeKey) -> Option<&mut [u8]> {
        let row = self.nodes.get(k)?.row;
        let ks = self.key_stride;
        self.entries.get_mut(row).map(|row| &mut row[ks..])
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&[u8]> {
        let node = self.nodes.get(h.0)?;
        self.entries.get(node.row).map(|row| &row[..self.key_stride])
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&[u8]> {
        self.value_of(h.0)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut [u8]> {
        self.value_of_mut(h.0)
    }

    /// Walk the chain for `hash` looking for an exact key match.
    fn find_node(&self, hash: u64, key: &[u8]) -> Option<NodeKey> {
        let mut cur = self.buckets[Self::bucket_of(hash, self.buckets.len())];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash
                && self
                    .entries
                    .get(node.row)
                    .map(|row| &row[..self.key_stride] == key)
                    .unwrap_or(false)
            {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    fn rehash(&mut self) {
        let old_cap = self.buckets.len();
        let new_cap = old_cap * 2;
        let mut table: Vec<Option<NodeKey>> = vec![None; new_cap];
        for head in core::mem::take(&mut self.buckets) {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let idx = Self::bucket_of(node.hash, new_cap);
                node.next = table[idx];
                table[idx] = Some(k);
            }
        }
        self.buckets = table;
        log::debug!(
            "rehashed umap: {} entries, capacity {} -> {}",
            self.len(),
            old_cap,
            new_cap
        );
    }

    /// Release every entry and the bucket table. The map is unusable
    /// afterwards; `len` and `capacity` read as zero.
    pub fn try_free(&mut self) -> Result<()> {
        self.live()?;
        log::trace!(
            "freeing umap: {} entries, capacity {}",
            self.len(),
            self.capacity()
        );
        self.nodes = SlotMap::with_key();
        self.buckets = Vec::new();
        self.key_stride = 0;
        self.value_stride = 0;
        self.entries.release()
    }

    pub fn free(&mut self) {
        self.try_free().or_abort("umap_free")
    }
}

impl<H: KeyHasher> UMap<H> {
    /// Map with the default sizing policy (10 chains, rehash above 0.5).
    pub fn try_new(key_stride: usize, value_stride: usize, hasher: H) -> Result<Self> {
        UMapBuilder::new(key_stride, value_stride).build(hasher)
    }

    pub fn new(key_stride: usize, value_stride: usize, hasher: H) -> Self {
        Self::try_new(key_stride, value_stride, hasher).or_abort("umap_create")
    }

    /// Copy `key` and `value` into the map. An existing entry for `key`
    /// has its value overwritten in place; otherwise a new entry becomes the
    /// head of its chain. Rehashes when the load factor is exceeded.
    pub fn try_insert(&mut self, key: &[u8], value: &[u8]) -> Result<Handle> {
        self.live()?;
        check_stride(self.key_stride, key)?;
        check_stride(self.value_stride, value)?;

        let hash = self.hasher.hash_key(key);
        let k = match self.find_node(hash, key) {
            Some(k) => {
                let row = self.nodes[k].row;
                let ks = self.key_stride;
                self.entries.try_get_mut(row)?[ks..].copy_from_slice(value);
                k
            }
            None => {
                let ks = self.key_stride;
                let row = self.entries.push_with(|slot| {
                    slot[..ks].copy_from_slice(key);
                    slot[ks..].copy_from_slice(value);
                })?;
                let idx = Self::bucket_of(hash, self.buckets.len());
                let k = self.nodes.insert(Node {
                    next: self.buckets[idx],
                    hash,
                    row,
                });
                self.buckets[idx] = Some(k);
                k
            }
        };

        while self.load_factor() > self.max_load_factor {
            self.rehash();
        }
        Ok(Handle(k))
    }

    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Handle {
        self.try_insert(key, value).or_abort("umap_insert")
    }

    pub fn try_find(&self, key: &[u8]) -> Result<Option<Handle>> {
        self.live()?;
        check_stride(self.key_stride, key)?;
        let hash = self.hasher.hash_key(key);
        Ok(self.find_node(hash, key).map(Handle))
    }

    pub fn find(&self, key: &[u8]) -> Option<Handle> {
        self.try_find(key).or_abort("umap_find")
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    pub fn try_lookup(&self, key: &[u8]) -> Result<Option<&[u8]>> {
        Ok(self.try_find(key)?.and_then(|h| self.value_of(h.0)))
    }

    /// Value bytes stored for `key`, or `None` when the key is absent.
    pub fn lookup(&self, key: &[u8]) -> Option<&[u8]> {
        self.try_lookup(key).or_abort("umap_get")
    }

    pub fn try_lookup_mut(&mut self, key: &[u8]) -> Result<Option<&mut [u8]>> {
        match self.try_find(key)? {
            Some(h) => Ok(self.value_of_mut(h.0)),
            None => Ok(None),
        }
    }

    pub fn lookup_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        self.try_lookup_mut(key).or_abort("umap_get")
    }
}

impl<H> fmt::Debug for UMap<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UMap")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("key_stride", &self.key_stride)
            .field("value_stride", &self.value_stride)
            .finish()
    }
}
