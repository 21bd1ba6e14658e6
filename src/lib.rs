//! stride-collections: type-erased containers over fixed-stride byte
//! elements, centred on a separately-chained hash map.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: containers whose element size is a runtime parameter. Callers
//!   hand in byte slices of exactly `stride` bytes and get byte slices back.
//! - Layers:
//!   - RawBuf: contiguous strided storage with doubling growth. Every
//!     container below stores its elements in one.
//!   - UMap<H>: hash map from `key_stride`-byte keys to
//!     `value_stride`-byte values. Chains of arena nodes hang off a table
//!     of heads; the table doubles whenever the load factor exceeds the
//!     configured maximum.
//!   - PodMap<K, V, H>: typed facade over UMap for `bytemuck::Pod` keys
//!     and values.
//!   - ByteVec, ByteStr, Stack, Queue, BytePair: the sequence containers.
//!
//! Constraints
//! - Single-threaded; no interior synchronization.
//! - Every stored element is exactly one stride long. Mismatched slices
//!   are rejected with `Error::StrideMismatch`.
//! - Keys compare by their raw bytes. The hash function is supplied by the
//!   caller through `KeyHasher` and runs once per key per operation; it is
//!   never re-run during rehash.
//! - No per-key removal from UMap. Entries live until the map is freed or
//!   dropped.
//!
//! Failure model
//! - Each operation has a `try_*` form returning `Result<_, Error>`.
//! - The plain form treats any error as a fatal misuse: it logs at
//!   `error` level and panics with `[PANIC: <op>]: <error>`.
//! - `free` tombstones a container. Later calls report
//!   `Error::UseAfterFree`, and a second `free` aborts.
//!
//! Notes and non-goals
//! - Chains are LIFO: a new key becomes the head of its chain, and
//!   iteration walks buckets in index order, each chain head first.
//! - Handles are generational arena keys. They stay valid across rehash and
//!   resolve to `None` after the map is freed.

mod byte_str;
mod byte_vec;
mod error;
mod fatal;
mod hasher;
mod pair;
mod pod_map;
mod queue;
mod raw_buf;
mod stack;
pub mod strided;
pub mod umap;
mod umap_proptest;

// Public surface
pub use byte_str::ByteStr;
pub use byte_vec::ByteVec;
pub use error::{Error, Result};
pub use hasher::{identity_hash, KeyHasher, RandomKeyHasher};
pub use pair::BytePair;
pub use pod_map::PodMap;
pub use queue::Queue;
pub use raw_buf::RawBuf;
pub use stack::Stack;
pub use strided::{all_of, any_of, none_of, Iota};
pub use umap::{Handle, UMap, UMapBuilder, UMapConfig};
