//! ByteVec: growable array of fixed-stride elements.

use crate::error::{check_stride, Error, Result};
use crate::fatal::OrAbort;
use crate::raw_buf::RawBuf;
use core::cmp::Ordering;
use core::slice::{ChunksExact, ChunksExactMut};

#[derive(Clone, Debug)]
pub struct ByteVec {
    buf: RawBuf,
}

impl ByteVec {
    pub fn try_new(stride: usize) -> Result<Self> {
        Self::try_with_capacity(stride, 1)
    }

    /// Vector with room for one element; grows by doubling.
    pub fn new(stride: usize) -> Self {
        Self::try_new(stride).or_abort("bytevec_create")
    }

    pub fn try_with_capacity(stride: usize, cap: usize) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::with_capacity(stride, cap)?,
        })
    }

    pub fn with_capacity(stride: usize, cap: usize) -> Self {
        Self::try_with_capacity(stride, cap).or_abort("bytevec_create")
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn stride(&self) -> usize {
        self.buf.stride()
    }

    pub fn is_freed(&self) -> bool {
        self.buf.is_released()
    }

    fn live(&self) -> Result<()> {
        if self.is_freed() {
            Err(Error::UseAfterFree)
        } else {
            Ok(())
        }
    }

    pub fn try_push(&mut self, elem: &[u8]) -> Result<()> {
        self.buf.push(elem).map(drop)
    }

    pub fn push(&mut self, elem: &[u8]) {
        self.try_push(elem).or_abort("bytevec_push")
    }

    /// Element `i`, or `None` past the end.
    pub fn try_get(&self, i: usize) -> Result<Option<&[u8]>> {
        self.live()?;
        Ok(self.buf.get(i))
    }

    pub fn get(&self, i: usize) -> Option<&[u8]> {
        self.try_get(i).or_abort("bytevec_get")
    }

    pub fn try_at(&self, i: usize) -> Result<&[u8]> {
        self.buf.try_get(i)
    }

    pub fn at(&self, i: usize) -> &[u8] {
        self.try_at(i).or_abort("bytevec_at")
    }

    pub fn at_mut(&mut self, i: usize) -> &mut [u8] {
        self.buf.try_get_mut(i).or_abort("bytevec_at")
    }

    pub fn try_remove_at(&mut self, i: usize) -> Result<()> {
        self.buf.remove_at(i)
    }

    pub fn remove_at(&mut self, i: usize) {
        self.try_remove_at(i).or_abort("bytevec_remove_at")
    }

    /// Remove every element equal to `elem`; returns how many were removed.
    pub fn try_remove(&mut self, elem: &[u8]) -> Result<usize> {
        self.live()?;
        check_stride(self.stride(), elem)?;
        let before = self.len();
        self.buf.retain(|e| e != elem)?;
        Ok(before - self.len())
    }

    pub fn remove(&mut self, elem: &[u8]) -> usize {
        self.try_remove(elem).or_abort("bytevec_remove")
    }

    pub fn try_position(&self, elem: &[u8]) -> Result<Option<usize>> {
        self.live()?;
        check_stride(self.stride(), elem)?;
        Ok(self.buf.iter().position(|e| e == elem))
    }

    pub fn position(&self, elem: &[u8]) -> Option<usize> {
        self.try_position(elem).or_abort("bytevec_contains")
    }

    pub fn contains(&self, elem: &[u8]) -> bool {
        self.position(elem).is_some()
    }

    pub fn clear(&mut self) {
        self.live().or_abort("bytevec_clear");
        self.buf.clear();
    }

    pub fn try_free(&mut self) -> Result<()> {
        self.buf.release()
    }

    pub fn free(&mut self) {
        self.try_free().or_abort("bytevec_free")
    }

    /// Apply `f` to every element and return the transformed vector.
    pub fn map<F>(mut self, mut f: F) -> ByteVec
    where
        F: FnMut(&mut [u8]),
    {
        self.live().or_abort("bytevec_map");
        for e in self.buf.iter_mut() {
            f(e);
        }
        self
    }

    /// Stable sort with a comparator over element bytes.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.live().or_abort("bytevec_sort");
        let mut rows: Vec<Vec<u8>> = self.buf.iter().map(<[u8]>::to_vec).collect();
        rows.sort_by(|a, b| cmp(a.as_slice(), b.as_slice()));
        for (dst, src) in self.buf.iter_mut().zip(&rows) {
            dst.copy_from_slice(src);
        }
    }

    pub fn try_reverse(&mut self) -> Result<()> {
        self.live()?;
        let n = self.len();
        for i in 0..n / 2 {
            self.buf.swap(i, n - 1 - i)?;
        }
        Ok(())
    }

    pub fn reverse(&mut self) {
        self.try_reverse().or_abort("bytevec_reverse")
    }

    pub fn iter(&self) -> ChunksExact<'_, u8> {
        self.live().or_abort("bytevec_iter");
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, u8> {
        self.live().or_abort("bytevec_iter");
        self.buf.iter_mut()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.live().or_abort("bytevec_as_bytes");
        self.buf.as_bytes()
    }
}
