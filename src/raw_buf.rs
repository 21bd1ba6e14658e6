//! RawBuf: contiguous strided byte storage with doubling growth.
//!
//! Invariants
//! - `stride > 0` until released; a released buffer has `stride == 0`.
//! - `len <= cap` and `data.len() == cap * stride`.
//! - Element `i` occupies `data[i * stride..(i + 1) * stride]`.

use crate::error::{check_stride, Error, Result};
use core::ops::Range;
use core::slice::{ChunksExact, ChunksExactMut};

#[derive(Clone, Debug)]
pub struct RawBuf {
    data: Vec<u8>,
    stride: usize,
    len: usize,
    cap: usize,
}

impl RawBuf {
    /// Create a buffer holding up to `cap` elements before its first growth.
    /// A zero `cap` is treated as 1 so that doubling always makes progress.
    pub fn with_capacity(stride: usize, cap: usize) -> Result<Self> {
        if stride == 0 {
            return Err(Error::ZeroStride);
        }
        let cap = cap.max(1);
        Ok(Self {
            data: vec![0; stride * cap],
            stride,
            len: 0,
            cap,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.stride == 0
    }

    #[inline]
    fn live(&self) -> Result<()> {
        if self.is_released() {
            Err(Error::UseAfterFree)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn row(&self, i: usize) -> Range<usize> {
        i * self.stride..(i + 1) * self.stride
    }

    #[inline]
    fn in_bounds(&self, i: usize) -> Result<()> {
        self.live()?;
        if i < self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index: i,
                len: self.len,
            })
        }
    }

    fn grow(&mut self) {
        self.cap *= 2;
        self.data.resize(self.cap * self.stride, 0);
    }

    /// Append one element and return its index.
    pub fn push(&mut self, bytes: &[u8]) -> Result<usize> {
        self.live()?;
        check_stride(self.stride, bytes)?;
        self.push_with(|slot| slot.copy_from_slice(bytes))
    }

    /// Append one element whose bytes are written in place by `fill`.
    /// The slot handed to `fill` is one stride long and may still hold the
    /// bytes of a previously popped element.
    pub fn push_with<F>(&mut self, fill: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]),
    {
        self.live()?;
        if self.len >= self.cap {
            self.grow();
        }
        let idx = self.len;
        let row = self.row(idx);
        fill(&mut self.data[row]);
        self.len += 1;
        Ok(idx)
    }

    pub fn get(&self, i: usize) -> Option<&[u8]> {
        self.try_get(i).ok()
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut [u8]> {
        self.try_get_mut(i).ok()
    }

    pub fn try_get(&self, i: usize) -> Result<&[u8]> {
        self.in_bounds(i)?;
        Ok(&self.data[self.row(i)])
    }

    pub fn try_get_mut(&mut self, i: usize) -> Result<&mut [u8]> {
        self.in_bounds(i)?;
        let row = self.row(i);
        Ok(&mut self.data[row])
    }

    /// Overwrite element `i` with `bytes`.
    pub fn set(&mut self, i: usize, bytes: &[u8]) -> Result<()> {
        check_stride(self.stride, bytes)?;
        self.try_get_mut(i)?.copy_from_slice(bytes);
        Ok(())
    }

    /// Drop the last element. The returned bytes stay readable until the
    /// slot is overwritten by a later push.
    pub fn pop(&mut self) -> Result<&[u8]> {
        self.live()?;
        if self.len == 0 {
            return Err(Error::Empty);
        }
        self.len -= 1;
        Ok(&self.data[self.row(self.len)])
    }

    /// Remove element `i`, shifting the tail left by one stride.
    pub fn remove_at(&mut self, i: usize) -> Result<()> {
        self.in_bounds(i)?;
        let end = self.len * self.stride;
        let start = self.row(i).end;
        self.data.copy_within(start..end, i * self.stride);
        self.len -= 1;
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.in_bounds(a)?;
        self.in_bounds(b)?;
        if a == b {
            return Ok(());
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let stride = self.stride;
        let (head, tail) = self.data.split_at_mut(hi * stride);
        head[lo * stride..(lo + 1) * stride].swap_with_slice(&mut tail[..stride]);
        Ok(())
    }

    /// Keep only the elements for which `keep` returns true, preserving order.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.live()?;
        let mut write = 0;
        for read in 0..self.len {
            if keep(&self.data[self.row(read)]) {
                if write != read {
                    let src = self.row(read);
                    self.data.copy_within(src, write * self.stride);
                }
                write += 1;
            }
        }
        self.len = write;
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Live elements as one contiguous slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len * self.stride]
    }

    pub fn iter(&self) -> ChunksExact<'_, u8> {
        // A released buffer has no bytes; `max(1)` only keeps chunks_exact happy.
        self.data[..self.len * self.stride].chunks_exact(self.stride.max(1))
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, u8> {
        let stride = self.stride.max(1);
        let end = self.len * self.stride;
        self.data[..end].chunks_exact_mut(stride)
    }

    /// Release the storage. Afterwards every fallible operation reports
    /// `Error::UseAfterFree` and all sizes read as zero.
    pub fn release(&mut self) -> Result<()> {
        self.live()?;
        self.data = Vec::new();
        self.stride = 0;
        self.len = 0;
        self.cap = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_buf(vals: &[i32]) -> RawBuf {
        let mut b = RawBuf::with_capacity(4, 1).unwrap();
        for v in vals {
            b.push(&v.to_ne_bytes()).unwrap();
        }
        b
    }

    fn ints(b: &RawBuf) -> Vec<i32> {
        b.iter()
            .map(|c| i32::from_ne_bytes(c.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn zero_stride_rejected() {
        assert!(matches!(RawBuf::with_capacity(0, 4), Err(Error::ZeroStride)));
    }

    #[test]
    fn capacity_doubles_on_push() {
        let mut b = RawBuf::with_capacity(4, 0).unwrap();
        assert_eq!(b.capacity(), 1);
        let mut seen = Vec::new();
        for i in 0..9i32 {
            b.push(&i.to_ne_bytes()).unwrap();
            seen.push(b.capacity());
        }
        assert_eq!(seen, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(ints(&b), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn push_rejects_wrong_stride() {
        let mut b = RawBuf::with_capacity(4, 4).unwrap();
        match b.push(&[1, 2]) {
            Err(Error::StrideMismatch {
                expected: 4,
                found: 2,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(b.is_empty());
    }

    #[test]
    fn push_with_fills_slot_in_place() {
        let mut b = RawBuf::with_capacity(3, 1).unwrap();
        let idx = b.push_with(|slot| slot.copy_from_slice(b"abc")).unwrap();
        assert_eq!(idx, 0);
        let idx = b.push_with(|slot| slot[1] = b'x').unwrap();
        assert_eq!(idx, 1);
        assert_eq!(b.as_bytes(), b"abc\0x\0");
    }

    #[test]
    fn get_out_of_bounds() {
        let b = int_buf(&[1, 2]);
        assert!(b.get(2).is_none());
        assert!(matches!(
            b.try_get(5),
            Err(Error::IndexOutOfBounds { index: 5, len: 2 })
        ));
    }

    #[test]
    fn remove_at_shifts_tail() {
        let mut b = int_buf(&[0, 1, 2, 3, 4]);
        b.remove_at(1).unwrap();
        assert_eq!(ints(&b), vec![0, 2, 3, 4]);
        b.remove_at(3).unwrap();
        assert_eq!(ints(&b), vec![0, 2, 3]);
    }

    #[test]
    fn swap_and_set() {
        let mut b = int_buf(&[1, 2, 3]);
        b.swap(0, 2).unwrap();
        assert_eq!(ints(&b), vec![3, 2, 1]);
        b.swap(1, 1).unwrap();
        b.set(1, &9i32.to_ne_bytes()).unwrap();
        assert_eq!(ints(&b), vec![3, 9, 1]);
    }

    #[test]
    fn retain_keeps_order() {
        let mut b = int_buf(&[1, 2, 1, 1, 3, 1, 1]);
        b.retain(|c| c != 1i32.to_ne_bytes()).unwrap();
        assert_eq!(ints(&b), vec![2, 3]);
    }

    #[test]
    fn truncate_only_shrinks() {
        let mut b = int_buf(&[1, 2, 3, 4]);
        b.truncate(10);
        assert_eq!(ints(&b), vec![1, 2, 3, 4]);
        b.truncate(2);
        assert_eq!(ints(&b), vec![1, 2]);
        assert_eq!(b.capacity(), 4);
        b.push(&9i32.to_ne_bytes()).unwrap();
        assert_eq!(ints(&b), vec![1, 2, 9]);
    }

    #[test]
    fn pop_returns_last_then_empty() {
        let mut b = int_buf(&[5, 6]);
        assert_eq!(b.pop().unwrap(), 6i32.to_ne_bytes());
        assert_eq!(b.pop().unwrap(), 5i32.to_ne_bytes());
        assert!(matches!(b.pop(), Err(Error::Empty)));
    }

    #[test]
    fn release_tombstones_buffer() {
        let mut b = int_buf(&[1, 2, 3]);
        b.release().unwrap();
        assert!(b.is_released());
        assert_eq!((b.len(), b.capacity(), b.stride()), (0, 0, 0));
        assert_eq!(b.iter().count(), 0);
        assert!(matches!(b.push(&[0; 4]), Err(Error::UseAfterFree)));
        assert!(matches!(b.release(), Err(Error::UseAfterFree)));
    }
}
