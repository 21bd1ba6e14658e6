//! Predicates over strided byte slices, plus the `Iota` counter.

use crate::error::{Error, Result};

fn chunks(data: &[u8], stride: usize) -> Result<core::slice::ChunksExact<'_, u8>> {
    if stride == 0 {
        return Err(Error::ZeroStride);
    }
    if data.len() % stride != 0 {
        return Err(Error::StrideMismatch {
            expected: stride,
            found: data.len() % stride,
        });
    }
    Ok(data.chunks_exact(stride))
}

/// True when `pred` holds for every `stride`-byte element (vacuously for none).
pub fn all_of<F>(data: &[u8], stride: usize, mut pred: F) -> Result<bool>
where
    F: FnMut(&[u8]) -> bool,
{
    Ok(chunks(data, stride)?.all(|e| pred(e)))
}

pub fn any_of<F>(data: &[u8], stride: usize, mut pred: F) -> Result<bool>
where
    F: FnMut(&[u8]) -> bool,
{
    Ok(chunks(data, stride)?.any(|e| pred(e)))
}

pub fn none_of<F>(data: &[u8], stride: usize, pred: F) -> Result<bool>
where
    F: FnMut(&[u8]) -> bool,
{
    any_of(data, stride, pred).map(|hit| !hit)
}

/// Yields 0, 1, 2, ... without end.
#[derive(Clone, Debug, Default)]
pub struct Iota {
    next: usize,
}

impl Iota {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: usize) -> Self {
        Self { next: start }
    }

    /// Write the next `out.len()` values into `out`.
    pub fn fill(&mut self, out: &mut [usize]) {
        for slot in out {
            *slot = self.next;
            self.next += 1;
        }
    }
}

impl Iterator for Iota {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let cur = self.next;
        self.next += 1;
        Some(cur)
    }
}
