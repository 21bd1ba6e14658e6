//! Queue: FIFO of fixed-stride elements laid out as a growable ring.
//!
//! Invariants
//! - `slots.len()` is the ring size; `count <= slots.len()`.
//! - Logical element `i` lives in slot `(head + i) % slots.len()`.
//! - When the ring is full and `head == 0` the new element is appended,
//!   letting `RawBuf` double its storage; otherwise the ring is re-laid out
//!   front-first into a buffer of twice the size.

use crate::error::{check_stride, Error, Result};
use crate::fatal::OrAbort;
use crate::raw_buf::RawBuf;

#[derive(Clone, Debug)]
pub struct Queue {
    slots: RawBuf,
    head: usize,
    count: usize,
}

impl Queue {
    pub fn try_new(stride: usize) -> Result<Self> {
        Ok(Self {
            slots: RawBuf::with_capacity(stride, 1)?,
            head: 0,
            count: 0,
        })
    }

    pub fn new(stride: usize) -> Self {
        Self::try_new(stride).or_abort("queue_create")
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn live(&self) -> Result<()> {
        if self.slots.is_released() {
            Err(Error::UseAfterFree)
        } else {
            Ok(())
        }
    }

    fn relayout(&mut self) -> Result<()> {
        let ring = self.slots.len();
        let mut grown = RawBuf::with_capacity(self.slots.stride(), ring * 2)?;
        for i in 0..self.count {
            grown.push(self.slots.try_get((self.head + i) % ring)?)?;
        }
        self.slots = grown;
        self.head = 0;
        Ok(())
    }

    pub fn try_enqueue(&mut self, elem: &[u8]) -> Result<()> {
        self.live()?;
        check_stride(self.slots.stride(), elem)?;
        let ring = self.slots.len();
        if self.count < ring {
            self.slots.set((self.head + self.count) % ring, elem)?;
        } else {
            if self.head != 0 {
                self.relayout()?;
            }
            self.slots.push(elem)?;
        }
        self.count += 1;
        Ok(())
    }

    pub fn enqueue(&mut self, elem: &[u8]) {
        self.try_enqueue(elem).or_abort("queue_enqueue")
    }

    /// Front element, or `None` when empty.
    pub fn try_peek(&self) -> Result<Option<&[u8]>> {
        self.live()?;
        if self.count == 0 {
            return Ok(None);
        }
        self.slots.try_get(self.head).map(Some)
    }

    pub fn peek(&self) -> Option<&[u8]> {
        self.try_peek().or_abort("queue_peek")
    }

    /// Drop the front element.
    pub fn try_dequeue(&mut self) -> Result<()> {
        self.live()?;
        if self.count == 0 {
            return Err(Error::Empty);
        }
        self.count -= 1;
        self.head = if self.count == 0 {
            0
        } else {
            (self.head + 1) % self.slots.len()
        };
        Ok(())
    }

    pub fn dequeue(&mut self) {
        self.try_dequeue().or_abort("queue_dequeue")
    }

    pub fn try_free(&mut self) -> Result<()> {
        self.slots.release()?;
        self.head = 0;
        self.count = 0;
        Ok(())
    }

    pub fn free(&mut self) {
        self.try_free().or_abort("queue_free")
    }
}
