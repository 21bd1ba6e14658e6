//! ByteStr: growable byte string over a stride-1 [`RawBuf`].

use crate::error::{Error, Result};
use crate::fatal::OrAbort;
use crate::raw_buf::RawBuf;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct ByteStr {
    buf: RawBuf,
}

impl ByteStr {
    pub fn new() -> Self {
        Self {
            buf: RawBuf::with_capacity(1, 1).or_abort("bytestr_create"),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        let mut out = Self::new();
        out.append(s);
        out
    }

    /// Read the whole file at `path` byte for byte.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut out = Self::new();
        out.try_append(&bytes)?;
        Ok(out)
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

    pub fn as_bytes(&self) -> &[u8] {
        self.live().or_abort("bytestr_as_bytes");
        self.buf.as_bytes()
    }

    pub fn try_push(&mut self, byte: u8) -> Result<()> {
        self.buf.push(&[byte]).map(drop)
    }

    pub fn push(&mut self, byte: u8) {
        self.try_push(byte).or_abort("bytestr_push")
    }

    pub fn try_append<B: AsRef<[u8]> + ?Sized>(&mut self, bytes: &B) -> Result<()> {
        for &b in bytes.as_ref() {
            self.try_push(b)?;
        }
        Ok(())
    }

    pub fn append<B: AsRef<[u8]> + ?Sized>(&mut self, bytes: &B) {
        self.try_append(bytes).or_abort("bytestr_append")
    }

    /// Remove every occurrence of `byte`; returns how many were removed.
    pub fn remove_byte(&mut self, byte: u8) -> usize {
        let before = self.len();
        self.buf
            .retain(|b| b[0] != byte)
            .or_abort("bytestr_remove_byte");
        before - self.len()
    }

    pub fn try_clear(&mut self) -> Result<()> {
        self.live()?;
        self.buf.clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.try_clear().or_abort("bytestr_clear")
    }

    /// Copy the contents out as an owned UTF-8 string.
    pub fn try_to_string(&self) -> Result<String> {
        self.live()?;
        Ok(String::from_utf8(self.buf.as_bytes().to_vec())?)
    }

    pub fn try_free(&mut self) -> Result<()> {
        self.buf.release()
    }

    pub fn free(&mut self) {
        self.try_free().or_abort("bytestr_free")
    }
}

impl Default for ByteStr {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ByteStr {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
