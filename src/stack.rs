//! Stack: LIFO of fixed-stride elements.

use crate::error::{Error, Result};
use crate::fatal::OrAbort;
use crate::raw_buf::RawBuf;

#[derive(Clone, Debug)]
pub struct Stack {
    buf: RawBuf,
}

impl Stack {
    pub fn try_new(stride: usize) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::with_capacity(stride, 1)?,
        })
    }

    pub fn new(stride: usize) -> Self {
        Self::try_new(stride).or_abort("stack_create")
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn live(&self) -> Result<()> {
        if self.buf.is_released() {
            Err(Error::UseAfterFree)
        } else {
            Ok(())
        }
    }

    pub fn try_push(&mut self, elem: &[u8]) -> Result<()> {
        self.buf.push(elem).map(drop)
    }

    pub fn push(&mut self, elem: &[u8]) {
        self.try_push(elem).or_abort("stack_push")
    }

    /// Top element, or `None` when empty.
    pub fn try_peek(&self) -> Result<Option<&[u8]>> {
        self.live()?;
        Ok(self.buf.len().checked_sub(1).and_then(|top| self.buf.get(top)))
    }

    pub fn peek(&self) -> Option<&[u8]> {
        self.try_peek().or_abort("stack_peek")
    }

    /// Drop the top element and return its bytes.
    pub fn try_pop(&mut self) -> Result<&[u8]> {
        self.buf.pop()
    }

    pub fn pop(&mut self) -> &[u8] {
        self.try_pop().or_abort("stack_pop")
    }

    pub fn try_free(&mut self) -> Result<()> {
        self.buf.release()
    }

    pub fn free(&mut self) {
        self.try_free().or_abort("stack_free")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(s: &Stack) -> i32 {
        i32::from_ne_bytes(s.peek().unwrap().try_into().unwrap())
    }

    #[test]
    fn pops_in_reverse_order() {
        for n in [10i32, 1000] {
            let mut s = Stack::new(4);
            for i in 0..n {
                s.push(&i.to_ne_bytes());
            }
            assert_eq!(s.len(), n as usize);
            let mut expect = n - 1;
            while !s.is_empty() {
                assert_eq!(top(&s), expect);
                let popped = i32::from_ne_bytes(s.pop().try_into().unwrap());
                assert_eq!(popped, expect);
                expect -= 1;
            }
            assert_eq!(expect, -1);
            s.free();
        }
    }

    #[test]
    fn empty_stack_behaviour() {
        let mut s = Stack::new(2);
        assert!(s.peek().is_none());
        assert!(matches!(s.try_pop(), Err(Error::Empty)));
    }

    #[test]
    #[should_panic(expected = "[PANIC: stack_pop]: collection is empty")]
    fn pop_empty_aborts() {
        let mut s = Stack::new(2);
        s.pop();
    }

    #[test]
    fn freed_stack_reports_use_after_free() {
        let mut s = Stack::new(4);
        s.push(&1i32.to_ne_bytes());
        s.free();
        assert!(matches!(s.try_peek(), Err(Error::UseAfterFree)));
        assert!(matches!(s.try_pop(), Err(Error::UseAfterFree)));
        assert!(matches!(s.try_push(&[0; 4]), Err(Error::UseAfterFree)));
        assert!(matches!(s.try_free(), Err(Error::UseAfterFree)));
    }

    #[test]
    #[should_panic(expected = "[PANIC: stack_peek]: use of a freed collection")]
    fn peek_after_free_aborts() {
        let mut s = Stack::new(4);
        s.push(&1i32.to_ne_bytes());
        s.free();
        let _ = s.peek();
    }

    #[test]
    #[should_panic(expected = "[PANIC: stack_push]: use of a freed collection")]
    fn push_after_free_aborts() {
        let mut s = Stack::new(4);
        s.free();
        s.push(&1i32.to_ne_bytes());
    }

    #[test]
    #[should_panic(expected = "[PANIC: stack_free]: use of a freed collection")]
    fn double_free_aborts() {
        let mut s = Stack::new(4);
        s.free();
        s.free();
    }
}
