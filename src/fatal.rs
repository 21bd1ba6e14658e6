//! Abort-on-error adapter behind the non-`try_*` API.
//!
//! Misuse of a container (wrong stride, out-of-bounds index, use after
//! free) is unrecoverable for callers of the plain operations: the error is
//! logged and the operation panics with `[PANIC: <op>]: <error>`.

use crate::error::{Error, Result};

pub(crate) trait OrAbort<T> {
    fn or_abort(self, op: &'static str) -> T;
}

impl<T> OrAbort<T> for Result<T> {
    #[inline]
    #[track_caller]
    fn or_abort(self, op: &'static str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => abort(op, &e),
        }
    }
}

#[cold]
#[track_caller]
pub(crate) fn abort(op: &'static str, err: &Error) -> ! {
    log::error!("{op} failed: {err}");
    panic!("[PANIC: {op}]: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_passes_through() {
        let r: Result<u32> = Ok(7);
        assert_eq!(r.or_abort("op"), 7);
    }

    #[test]
    #[should_panic(expected = "[PANIC: op]: collection is empty")]
    fn err_panics_with_operation_name() {
        let r: Result<u32> = Err(Error::Empty);
        r.or_abort("op");
    }
}
