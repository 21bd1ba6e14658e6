//! BytePair: owned copies of two byte blobs in one allocation.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BytePair {
    bytes: Box<[u8]>,
    split: usize,
}

impl BytePair {
    pub fn new(fst: &[u8], snd: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(fst.len() + snd.len());
        bytes.extend_from_slice(fst);
        bytes.extend_from_slice(snd);
        Self {
            bytes: bytes.into_boxed_slice(),
            split: fst.len(),
        }
    }

    pub fn fst(&self) -> &[u8] {
        &self.bytes[..self.split]
    }

    pub fn fst_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.split]
    }

    pub fn snd(&self) -> &[u8] {
        &self.bytes[self.split..]
    }

    pub fn snd_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.split..]
    }

    /// Both halves mutably at once.
    pub fn split_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        self.bytes.split_at_mut(self.split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_copies_of_both_halves() {
        let mut x = 10i32;
        let y = 2.5f64;
        let mut p = BytePair::new(&x.to_ne_bytes(), &y.to_ne_bytes());
        x += 1;
        assert_eq!(x, 11);
        assert_eq!(p.fst(), 10i32.to_ne_bytes());
        assert_eq!(p.snd(), 2.5f64.to_ne_bytes());

        p.fst_mut().copy_from_slice(&20i32.to_ne_bytes());
        assert_eq!(i32::from_ne_bytes(p.fst().try_into().unwrap()), 20);
        assert_eq!(p.snd(), 2.5f64.to_ne_bytes());
    }

    #[test]
    fn split_mut_and_empty_halves() {
        let mut p = BytePair::new(b"ab", b"");
        assert!(p.snd().is_empty());
        let (a, b) = p.split_mut();
        a[0] = b'z';
        assert!(b.is_empty());
        assert_eq!(p.fst(), b"zb");

        let mut q = BytePair::new(b"", b"cd");
        q.snd_mut()[1] = b'x';
        assert_eq!(q.snd(), b"cx");
    }
}
