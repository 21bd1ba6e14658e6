use std::collections::HashMap;
use stride_collections::{identity_hash, Error, PodMap, UMap};

fn int(v: i32) -> [u8; 4] {
    v.to_le_bytes()
}

fn read_int(b: &[u8]) -> i32 {
    i32::from_le_bytes(b.try_into().expect("4-byte value"))
}

#[test]
fn ten_int_pairs_round_trip() {
    let mut m = UMap::new(4, 4, identity_hash);
    for i in 0..10 {
        m.insert(&int(i), &int(i));
    }
    assert_eq!(m.len(), 10);
    for i in 0..10 {
        let v = m.lookup(&int(i)).expect("present");
        assert_eq!(read_int(v), i);
    }
    assert!(m.lookup(&int(10)).is_none());
    // The sixth insert pushed the load factor past 0.5; 10/20 does not.
    assert_eq!(m.capacity(), 20);
    m.free();
    assert!(m.is_freed());
}

#[test]
fn overwrite_keeps_single_entry() {
    let mut m = UMap::with_default_hasher(4, 4);
    let h1 = m.insert(&int(7), &int(1));
    let h2 = m.insert(&int(7), &int(2));
    assert_eq!(h1, h2);
    assert_eq!(m.len(), 1);
    assert_eq!(read_int(m.lookup(&int(7)).unwrap()), 2);
}

#[test]
fn string_keys_with_custom_hash() {
    // Fixed 8-byte keys padded with zeros, hashed with FNV-1a.
    fn fnv1a(key: &[u8]) -> u64 {
        key.iter().fold(0xcbf29ce484222325, |h, b| {
            (h ^ u64::from(*b)).wrapping_mul(0x100000001b3)
        })
    }
    fn pad(s: &str) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..s.len()].copy_from_slice(s.as_bytes());
        out
    }

    let mut m = UMap::new(8, 4, fnv1a);
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    for (i, w) in words.iter().enumerate() {
        m.insert(&pad(w), &int(i as i32));
    }
    for (i, w) in words.iter().enumerate() {
        assert_eq!(read_int(m.lookup(&pad(w)).unwrap()), i as i32);
    }
    assert!(!m.contains_key(&pad("zeta")));
}

#[test]
fn iteration_visits_every_entry_once() {
    let mut m = UMap::with_default_hasher(4, 4);
    for i in 0..500 {
        m.insert(&int(i), &int(i * 3));
    }
    let mut seen: HashMap<i32, i32> = HashMap::new();
    for (k, v) in &m {
        assert!(seen.insert(read_int(k), read_int(v)).is_none());
    }
    assert_eq!(seen.len(), 500);
    assert!(seen.iter().all(|(k, v)| *v == k * 3));
    assert!(m.load_factor() <= m.max_load_factor());
}

#[test]
fn misuse_reports_errors() {
    let mut m = UMap::with_default_hasher(4, 4);
    assert!(matches!(
        m.try_insert(&[1, 2], &int(0)),
        Err(Error::StrideMismatch {
            expected: 4,
            found: 2
        })
    ));
    assert!(matches!(
        UMap::try_new(0, 4, identity_hash),
        Err(Error::ZeroStride)
    ));
    assert!(matches!(
        UMap::builder(4, 4).initial_capacity(0).build(identity_hash),
        Err(Error::InvalidConfig(_))
    ));
    m.free();
    assert!(matches!(m.try_lookup(&int(0)), Err(Error::UseAfterFree)));
    assert!(matches!(m.try_free(), Err(Error::UseAfterFree)));
}

#[test]
#[should_panic(expected = "[PANIC: umap_get]")]
fn lookup_after_free_aborts() {
    let mut m = UMap::with_default_hasher(4, 4);
    m.insert(&int(1), &int(1));
    m.free();
    let _ = m.lookup(&int(1));
}

#[test]
fn pod_map_counts_words() {
    let mut counts: PodMap<u64, u32> = PodMap::new();
    let text = "the quick brown fox jumps over the lazy dog the end";
    for w in text.split(' ') {
        let key = w.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b.into()));
        if !counts.update(&key, |c| *c += 1) {
            counts.insert(&key, &1);
        }
    }
    let the = b"the".iter().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add((*b).into()));
    assert_eq!(counts.get(&the), Some(3));
    assert_eq!(counts.len(), 9);
}
