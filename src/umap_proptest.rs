#![cfg(test)]

// Property tests for UMap kept inside the crate so they can reach
// internals such as the configured hasher without extra plumbing.

use crate::hasher::{identity_hash, KeyHasher, RandomKeyHasher};
use crate::umap::{Handle, UMap};
use hashbrown::HashMap;
use proptest::prelude::*;

// Pool-indexed operations: indices shrink toward earlier keys and the op
// list shrinks in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Lookup(usize),
    Miss(u16),
    Mutate(usize, i32),
    Iterate,
}

#[derive(Clone, Copy, Debug)]
enum HashKind {
    Identity,
    Collide,
    Random,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u16>, Vec<Op>)> {
    proptest::collection::vec(any::<u16>(), 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Lookup),
            1 => any::<u16>().prop_map(Op::Miss),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Mutate(i, v)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_hash_kind() -> impl Strategy<Value = HashKind> {
    prop_oneof![
        Just(HashKind::Identity),
        Just(HashKind::Collide),
        Just(HashKind::Random),
    ]
}

struct Hashers {
    kind: HashKind,
    random: RandomKeyHasher,
}

impl KeyHasher for Hashers {
    fn hash_key(&self, key: &[u8]) -> u64 {
        match self.kind {
            HashKind::Identity => identity_hash(key),
            HashKind::Collide => identity_hash(key) % 3,
            HashKind::Random => self.random.hash_key(key),
        }
    }
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - insert-then-lookup returns the inserted bytes; overwrite keeps len.
// - handles are stable per key across rehash.
// - keys never inserted stay absent.
// - iter yields exactly the model's entries.
// - load factor never exceeds the threshold after an insert returns.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(kind in arb_hash_kind(), (pool, ops) in arb_scenario()) {
        let hasher = Hashers { kind, random: RandomKeyHasher::new() };
        let mut sut = UMap::new(2, 4, hasher);
        let mut model: HashMap<u16, i32> = HashMap::new();
        let mut handles: HashMap<u16, Handle> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i];
                    let vb = v.to_le_bytes();
                    let h = sut.insert(&k.to_le_bytes(), &vb);
                    if let Some(prev) = handles.insert(k, h) {
                        prop_assert_eq!(prev, h, "overwrite must reuse the entry");
                    }
                    model.insert(k, v);
                    prop_assert_eq!(sut.lookup(&k.to_le_bytes()), Some(&vb[..]));
                    prop_assert!(sut.load_factor() <= sut.max_load_factor());
                }
                Op::Lookup(i) => {
                    let k = pool[i];
                    let got = sut.lookup(&k.to_le_bytes()).map(|b| i32::from_le_bytes(b.try_into().unwrap()));
                    prop_assert_eq!(got, model.get(&k).copied());
                    prop_assert_eq!(sut.find(&k.to_le_bytes()), handles.get(&k).copied());
                }
                Op::Miss(k) => {
                    prop_assert_eq!(sut.contains_key(&k.to_le_bytes()), model.contains_key(&k));
                }
                Op::Mutate(i, v) => {
                    let k = pool[i];
                    if let Some(&h) = handles.get(&k) {
                        h.value_mut(&mut sut).expect("live handle").copy_from_slice(&v.to_le_bytes());
                        model.insert(k, v);
                    }
                }
                Op::Iterate => {
                    let mut seen: HashMap<u16, i32> = HashMap::new();
                    for (kb, vb) in sut.iter() {
                        let k = u16::from_le_bytes(kb.try_into().unwrap());
                        let v = i32::from_le_bytes(vb.try_into().unwrap());
                        prop_assert!(seen.insert(k, v).is_none(), "key yielded twice");
                    }
                    prop_assert_eq!(&seen, &model);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
        }
    }
}
