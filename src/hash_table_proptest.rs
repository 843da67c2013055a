#![cfg(test)]

// Property tests for HashTable kept inside the crate so the model can check
// physical bucket layout through the diagnostic dump and slot counters.

use crate::{HashTable, TableError};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Create(usize, u8),
    Update(usize, u8),
    Query(usize),
    Delete(usize),
    Print,
}

// Reference layout: per bucket, slots of (key, value, deleted, seq).
struct Model {
    depth: usize,
    buckets: Vec<Vec<(String, String, bool, u64)>>,
    seq: u64,
}

impl Model {
    fn new(width: usize, depth: usize) -> Self {
        Model {
            depth,
            buckets: vec![Vec::new(); width],
            seq: 0,
        }
    }

    fn live(&self, b: usize, key: &str) -> Option<usize> {
        self.buckets[b]
            .iter()
            .position(|(k, _, deleted, _)| !deleted && k == key)
    }

    fn create(&mut self, b: usize, key: &str, value: &str) -> Result<(), TableError> {
        if self.live(b, key).is_some() {
            return Err(TableError::DuplicateKey(key.to_string()));
        }
        let depth = self.depth;
        let bucket = &mut self.buckets[b];
        let slot = (key.to_string(), value.to_string(), false, self.seq);
        if let Some(pos) = bucket.iter().position(|(k, _, d, _)| *d && k == key) {
            bucket[pos] = slot;
        } else if bucket.len() < depth {
            bucket.push(slot);
        } else if let Some(pos) = bucket
            .iter()
            .enumerate()
            .filter(|(_, s)| s.2)
            .min_by_key(|(_, s)| s.3)
            .map(|(pos, _)| pos)
        {
            bucket[pos] = slot;
        } else {
            return Err(TableError::BucketFull { bucket: b, depth });
        }
        self.seq += 1;
        Ok(())
    }

    fn live_records(&self) -> Vec<(String, String)> {
        self.buckets
            .iter()
            .flatten()
            .filter(|s| !s.2)
            .map(|s| (s.0.clone(), s.1.clone()))
            .collect()
    }

    fn tombstones(&self) -> usize {
        self.buckets.iter().flatten().filter(|s| s.2).count()
    }
}

fn arb_scenario() -> impl Strategy<Value = (usize, usize, Vec<String>, Vec<OpI>)> {
    (1usize..=4, 1usize..=3, proptest::collection::vec("[a-z]{0,3}", 1..=10)).prop_flat_map(
        |(width, depth, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                3 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| OpI::Create(i, v)),
                1 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| OpI::Update(i, v)),
                1 => idx.clone().prop_map(OpI::Query),
                2 => idx.clone().prop_map(OpI::Delete),
                1 => Just(OpI::Print),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (width, depth, pool.clone(), ops))
        },
    )
}

// Property: state-machine equivalence against a reference bucket layout.
// Invariants exercised across random operation sequences:
// - Every create/update/query/delete result matches the model, including the
//   error variant.
// - Live records appear in bucket-then-slot order exactly as the model places
//   them; tombstone counts agree.
// - No bucket exceeds `depth`; at most one live record per key.
// - Placement is a pure function of the key.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((width, depth, pool, ops) in arb_scenario()) {
        let mut sut = HashTable::new(width, depth).unwrap();
        let mut model = Model::new(width, depth);
        let mut values: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                OpI::Create(i, v) => {
                    let k = &pool[i];
                    let v = v.to_string();
                    let b = sut.bucket_index(k);
                    let expected = model.create(b, k, &v);
                    prop_assert_eq!(sut.create_item(k.as_str(), v.as_str()), expected.clone());
                    if expected.is_ok() {
                        values.insert(k.clone(), v);
                    }
                }
                OpI::Update(i, v) => {
                    let k = &pool[i];
                    let v = v.to_string();
                    let b = sut.bucket_index(k);
                    match model.live(b, k) {
                        Some(pos) => {
                            prop_assert_eq!(sut.update_item(k.as_str(), v.as_str()), Ok(()));
                            model.buckets[b][pos].1 = v.clone();
                            values.insert(k.clone(), v);
                        }
                        None => {
                            prop_assert_eq!(
                                sut.update_item(k.as_str(), v.as_str()),
                                Err(TableError::KeyNotFound(k.clone()))
                            );
                        }
                    }
                    prop_assert_eq!(sut.bucket_index(k), b);
                }
                OpI::Query(i) => {
                    let k = &pool[i];
                    let b = sut.bucket_index(k);
                    match model.live(b, k) {
                        Some(_) => {
                            let r = sut.query_item(k).unwrap();
                            prop_assert_eq!(r.key(), k.as_str());
                            prop_assert_eq!(Some(r.value()), values.get(k).map(String::as_str));
                            prop_assert!(!r.is_deleted());
                        }
                        None => {
                            prop_assert_eq!(sut.query_item(k), Err(TableError::KeyNotFound(k.clone())));
                        }
                    }
                }
                OpI::Delete(i) => {
                    let k = &pool[i];
                    let b = sut.bucket_index(k);
                    match model.live(b, k) {
                        Some(pos) => {
                            prop_assert_eq!(sut.delete_item(k), Ok(()));
                            model.buckets[b][pos].2 = true;
                            values.remove(k);
                        }
                        None => {
                            prop_assert_eq!(sut.delete_item(k), Err(TableError::KeyNotFound(k.clone())));
                        }
                    }
                }
                OpI::Print => {
                    let before = sut.len();
                    let dump = sut.print_table();
                    prop_assert_eq!(dump.lines().filter(|l| l.starts_with("bucket ")).count(), width);
                    prop_assert_eq!(dump.matches("(deleted)").count(), model.tombstones());
                    prop_assert_eq!(sut.len(), before);
                }
            }

            let live: Vec<(String, String)> = sut
                .iter()
                .map(|r| (r.key().to_string(), r.value().to_string()))
                .collect();
            prop_assert_eq!(&live, &model.live_records());
            prop_assert_eq!(sut.len(), live.len());
            prop_assert_eq!(sut.is_empty(), live.is_empty());
            prop_assert_eq!(sut.tombstones(), model.tombstones());
            prop_assert!(model.buckets.iter().all(|b| b.len() <= depth));
            prop_assert!(sut.occupied() <= width * depth);
            let distinct: HashSet<&String> = live.iter().map(|(k, _)| k).collect();
            prop_assert_eq!(distinct.len(), live.len());
        }
    }
}
