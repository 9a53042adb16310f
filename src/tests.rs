use super::{AvlTreeMap, Error};

const N: i32 = 1_000;
const LARGE_N: i32 = 1_000_000;

#[test]
fn test_new() {
    let map_i32 = AvlTreeMap::<i32, ()>::new();
    assert!(map_i32.is_empty());
    assert_eq!(map_i32.height(), None);
    map_i32.check_consistency();

    let map_i8 = AvlTreeMap::<i8, ()>::new();
    assert!(map_i8.is_empty());
    map_i8.check_consistency();

    let map_string = AvlTreeMap::<String, String>::new();
    assert!(map_string.is_empty());
    map_string.check_consistency();
}

#[test]
fn test_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(4, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(2));
        map.remove(&4);
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(4, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(2));
        map.remove(&4);
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(2));
        map.remove(&0);
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), Some(2));
        map.remove(&0);
        map.check_consistency();
        assert_eq!(map.height(), Some(1));
    }
}

#[test]
fn test_double_rotation_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();

    // 3, 1, 2 takes the left-right path
    let mut map = AvlTreeMap::new();
    for key in [3, 1, 2, 0, 4] {
        map.insert(key, ());
        map.check_consistency();
    }
    assert!(map.keys().copied().eq([0, 1, 2, 3, 4]));

    // Removing 2 leaves 5 right-heavy over a left-leaning 8
    let mut map: AvlTreeMap<i32, ()> = [5, 2, 8, 7].into_iter().map(|k| (k, ())).collect();
    map.remove(&2);
    map.check_consistency();
    let mut keys = Vec::new();
    map.traverse_level_order(|k, _| keys.push(*k));
    assert_eq!(keys, [7, 5, 8]);
}

#[test]
fn test_remove_two_children() {
    //       2     ->     3     ->    0
    //      / \          /           / \
    //     0   3        0          -1   3
    //    / \          /
    //  -1   1       -1
    let mut map = AvlTreeMap::new();
    for (key, value) in [(1, 'c'), (2, 'b'), (3, 'd'), (0, 'a'), (-1, 'g')] {
        map.insert(key, value);
    }
    map.check_consistency();
    assert_eq!(map.height(), Some(2));

    assert_eq!(map.remove(&1), Some('c'));
    map.check_consistency();
    assert_eq!(map.len(), 4);

    // Root has two children, its successor 3 moves up
    assert_eq!(map.remove_entry(&2), Some((2, 'b')));
    map.check_consistency();
    assert_eq!(map.height(), Some(1));
    let mut level_order = Vec::new();
    map.traverse_level_order(|k, v| level_order.push((*k, *v)));
    assert_eq!(level_order, [(0, 'a'), (-1, 'g'), (3, 'd')]);
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        assert_eq!(map.insert(*value, *value), None);
        map.check_consistency();
    }
    assert_eq!(map.len(), values.len());

    for value in &values {
        assert_eq!(map.insert(*value, value.wrapping_neg()), Some(*value));
    }
    assert_eq!(map.len(), values.len());
    map.check_consistency();
}

#[test]
fn test_insert_sorted_range() {
    let mut map = AvlTreeMap::new();
    for value in 0..N {
        assert!(map.insert(value, value).is_none());
        map.check_consistency();
    }
    assert_eq!(map.len(), N as usize);
    let height = map.height().unwrap();
    assert!(height > 0);
    assert!(height < N as usize / 2);
    assert!(map.get(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut map = AvlTreeMap::new();
    for value in &values {
        assert!(map.insert(*value, "foo").is_none());
        map.check_consistency();
    }
    assert_eq!(map.len(), values.len());

    for value in &values {
        assert_eq!(map.insert(*value, "bar"), Some("foo"));
    }
    assert_eq!(map.len(), values.len());
    assert!(map.get(&-42).is_none());
}

#[test]
fn test_get() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = AvlTreeMap::new();
    assert!(map.get(&42).is_none());
    for value in &values {
        map.insert(*value, value.wrapping_add(1));
    }

    for value in &values {
        let got = map.get(value);
        assert_eq!(got, Some(&value.wrapping_add(1)));
        let got = map.get_key_value(value);
        assert_eq!(got, Some((value, &value.wrapping_add(1))));
        assert!(map.contains_key(value));
    }

    for value in &values {
        if let Some(mapped) = map.get_mut(value) {
            *mapped = *value;
        }
    }
    for value in &values {
        assert_eq!(map.get(value), Some(value));
    }
}

#[test]
fn test_at() {
    let mut map: AvlTreeMap<i32, String> = AvlTreeMap::new();
    assert_eq!(map.at(&1), Err(Error::KeyNotFound));
    assert_eq!(map.at_mut(&1), Err(Error::KeyNotFound));

    map.insert(1, String::from("one"));
    assert_eq!(map.at(&1).map(String::as_str), Ok("one"));
    map.at_mut(&1).unwrap().push_str("!");
    assert_eq!(map.at(&1).map(String::as_str), Ok("one!"));
    assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
}

#[test]
fn test_first_last() {
    let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    assert!(map.first_key_value().is_none());
    assert!(map.last_key_value().is_none());

    for value in [5, 3, 8, 1, 4] {
        map.insert(value, value * 2);
    }
    assert_eq!(map.first_key_value(), Some((&1, &2)));
    assert_eq!(map.last_key_value(), Some((&8, &16)));
}

#[test]
fn test_clear() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, String::from("foo"));
    }
    assert!(!map.is_empty());
    assert_eq!(map.len(), values.len());

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.height(), None);

    for value in &values {
        assert!(map.insert(*value, String::from("bar")).is_none());
    }
    assert!(!map.is_empty());
    assert_eq!(map.len(), values.len());
    map.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, 42);
    }

    values.shuffle(&mut rng);
    for value in &values {
        assert!(map.get(value).is_some());
        assert_eq!(map.remove(value), Some(42));
        assert!(map.get(value).is_none());
        assert_eq!(map.remove(value), None);
        map.check_consistency();
    }
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.height(), None);
}

#[test]
fn test_clone_and_eq() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let map: AvlTreeMap<i32, i32> = (0..N).map(|_| (rng.gen_range(0..N), rng.gen())).collect();

    let mut copy = map.clone();
    copy.check_consistency();
    assert_eq!(copy, map);
    assert_eq!(copy.len(), map.len());

    let first = *copy.first_key_value().unwrap().0;
    copy.remove(&first);
    assert_ne!(copy, map);
    assert!(map.contains_key(&first));
}

#[test]
fn test_debug() {
    let map: AvlTreeMap<_, _> = [(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
}

#[test]
fn test_traverse_level_order() {
    //       3
    //      / \
    //     1   5
    //    / \   \
    //   0   2   6
    let mut map = AvlTreeMap::new();
    for key in [3, 1, 5, 0, 2, 6] {
        map.insert(key, key.to_string());
    }
    let mut keys = Vec::new();
    map.traverse_level_order(|k, v| {
        assert_eq!(&k.to_string(), v);
        keys.push(*k);
    });
    assert_eq!(keys, [3, 1, 5, 0, 2, 6]);
}

#[test]
fn test_traverse_level_order_after_remove() {
    //       2     ->     2
    //      / \          / \
    //     0   3        0   3
    //    / \          /
    //  -1   1       -1
    let mut map = AvlTreeMap::new();
    for (key, value) in [(1, 'c'), (2, 'b'), (3, 'd'), (0, 'a'), (-1, 'g')] {
        map.insert(key, value);
    }
    let mut values = String::new();
    map.traverse_level_order(|_, v| values.push(*v));
    assert_eq!(values, "badgc");

    map.remove(&1);
    map.check_consistency();
    let mut values = String::new();
    map.traverse_level_order(|_, v| values.push(*v));
    assert_eq!(values, "badg");
    assert_eq!(map.height(), Some(2));
}

#[test]
fn test_map_iter() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, value.wrapping_add(42));
    }

    values.sort();
    values.dedup();

    let mut map_iter = map.iter();
    assert_eq!(map_iter.len(), values.len());
    for value in &values {
        let kv = map_iter.next();
        assert!(kv.is_some());
        let (&key, &mapped) = kv.unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(map_iter.next().is_none());

    let mut value_iter = values.iter().rev();
    for (&key, _) in map.iter().rev() {
        assert_eq!(Some(&key), value_iter.next());
    }
    assert!(value_iter.next().is_none());

    let mut map_iter_mut = map.iter_mut();
    for value in &values {
        let kv = map_iter_mut.next();
        assert!(kv.is_some());
        let (&key, mapped_mut) = kv.unwrap();
        assert_eq!(key, *value);
        assert_eq!(*mapped_mut, value.wrapping_add(42));
        *mapped_mut = value.wrapping_sub(42);
    }
    assert!(map_iter_mut.next().is_none());

    let mut value_iter = values.iter();
    for (&key, mapped_mut) in &mut map {
        let value = value_iter.next();
        assert!(value.is_some());
        let value = value.unwrap();
        assert_eq!(key, *value);
        assert_eq!(*mapped_mut, value.wrapping_sub(42));
        *mapped_mut = 42;
    }
    assert!(value_iter.next().is_none());

    assert!(map.values().all(|&mapped| mapped == 42));
    for mapped in map.values_mut() {
        *mapped = 7;
    }
    assert!(map.values().all(|&mapped| mapped == 7));
    assert!(map.keys().copied().eq(values.iter().copied()));

    let owned: Vec<(i32, i32)> = map.into_iter().collect();
    assert!(owned.iter().map(|(key, _)| *key).eq(values.iter().copied()));
}

#[test]
fn test_iter_meets_in_middle() {
    let map: AvlTreeMap<_, _> = (0..10).map(|k| (k, ())).collect();
    let mut iter = map.keys();
    let mut seen = Vec::new();
    while let Some(front) = iter.next() {
        seen.push(*front);
        if let Some(back) = iter.next_back() {
            seen.push(*back);
        }
    }
    assert_eq!(seen, [0, 9, 1, 8, 2, 7, 3, 6, 4, 5]);
    assert!(iter.next_back().is_none());
}

#[test]
#[ignore]
fn test_large() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, *value);
    }
    map.check_consistency();

    values.shuffle(&mut rng);
    values.resize(values.len() / 2, 0);
    for value in &values {
        map.remove(value);
    }
    map.check_consistency();
}

mod properties {
    use proptest::prelude::*;

    use super::AvlTreeMap;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i16, u8),
        Remove(i16),
    }

    fn op() -> impl Strategy<Value = Op> {
        // Small key space so removals hit and deletion rebalancing runs
        prop_oneof![
            (-64i16..64, any::<u8>()).prop_map(|(key, value)| Op::Insert(key, value)),
            (-64i16..64).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_after_every_mutation(ops in prop::collection::vec(op(), 0..200)) {
            let mut map = AvlTreeMap::new();
            for op in ops {
                match op {
                    Op::Insert(key, value) => {
                        map.insert(key, value);
                    }
                    Op::Remove(key) => {
                        map.remove(&key);
                    }
                }
                map.check_consistency();
            }
        }

        #[test]
        fn prop_clone_is_consistent(keys in prop::collection::vec(any::<u16>(), 0..200)) {
            let map: AvlTreeMap<u16, u16> = keys.iter().map(|&key| (key, key)).collect();
            let copy = map.clone();
            copy.check_consistency();
            prop_assert_eq!(copy, map);
        }
    }
}
