use avl_bst::AvlTreeMap;

fn main() {
    env_logger::init();

    let mut map = AvlTreeMap::new();
    map.insert(1, 'c');
    map.insert(2, 'b');
    map.insert(3, 'd');
    map.insert(0, 'a');
    map.insert(-1, 'g');
    map.insert(2, 'b');
    assert_eq!(map.len(), 5);
    assert_eq!(map.height(), Some(2));

    let mut cursor = map.rcursor_front();
    while let Some(value) = cursor.value() {
        print!("{value}");
        cursor.move_next();
    }
    println!();

    map.remove(&1);
    assert!(map.at(&1).is_err());

    for (k, v) in &map {
        println!("{k} => {v}");
    }
}
