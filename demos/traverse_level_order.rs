use avl_bst::AvlTreeMap;

fn print_levels(map: &AvlTreeMap<i32, char>) {
    let mut line = Vec::with_capacity(map.len());
    map.traverse_level_order(|_, value| line.push(value.to_string()));
    println!("height {:?}: {}", map.height(), line.join(" "));
}

fn main() {
    env_logger::init();

    // -1 arrives under a left-leaning 1 and forces a right rotation there
    let mut map: AvlTreeMap<i32, char> = [(1, 'c'), (2, 'b'), (3, 'd'), (0, 'a'), (-1, 'g')]
        .into_iter()
        .collect();
    print_levels(&map);

    if let Some(value) = map.remove(&1) {
        println!("removed 1 -> {}", value);
    }
    print_levels(&map);
}
