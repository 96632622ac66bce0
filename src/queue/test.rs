use super::*;

fn queue(values: &[&str]) -> LinkedQueue {
    values.iter().collect()
}

#[test]
fn insert_and_remove() {
    let mut q = LinkedQueue::new();

    q.insert_tail("b").unwrap();
    q.insert_head("a").unwrap();
    q.insert_tail("c").unwrap();

    assert_eq!(q.values(), vec!["a", "b", "c"]);
    assert_eq!(q.size(), 3);
    assert_eq!(q.front(), Some("a"));
    assert_eq!(q.back(), Some("c"));

    let e = q.remove_head(None).unwrap();
    assert_eq!(e.value(), "a");

    let e = q.remove_tail(None).unwrap();
    assert_eq!(e.into_value(), "c");

    assert_eq!(q.values(), vec!["b"]);
    q.check().unwrap();
}

#[test]
fn remove_copies_into_buffer() {
    let mut q = queue(&["hello", "hi"]);

    let mut buf = [0xffu8; 4];
    let e = q.remove_head(Some(&mut buf[..])).unwrap();

    // Truncated to len - 1 bytes plus the NUL byte
    assert_eq!(&buf, b"hel\0");
    assert_eq!(e.value(), "hello");

    let mut buf = [0xffu8; 6];
    q.remove_tail(Some(&mut buf[..])).unwrap();
    assert_eq!(&buf, b"hi\0\0\0\0");

    // An empty buffer is left alone
    q.insert_tail("x").unwrap();
    let mut buf = [0u8; 0];
    assert!(q.remove_head(Some(&mut buf[..])).is_some());
}

#[test]
fn remove_from_empty() {
    let mut q = LinkedQueue::new();
    let mut buf = [7u8; 4];

    assert!(q.remove_head(Some(&mut buf[..])).is_none());
    assert!(q.remove_tail(None).is_none());
    assert_eq!(buf, [7u8; 4]);
    assert_eq!(q.size(), 0);
}

#[test]
fn failed_insert_leaves_queue_untouched() {
    let config = Config {
        node_limit: Some(2),
        value_limit: Some(3),
        ..Config::default()
    };
    let mut q = LinkedQueue::try_new(&config).unwrap();

    q.insert_tail("a").unwrap();

    // The node is allocated, copying the value fails and the node is released
    assert!(matches!(q.insert_tail("toolong"), Err(Error::Alloc(_))));
    assert_eq!(q.values(), vec!["a"]);
    assert_eq!(q.node_count(), 1);
    q.check().unwrap();

    q.insert_head("b").unwrap();
    assert!(matches!(q.insert_head("c"), Err(Error::Alloc(_))));
    assert_eq!(q.values(), vec!["b", "a"]);
    q.check().unwrap();

    q.remove_head(None).unwrap();
    q.insert_tail("c").unwrap();
    assert_eq!(q.values(), vec!["a", "c"]);
}

#[test]
fn delete_middle() {
    let mut q = queue(&["a", "b", "c", "d"]);
    assert!(q.delete_middle());
    // Even length drops the later middle
    assert_eq!(q.values(), vec!["a", "b", "d"]);

    assert!(q.delete_middle());
    assert_eq!(q.values(), vec!["a", "d"]);

    assert!(q.delete_middle());
    assert_eq!(q.values(), vec!["a"]);

    assert!(q.delete_middle());
    assert!(q.is_empty());
    assert!(!q.delete_middle());
    q.check().unwrap();
}

#[test]
fn delete_duplicates() {
    let mut q = queue(&["a", "a", "b", "c", "c"]);
    assert!(q.delete_duplicates().unwrap());
    assert_eq!(q.values(), vec!["b"]);
    q.check().unwrap();

    let mut q = queue(&["a", "b", "b", "b"]);
    assert!(q.delete_duplicates().unwrap());
    assert_eq!(q.values(), vec!["a"]);

    let mut q = queue(&["x", "x"]);
    assert!(q.delete_duplicates().unwrap());
    assert!(q.is_empty());

    let mut q = queue(&["c", "b", "b", "a"]);
    assert!(q.delete_duplicates().unwrap());
    assert_eq!(q.values(), vec!["c", "a"]);

    let mut q = LinkedQueue::new();
    assert!(!q.delete_duplicates().unwrap());
}

#[test]
fn delete_duplicates_rejects_unsorted() {
    let mut q = queue(&["a", "a", "c", "b", "b"]);

    assert!(matches!(
        q.delete_duplicates(),
        Err(Error::Unsorted { index: 3 })
    ));
    assert_eq!(q.values(), vec!["a", "a", "c", "b", "b"]);
}

#[test]
fn swap_pairs() {
    let mut q = queue(&["1", "2", "3", "4", "5"]);
    q.swap_pairs();
    assert_eq!(q.values(), vec!["2", "1", "4", "3", "5"]);
    q.check().unwrap();

    let mut q = queue(&["1", "2"]);
    q.swap_pairs();
    assert_eq!(q.values(), vec!["2", "1"]);

    let mut q = queue(&["1"]);
    q.swap_pairs();
    assert_eq!(q.values(), vec!["1"]);

    let mut q = LinkedQueue::new();
    q.swap_pairs();
    assert!(q.is_empty());
}

#[test]
fn reverse() {
    let mut q = queue(&["a", "b", "c"]);
    q.reverse();
    assert_eq!(q.values(), vec!["c", "b", "a"]);
    assert_eq!(q.front(), Some("c"));
    assert_eq!(q.back(), Some("a"));
    q.check().unwrap();

    let mut q = LinkedQueue::new();
    q.reverse();
    q.check().unwrap();
}

#[test]
fn reverse_k_group() {
    let mut q = queue(&["1", "2", "3", "4", "5"]);
    q.reverse_k_group(2);
    assert_eq!(q.values(), vec!["2", "1", "4", "3", "5"]);
    q.check().unwrap();

    let mut q = queue(&["1", "2", "3", "4", "5", "6", "7"]);
    q.reverse_k_group(3);
    assert_eq!(q.values(), vec!["3", "2", "1", "6", "5", "4", "7"]);

    let mut q = queue(&["1", "2", "3"]);
    q.reverse_k_group(3);
    assert_eq!(q.values(), vec!["3", "2", "1"]);

    q.reverse_k_group(4);
    assert_eq!(q.values(), vec!["3", "2", "1"]);

    q.reverse_k_group(1);
    q.reverse_k_group(0);
    assert_eq!(q.values(), vec!["3", "2", "1"]);
    q.check().unwrap();
}

#[test]
fn sort() {
    let mut q = queue(&["pear", "apple", "fig", "banana", "apple"]);
    q.sort(false);
    assert_eq!(q.values(), vec!["apple", "apple", "banana", "fig", "pear"]);
    q.check().unwrap();

    q.sort(true);
    assert_eq!(q.values(), vec!["pear", "fig", "banana", "apple", "apple"]);
    q.check().unwrap();

    // Byte order, upper case sorts first
    let mut q = queue(&["b", "B", "a", "A"]);
    q.sort(false);
    assert_eq!(q.values(), vec!["A", "B", "a", "b"]);
}

#[test]
fn ascend_and_descend() {
    let mut q = queue(&["5", "3", "4", "1", "2"]);
    assert_eq!(q.ascend(), 2);
    assert_eq!(q.values(), vec!["1", "2"]);
    q.check().unwrap();

    let mut q = queue(&["9", "5", "7", "3", "4"]);
    assert_eq!(q.descend(), 3);
    assert_eq!(q.values(), vec!["9", "7", "4"]);
    q.check().unwrap();

    // Byte order, "13" sorts below "8"
    let mut q = queue(&["13", "8"]);
    assert_eq!(q.descend(), 1);
    assert_eq!(q.values(), vec!["8"]);
}

#[test]
fn monotonic_keeps_equal_values() {
    let mut q = queue(&["b", "a", "b", "a"]);
    assert_eq!(q.ascend(), 2);
    assert_eq!(q.values(), vec!["a", "a"]);

    let mut q = queue(&["a", "b", "a", "b"]);
    assert_eq!(q.descend(), 2);
    assert_eq!(q.values(), vec!["b", "b"]);

    let mut q = LinkedQueue::new();
    assert_eq!(q.ascend(), 0);
    assert_eq!(q.descend(), 0);

    let mut q = queue(&["z"]);
    assert_eq!(q.ascend(), 1);
    assert_eq!(q.descend(), 1);
}

#[test]
fn append_moves_everything() {
    let mut a = queue(&["a", "b"]);
    let mut b = queue(&["c", "d"]);

    a.append(&mut b).unwrap();

    assert_eq!(a.values(), vec!["a", "b", "c", "d"]);
    assert!(b.is_empty());
    a.check().unwrap();
    b.check().unwrap();
}

#[test]
fn check_detects_broken_links() {
    let mut q = queue(&["a", "b", "c"]);
    q.check().unwrap();

    let list = q.list_mut();
    let first = list.first().unwrap();
    let second = list.next(first);
    list.set_prev(second, second);

    assert!(matches!(q.check(), Err(Error::Corrupt(_))));
}

#[test]
fn check_detects_cycle_without_sentinel() {
    let mut q = queue(&["a", "b", "c", "d"]);

    let list = q.list_mut();
    let second = list.next(list.first().unwrap());
    let last = list.last().unwrap();
    list.set_next(last, second);

    assert!(matches!(q.check(), Err(Error::Corrupt(_))));
}

#[test]
fn debug_prints_values() {
    let q = queue(&["a", "b"]);
    assert_eq!(format!("{:?}", q), r#"["a", "b"]"#);
}
