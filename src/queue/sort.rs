use std::cmp::Ordering;

use crate::list::{List, NodeId};

/// Merge sort the list in place.
///
/// The cycle is cut first so the recursion works on a plain chain that ends
/// in `NodeId::NONE`, only `next` links are maintained while sorting. The
/// `prev` links and the circle through the sentinel are rebuilt at the end.
pub(super) fn sort<T: Ord>(list: &mut List<T>, descending: bool) {
    let head = list.head();

    // Empty or a single node.
    if list.next(head) == list.prev(head) {
        return;
    }

    let last = list.prev(head);
    list.set_next(last, NodeId::NONE);

    let start = list.next(head);
    let first = merge_sort(list, start, descending);

    let mut prev = head;
    let mut id = first;
    list.set_next(head, first);

    while !id.is_none() {
        list.set_prev(id, prev);
        prev = id;
        id = list.next(id);
    }

    list.set_next(prev, head);
    list.set_prev(head, prev);
}

fn merge_sort<T: Ord>(list: &mut List<T>, first: NodeId, descending: bool) -> NodeId {
    if first.is_none() || list.next(first).is_none() {
        return first;
    }

    let mut slow = first;
    let mut fast = first;

    loop {
        let next = list.next(fast);
        if next.is_none() || list.next(next).is_none() {
            break;
        }

        slow = list.next(slow);
        fast = list.next(next);
    }

    let second = list.next(slow);
    list.set_next(slow, NodeId::NONE);

    let left = merge_sort(list, first, descending);
    let right = merge_sort(list, second, descending);

    merge(list, left, right, descending)
}

fn merge<T: Ord>(
    list: &mut List<T>,
    mut left: NodeId,
    mut right: NodeId,
    descending: bool,
) -> NodeId {
    let mut first = NodeId::NONE;
    let mut tail = NodeId::NONE;

    while !left.is_none() && !right.is_none() {
        let ord = list.value(left).cmp(&list.value(right));

        // Ties go to the left run, that keeps the sort stable.
        let take_left = if descending {
            ord != Ordering::Less
        } else {
            ord != Ordering::Greater
        };

        let id = if take_left {
            let id = left;
            left = list.next(left);
            id
        } else {
            let id = right;
            right = list.next(right);
            id
        };

        if tail.is_none() {
            first = id;
        } else {
            list.set_next(tail, id);
        }
        tail = id;
    }

    let rest = if left.is_none() { right } else { left };

    if tail.is_none() {
        rest
    } else {
        list.set_next(tail, rest);
        first
    }
}
