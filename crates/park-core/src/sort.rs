//! # Stable Merge Sort
//!
//! Top-down merge sort over an owned `Vec<T>` with a caller-supplied
//! three-way comparator. Elements are moved, never cloned, so `T` needs no
//! bounds.
//!
//! ## Guarantees
//!
//! - O(n log n) comparisons, O(n) auxiliary space.
//! - Stable: when `compare(a, b)` is `Equal`, `a` keeps its place before `b`
//!   if it came first in the input.

use std::cmp::Ordering;

/// Sort `items` by `compare`, preserving the relative order of ties.
pub fn merge_sort_by<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_run(items, &mut compare)
}

/// Sort `items` by their natural order, preserving the relative order of ties.
pub fn merge_sort<T: Ord>(items: Vec<T>) -> Vec<T> {
    merge_sort_by(items, T::cmp)
}

fn sort_run<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = sort_run(items, compare);
    let right = sort_run(right, compare);
    merge(left, right, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        // Left wins ties.
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_strings_by_byte_order() {
        let names = vec!["beta", "Alpha", "alpha", "Beta"];
        assert_eq!(merge_sort(names), vec!["Alpha", "Beta", "alpha", "beta"]);
    }

    #[test]
    fn empty_and_singleton() {
        assert!(merge_sort(Vec::<u8>::new()).is_empty());
        assert_eq!(merge_sort(vec![7]), vec![7]);
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![("b", 1), ("a", 2), ("b", 3), ("a", 4), ("c", 5), ("a", 6)];
        let sorted = merge_sort_by(items, |x, y| x.0.cmp(y.0));
        assert_eq!(
            sorted,
            vec![("a", 2), ("a", 4), ("a", 6), ("b", 1), ("b", 3), ("c", 5)]
        );
    }

    #[test]
    fn moves_non_clone_values() {
        struct Token(u32);
        let sorted = merge_sort_by(vec![Token(3), Token(1), Token(2)], |a, b| a.0.cmp(&b.0));
        let order: Vec<u32> = sorted.into_iter().map(|t| t.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Agrees with the standard library's stable sort.
        #[test]
        fn matches_std_stable_sort(items in prop::collection::vec((0u8..8, any::<u16>()), 0..64)) {
            let ours = merge_sort_by(items.clone(), |a, b| a.0.cmp(&b.0));
            let mut std_sorted = items;
            std_sorted.sort_by(|a, b| a.0.cmp(&b.0));
            prop_assert_eq!(ours, std_sorted);
        }

        /// Sorting a sorted sequence changes nothing.
        #[test]
        fn idempotent(items in prop::collection::vec(any::<i32>(), 0..64)) {
            let once = merge_sort(items);
            let twice = merge_sort(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
