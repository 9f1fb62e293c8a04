//! Sorted insertion for ordered record sequences.
//!
//! # Responsibility
//! - Insert an element into an already-sorted vector at the position
//!   preserving sort order, returning the insertion index.
//! - Provide the name comparator shared by all ordered sequences.
//!
//! # Invariants
//! - The target sequence is sorted under the supplied comparator both
//!   before and after the call.
//! - Ties insert at the first equal position found by the search, not
//!   in stable insertion order.

use crate::model::record::Record;
use std::cmp::Ordering;

/// Inserts `element` into the sorted `target`, returning its index.
///
/// Binary search narrows a `[min, max]` window until the bounds are
/// adjacent; comparator equality at a probe inserts there immediately.
/// The remaining two neighbors classify the element as prepend,
/// insert-before-max, or append.
pub fn sorted_add<T>(
    element: T,
    target: &mut Vec<T>,
    comp: impl Fn(&T, &T) -> Ordering,
) -> usize {
    if target.is_empty() {
        target.push(element);
        return 0;
    }

    let mut min_ind = 0;
    let mut max_ind = target.len() - 1;

    while max_ind - min_ind > 1 {
        let cur_ind = (min_ind + max_ind) / 2;
        match comp(&element, &target[cur_ind]) {
            Ordering::Less => max_ind = cur_ind,
            Ordering::Greater => min_ind = cur_ind,
            Ordering::Equal => {
                target.insert(cur_ind, element);
                return cur_ind;
            }
        }
    }

    let min_res = comp(&element, &target[min_ind]);
    let max_res = comp(&element, &target[max_ind]);

    if min_res == Ordering::Greater {
        if max_res == Ordering::Greater {
            target.push(element);
            target.len() - 1
        } else {
            target.insert(max_ind, element);
            max_ind
        }
    } else {
        // The narrowing loop only raises `min` past elements that
        // compare below the new one, so a non-greater result here
        // means `min_ind` is still 0.
        target.insert(0, element);
        0
    }
}

/// Three-way name comparison: lexicographic, code-point order,
/// case-sensitive.
pub fn by_record_name<R: Record>(a: &R, b: &R) -> Ordering {
    a.name().cmp(b.name())
}

#[cfg(test)]
mod tests {
    use super::sorted_add;

    fn add(element: &str, target: &mut Vec<String>) -> usize {
        sorted_add(element.to_string(), target, |a, b| a.cmp(b))
    }

    #[test]
    fn empty_target_inserts_at_zero() {
        let mut target = Vec::new();
        assert_eq!(add("Beta", &mut target), 0);
        assert_eq!(target, ["Beta"]);
    }

    #[test]
    fn later_insertion_lands_before_existing_entry() {
        let mut target = Vec::new();
        add("Beta", &mut target);
        assert_eq!(add("Alpha", &mut target), 0);
        assert_eq!(target, ["Alpha", "Beta"]);
    }

    #[test]
    fn stays_sorted_under_arbitrary_insertion_order() {
        let names = ["mercury", "argon", "zinc", "boron", "iron", "neon", "tin"];
        let mut target = Vec::new();
        for name in names {
            let index = add(name, &mut target);
            assert_eq!(target[index], name);
            let mut expected = target.clone();
            expected.sort();
            assert_eq!(target, expected);
        }
        assert_eq!(target.len(), names.len());
    }

    #[test]
    fn comparison_is_code_point_order_and_case_sensitive() {
        let mut target = Vec::new();
        add("acetone", &mut target);
        add("Zinc", &mut target);
        // Uppercase code points precede lowercase ones.
        assert_eq!(target, ["Zinc", "acetone"]);
    }

    #[test]
    fn ties_insert_at_the_first_equal_position_found() {
        let mut target: Vec<String> = ["a", "b", "b", "c", "d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let index = add("b", &mut target);
        assert_eq!(target, ["a", "b", "b", "b", "c", "d"]);
        assert!(index == 1 || index == 2);
    }

    #[test]
    fn boundary_insertions_prepend_and_append() {
        let mut target: Vec<String> = ["e", "g", "i", "k"].iter().map(|s| s.to_string()).collect();
        assert_eq!(add("a", &mut target), 0);
        assert_eq!(add("z", &mut target), target.len() - 1);
        assert_eq!(add("h", &mut target), 3);
        assert_eq!(target, ["a", "e", "g", "h", "i", "k", "z"]);
    }

    #[test]
    fn returned_index_is_the_inserted_position() {
        let mut target = Vec::new();
        for name in ["d", "b", "f", "a", "e", "c"] {
            let index = add(name, &mut target);
            assert_eq!(target[index], name);
        }
    }

    #[test]
    fn single_element_target_classifies_both_sides() {
        let mut before: Vec<String> = vec!["m".to_string()];
        assert_eq!(sorted_add("a".to_string(), &mut before, |a, b| a.cmp(b)), 0);

        let mut after: Vec<String> = vec!["m".to_string()];
        assert_eq!(sorted_add("z".to_string(), &mut after, |a, b| a.cmp(b)), 1);
    }
}
