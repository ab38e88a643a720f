//! Whole-trie value transforms (spec §4.8): `mapBy`, total over every
//! binding, and `filterMap`, which may additionally delete a binding.
//!
//! Both traverse the full trie once, accumulating the path consumed so far
//! so `f` can be called with each binding's complete key (spec: "key = full
//! path to that value"), not just the local arc prefix.

use std::rc::Rc;

use crate::key::KeyElement;
use crate::node::{arc, branch, concat, Node};

/// `mapBy f t`: every value replaced by `f(key, value)`, where `key` is the
/// full path from the root to that binding. The resulting value type `W` may
/// differ from `V`; no binding is ever removed (`f` is total).
pub(crate) fn map_by<E: KeyElement, V, W: Clone>(
    node: &Rc<Node<E, V>>,
    prefix: &[E],
    f: &mut impl FnMut(&[E], &V) -> W,
) -> Rc<Node<E, W>> {
    match &**node {
        Node::Empty => Rc::new(Node::Empty),
        Node::Arc {
            prefix: p,
            value,
            child,
        } => {
            let full = concat(prefix, p);
            let new_value = value.as_ref().map(|v| f(&full, v));
            let new_child = map_by(child, &full, f);
            arc(p.clone(), new_value, new_child)
        }
        Node::Branch {
            prefix: p,
            mask,
            left,
            right,
        } => {
            let full = concat(prefix, p);
            let new_left = map_by(left, &full, f);
            let new_right = map_by(right, &full, f);
            branch(p.clone(), *mask, new_left, new_right)
        }
    }
}

/// `filterMap f t`: like [`map_by`], but `f` may return `None` to delete the
/// binding; invariants I1–I4 are restored bottom-up through the smart
/// constructors exactly as in [`crate::alter::alter_by`].
pub(crate) fn filter_map<E: KeyElement, V, W: Clone>(
    node: &Rc<Node<E, V>>,
    prefix: &[E],
    f: &mut impl FnMut(&[E], &V) -> Option<W>,
) -> Rc<Node<E, W>> {
    match &**node {
        Node::Empty => Rc::new(Node::Empty),
        Node::Arc {
            prefix: p,
            value,
            child,
        } => {
            let full = concat(prefix, p);
            let new_value = value.as_ref().and_then(|v| f(&full, v));
            let new_child = filter_map(child, &full, f);
            arc(p.clone(), new_value, new_child)
        }
        Node::Branch {
            prefix: p,
            mask,
            left,
            right,
        } => {
            let full = concat(prefix, p);
            let new_left = filter_map(left, &full, f);
            let new_right = filter_map(right, &full, f);
            branch(p.clone(), *mask, new_left, new_right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alter::insert;
    use crate::lookup::lookup;

    fn build(pairs: &[(&[u8], i32)]) -> Rc<Node<u8, i32>> {
        let mut root = Rc::new(Node::Empty);
        for (k, v) in pairs {
            root = insert(&root, k, *v);
        }
        root
    }

    #[test]
    fn map_by_transforms_every_value_with_its_full_key() {
        let t = build(&[(b"a", 1), (b"abc", 2)]);
        let mapped = map_by(&t, &[], &mut |k, v| (k.to_vec(), *v * 10));
        assert_eq!(lookup(&mapped, b"a"), Some(&(b"a".to_vec(), 10)));
        assert_eq!(lookup(&mapped, b"abc"), Some(&(b"abc".to_vec(), 20)));
    }

    #[test]
    fn filter_map_deletes_bindings_that_return_none() {
        let t = build(&[(b"a", 1), (b"abc", 2), (b"b", 3)]);
        let filtered = filter_map(&t, &[], &mut |_k, v| if *v % 2 == 0 { Some(*v) } else { None });
        assert_eq!(lookup(&filtered, b"a"), None);
        assert_eq!(lookup(&filtered, b"abc"), Some(&2));
        assert_eq!(lookup(&filtered, b"b"), None);
    }

    #[test]
    fn filter_map_restores_invariants_after_deleting_everything() {
        let t = build(&[(b"a", 1), (b"abc", 2)]);
        let filtered = filter_map(&t, &[], &mut |_k, _v| None::<i32>);
        assert!(matches!(&*filtered, Node::Empty));
    }
}
