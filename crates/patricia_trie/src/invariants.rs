//! Whole-trie structural invariant checker (spec §3's I1–I4), used only by
//! the property-test harness. White-box on purpose: it needs to see
//! [`Node`]'s shape directly, which the public `Trie` API never exposes.

#![cfg(test)]

use std::rc::Rc;

use crate::key::KeyElement;
use crate::node::Node;

/// One element drawn from some key stored under `node`, for checking I3
/// (branch discrimination) against a mask at or above this subtree's depth.
/// Mirrors [`crate::merge::representative`]'s shape; duplicated here rather
/// than exposed from `merge` because it exists purely to support this
/// test-only checker.
fn representative<E: Copy, V>(node: &Rc<Node<E, V>>) -> Option<E> {
    match &**node {
        Node::Empty => None,
        Node::Arc { prefix, child, .. } => prefix.first().copied().or_else(|| representative(child)),
        Node::Branch { prefix, left, .. } => prefix.first().copied().or_else(|| representative(left)),
    }
}

/// Recursively checks I1–I4 over every subtrie of `node`. Returns `Ok(())`
/// or a human-readable description of the first violation found.
pub(crate) fn check_invariants<E: KeyElement, V>(node: &Rc<Node<E, V>>) -> Result<(), String> {
    match &**node {
        Node::Empty => Ok(()),
        Node::Arc { value, child, .. } => {
            if matches!(&**child, Node::Arc { .. }) {
                return Err("I2 violated: Arc directly wraps an Arc child".to_string());
            }
            if value.is_none() && matches!(&**child, Node::Empty) {
                return Err("I1 violated: dead Arc with no value and an Empty child".to_string());
            }
            check_invariants(child)
        }
        Node::Branch { mask, left, right, .. } => {
            if matches!(&**left, Node::Empty) || matches!(&**right, Node::Empty) {
                return Err("I4 violated: a Branch has an Empty child".to_string());
            }
            if let Some(l) = representative(left) {
                if !crate::bits::zero_bit(l, *mask) {
                    return Err("I3 violated: left child disagrees with mask".to_string());
                }
            }
            if let Some(r) = representative(right) {
                if crate::bits::zero_bit(r, *mask) {
                    return Err("I3 violated: right child disagrees with mask".to_string());
                }
            }
            check_invariants(left)?;
            check_invariants(right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alter::{delete, insert};

    #[test]
    fn invariants_hold_after_a_representative_sequence() {
        let mut root: Rc<Node<u8, i32>> = Rc::new(Node::Empty);
        for (k, v) in [
            (b"a".as_slice(), 1),
            (b"abc", 2),
            (b"abcde", 3),
            (b"b", 4),
            (b"abcdf", 5),
        ] {
            root = insert(&root, k, v);
            check_invariants(&root).expect("invariants hold after insert");
        }
        root = delete(&root, b"abc");
        check_invariants(&root).expect("invariants hold after delete");
        root = delete(&root, b"abcde");
        check_invariants(&root).expect("invariants hold after second delete");
    }

    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(Vec<u8>, i32),
        Delete(Vec<u8>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // Short keys drawn from a tiny alphabet so insert/delete sequences
        // actually exercise shared-prefix arc splits and branch merges
        // instead of almost always being pairwise disjoint.
        let key = proptest::collection::vec(0u8..4, 0..4);
        prop_oneof![
            (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            key.prop_map(Op::Delete),
        ]
    }

    proptest! {
        // P12: every produced trie satisfies I1-I4, after any sequence of
        // inserts and deletes.
        #[test]
        fn p12_structural_invariants_hold_after_any_op_sequence(ops in proptest::collection::vec(op_strategy(), 0..50)) {
            let mut root: Rc<Node<u8, i32>> = Rc::new(Node::Empty);
            for op in ops {
                root = match op {
                    Op::Insert(k, v) => insert(&root, &k, v),
                    Op::Delete(k) => delete(&root, &k),
                };
                prop_assert!(check_invariants(&root).is_ok());
            }
        }
    }
}
