//! Trie nodes (L3): the algebraic shape of the trie and the smart
//! constructors that re-establish invariants I1–I4 on every rebuild.
//!
//! No algorithm outside this module is allowed to build a [`Node`] variant
//! directly; everything goes through [`arc`], [`branch`] or [`branch_merge`]
//! so that I1–I4 hold after every operation (see spec §3, §4.3).
//!
//! Child pointers are [`Rc`] rather than `Box`: an update only allocates
//! along the spine from the root to the changed key, and every off-spine
//! subtrie is shared, by reference count, between the old and new roots
//! (spec §5 "Ownership").

use std::rc::Rc;

use crate::bits::{branching_bit, zero_bit};
use crate::key::KeyElement;

/// One node of the trie.
///
/// See spec §3 for the full invariant list (I1–I5). `PartialEq`/`Eq` fall
/// directly out of I1–I4: because the smart constructors keep the shape
/// canonical (I5), two tries with the same bindings are the same shape, so
/// structural (derived) equality is set equality.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Node<E, V> {
    /// No bindings.
    Empty,
    /// All keys of the form `prefix ++ k` for `k` a key of `child`. If
    /// `value` is present, `prefix` itself is bound to it. `child` is
    /// never itself an `Arc` (I2).
    Arc {
        prefix: Box<[E]>,
        value: Option<V>,
        child: Rc<Node<E, V>>,
    },
    /// All keys begin with `prefix`; the element following it decides
    /// direction via `mask`. Both children are non-empty (I4).
    Branch {
        prefix: Box<[E]>,
        mask: E,
        left: Rc<Node<E, V>>,
        right: Rc<Node<E, V>>,
    },
}

/// Concatenates two key fragments into an owned, compressed prefix.
pub(crate) fn concat<E: Clone>(a: &[E], b: &[E]) -> Box<[E]> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out.into_boxed_slice()
}

/// Smart constructor for `Arc(prefix, value, child)` (spec §4.3).
///
/// Restores I1 (no dead empty arcs) and I2 (arc-arc fusion): an absent
/// value collapses into the child, and an absent value over an `Arc` child
/// fuses the two prefixes into one. A present value never fuses with an
/// `Arc` child — a value bound partway along a compressed edge cannot be
/// represented by a single flattened arc, so `child` being `Arc`-shaped
/// while `value` is present indicates a caller bug, not a shape this
/// constructor needs to normalize.
pub(crate) fn arc<E: KeyElement, V: Clone>(
    prefix: Box<[E]>,
    value: Option<V>,
    child: Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    if value.is_none() {
        return match &*child {
            Node::Empty => Rc::new(Node::Empty),
            Node::Arc {
                prefix: q,
                value: v2,
                child: c2,
            } => arc(concat(&prefix, q), v2.clone(), Rc::clone(c2)),
            Node::Branch { .. } => {
                if prefix.is_empty() {
                    child
                } else {
                    Rc::new(Node::Arc {
                        prefix,
                        value: None,
                        child,
                    })
                }
            }
        };
    }

    debug_assert!(
        !matches!(&*child, Node::Arc { .. }),
        "internal invariant violated: forced impossible value in arc"
    );
    Rc::new(Node::Arc {
        prefix,
        value,
        child,
    })
}

/// Smart constructor for `Branch(prefix, mask, left, right)` (spec §4.3).
///
/// Restores I4 (non-trivial branches): if either side is empty, the branch
/// collapses to an arc over the surviving side.
pub(crate) fn branch<E: KeyElement, V: Clone>(
    prefix: Box<[E]>,
    mask: E,
    left: Rc<Node<E, V>>,
    right: Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    if matches!(&*left, Node::Empty) {
        return arc(prefix, None, right);
    }
    if matches!(&*right, Node::Empty) {
        return arc(prefix, None, left);
    }
    Rc::new(Node::Branch {
        prefix,
        mask,
        left,
        right,
    })
}

/// Joins two non-empty subtries `t1` and `t2` whose first key elements `p`
/// and `q` differ, producing a `Branch` with an empty own prefix (spec
/// §4.3). The caller is responsible for peeling off and re-wrapping any key
/// prefix shared by `t1` and `t2` before the divergence at `p`/`q`.
pub(crate) fn branch_merge<E: KeyElement, V: Clone>(
    p: E,
    t1: Rc<Node<E, V>>,
    q: E,
    t2: Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    debug_assert!(
        !matches!(&*t1, Node::Empty) && !matches!(&*t2, Node::Empty),
        "internal invariant violated: forced impossible value in branch_merge"
    );
    debug_assert_ne!(
        p, q,
        "internal invariant violated: forced impossible value in branch_merge"
    );

    let mask = branching_bit(p, q);
    let empty_prefix: Box<[E]> = Box::new([]);
    if zero_bit(p, mask) {
        branch(empty_prefix, mask, t1, t2)
    } else {
        branch(empty_prefix, mask, t2, t1)
    }
}
