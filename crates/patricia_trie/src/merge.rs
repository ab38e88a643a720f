//! Combining two tries (spec §4.6): `mergeBy`, `unionL`, `unionR`.
//!
//! A single key's worth of structure (one [`Node`]) can straddle several
//! "which bit of this element are we testing" levels before an element is
//! ever fully pinned down and written out as a literal in some `Arc`'s
//! `prefix`. Merging two independently-built tries therefore needs a concrete
//! sample element from each side — [`representative`] — to check, via
//! [`crate::bits::match_prefix`], whether two branch points that happen to
//! test the same element position actually agree on every bit above the one
//! being tested, before assuming one side's mask dominates the other's. This
//! is the same shape of check `Data.IntMap`'s `mergeWithKey'` performs
//! against its cached branch prefixes; we recompute the sample on demand
//! instead of caching it on every `Branch`.

use std::rc::Rc;

use crate::bits::{match_prefix, zero_bit};
use crate::key::{common_prefix, KeyElement};
use crate::node::{arc, branch, branch_merge, Node};

fn prefix_of<E, V>(node: &Rc<Node<E, V>>) -> &[E] {
    match &**node {
        Node::Empty => &[],
        Node::Arc { prefix, .. } => prefix,
        Node::Branch { prefix, .. } => prefix,
    }
}

/// Rebuilds `node`'s outermost shape under a different own-prefix, without
/// touching its value/children. Used to "consume" a node's prefix once it
/// has already been accounted for by an enclosing comparison.
fn reprefix<E: KeyElement, V: Clone>(node: &Rc<Node<E, V>>, new_prefix: &[E]) -> Rc<Node<E, V>> {
    match &**node {
        Node::Empty => Rc::new(Node::Empty),
        Node::Arc { value, child, .. } => arc(new_prefix.into(), value.clone(), Rc::clone(child)),
        Node::Branch {
            mask, left, right, ..
        } => branch(new_prefix.into(), *mask, Rc::clone(left), Rc::clone(right)),
    }
}

/// A concrete element value drawn from some key stored under `node`, valid
/// as the `p` argument to [`match_prefix`] against any mask at or below the
/// depth `node` sits at. Every key under `node` agrees with it on every bit
/// not yet discriminated by a `Branch` between here and that key.
fn representative<E: KeyElement, V>(node: &Rc<Node<E, V>>) -> E {
    match &**node {
        Node::Empty => unreachable!("internal invariant violated: forced impossible value in representative"),
        Node::Arc { prefix, child, .. } => match prefix.first() {
            Some(&e) => e,
            None => representative(child),
        },
        Node::Branch { prefix, left, .. } => match prefix.first() {
            Some(&e) => e,
            None => representative(left),
        },
    }
}

fn combine_values<V: Clone>(f: &impl Fn(&V, &V) -> V, v1: Option<&V>, v2: Option<&V>) -> Option<V> {
    match (v1, v2) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    }
}

/// `mergeBy f t1 t2`: the union of `t1` and `t2`, combining the value with
/// `f` wherever both have a binding for the same key; a key bound in only
/// one side keeps that side's value unchanged.
pub(crate) fn merge_by<E: KeyElement, V: Clone>(
    f: impl Fn(&V, &V) -> V,
    t1: &Rc<Node<E, V>>,
    t2: &Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    go(&f, t1, t2)
}

/// `unionL t1 t2`: `mergeBy`, keeping `t1`'s value on a collision.
pub(crate) fn union_l<E: KeyElement, V: Clone>(t1: &Rc<Node<E, V>>, t2: &Rc<Node<E, V>>) -> Rc<Node<E, V>> {
    merge_by(|a, _b| a.clone(), t1, t2)
}

/// `unionR t1 t2`: `mergeBy`, keeping `t2`'s value on a collision.
pub(crate) fn union_r<E: KeyElement, V: Clone>(t1: &Rc<Node<E, V>>, t2: &Rc<Node<E, V>>) -> Rc<Node<E, V>> {
    merge_by(|_a, b| b.clone(), t1, t2)
}

fn go<E: KeyElement, V: Clone, F: Fn(&V, &V) -> V>(
    f: &F,
    t1: &Rc<Node<E, V>>,
    t2: &Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    if matches!(&**t1, Node::Empty) {
        return Rc::clone(t2);
    }
    if matches!(&**t2, Node::Empty) {
        return Rc::clone(t1);
    }

    let (shared, r1, r2) = common_prefix(prefix_of(t1), prefix_of(t2));
    if !r1.is_empty() && !r2.is_empty() {
        let t1_rest = reprefix(t1, r1);
        let t2_rest = reprefix(t2, r2);
        return arc(
            shared.into(),
            None,
            branch_merge(r1[0], t1_rest, r2[0], t2_rest),
        );
    }
    if !r1.is_empty() {
        // t2's own prefix is a (possibly empty) proper prefix of t1's: t2's
        // shape is already "aligned" here, t1 still has r1 left to consume.
        let t1_rest = reprefix(t1, r1);
        let merged = match &**t2 {
            Node::Arc { value, child, .. } => arc(Box::new([]), value.clone(), go(f, &t1_rest, child)),
            Node::Branch {
                mask, left, right, ..
            } => {
                if zero_bit(r1[0], *mask) {
                    branch(Box::new([]), *mask, go(f, &t1_rest, left), Rc::clone(right))
                } else {
                    branch(Box::new([]), *mask, Rc::clone(left), go(f, &t1_rest, right))
                }
            }
            Node::Empty => unreachable!(),
        };
        return arc(shared.into(), None, merged);
    }
    if !r2.is_empty() {
        let t2_rest = reprefix(t2, r2);
        let merged = match &**t1 {
            Node::Arc { value, child, .. } => arc(Box::new([]), value.clone(), go(f, child, &t2_rest)),
            Node::Branch {
                mask, left, right, ..
            } => {
                if zero_bit(r2[0], *mask) {
                    branch(Box::new([]), *mask, go(f, left, &t2_rest), Rc::clone(right))
                } else {
                    branch(Box::new([]), *mask, Rc::clone(left), go(f, right, &t2_rest))
                }
            }
            Node::Empty => unreachable!(),
        };
        return arc(shared.into(), None, merged);
    }

    // Both prefixes fully consumed and identical: combine by shape.
    let merged = match (&**t1, &**t2) {
        (
            Node::Arc {
                value: v1,
                child: c1,
                ..
            },
            Node::Arc {
                value: v2,
                child: c2,
                ..
            },
        ) => arc(Box::new([]), combine_values(f, v1.as_ref(), v2.as_ref()), go(f, c1, c2)),
        (
            Node::Arc {
                value: v1,
                child: c1,
                ..
            },
            Node::Branch {
                mask,
                left,
                right,
                ..
            },
        ) => {
            let t2_here = branch(Box::new([]), *mask, Rc::clone(left), Rc::clone(right));
            arc(Box::new([]), v1.clone(), go(f, c1, &t2_here))
        }
        (
            Node::Branch {
                mask,
                left,
                right,
                ..
            },
            Node::Arc {
                value: v2,
                child: c2,
                ..
            },
        ) => {
            let t1_here = branch(Box::new([]), *mask, Rc::clone(left), Rc::clone(right));
            arc(Box::new([]), v2.clone(), go(f, &t1_here, c2))
        }
        (
            Node::Branch {
                mask: m1,
                left: l1,
                right: r1b,
                ..
            },
            Node::Branch {
                mask: m2,
                left: l2,
                right: r2b,
                ..
            },
        ) => merge_branches(f, *m1, l1, r1b, *m2, l2, r2b, t1, t2),
        _ => unreachable!("internal invariant violated: forced impossible value in merge_by"),
    };
    arc(shared.into(), None, merged)
}

#[allow(clippy::too_many_arguments)]
fn merge_branches<E: KeyElement, V: Clone, F: Fn(&V, &V) -> V>(
    f: &F,
    m1: E,
    l1: &Rc<Node<E, V>>,
    r1: &Rc<Node<E, V>>,
    m2: E,
    l2: &Rc<Node<E, V>>,
    r2: &Rc<Node<E, V>>,
    t1_whole: &Rc<Node<E, V>>,
    t2_whole: &Rc<Node<E, V>>,
) -> Rc<Node<E, V>> {
    let p1 = representative(t1_whole);
    let p2 = representative(t2_whole);

    if m1 == m2 {
        if match_prefix(p2, p1, m1) {
            branch(Box::new([]), m1, go(f, l1, l2), go(f, r1, r2))
        } else {
            branch_merge(p1, Rc::clone(t1_whole), p2, Rc::clone(t2_whole))
        }
    } else if m1 > m2 {
        if !match_prefix(p2, p1, m1) {
            branch_merge(p1, Rc::clone(t1_whole), p2, Rc::clone(t2_whole))
        } else if zero_bit(p2, m1) {
            branch(Box::new([]), m1, go(f, l1, t2_whole), Rc::clone(r1))
        } else {
            branch(Box::new([]), m1, Rc::clone(l1), go(f, r1, t2_whole))
        }
    } else if !match_prefix(p1, p2, m2) {
        branch_merge(p1, Rc::clone(t1_whole), p2, Rc::clone(t2_whole))
    } else if zero_bit(p1, m2) {
        branch(Box::new([]), m2, go(f, t1_whole, l2), Rc::clone(r2))
    } else {
        branch(Box::new([]), m2, Rc::clone(l2), go(f, t1_whole, r2))
    }
}
