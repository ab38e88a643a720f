//! Prefix matching (spec §4.7): `match_`, the longest stored key that is a
//! prefix of a query, and `matches_`, the lazy sequence of all such prefixes
//! in increasing length order.
//!
//! Both walk the same path as [`crate::lookup::descend`], but rather than
//! stopping at the first terminal case they record every value found at a
//! proper (or equal) prefix of the query along the way, because a query may
//! pass through several stored keys on its way down (`"a"`, `"abc"`,
//! `"abcde"` all being prefixes of `"abcdef"`).

use std::rc::Rc;

use crate::bits::zero_bit;
use crate::key::{common_prefix, KeyElement};
use crate::node::Node;

/// One hit produced while walking a query down the trie: `len` elements of
/// the query were consumed to reach a stored key, and `value` is bound to
/// that key. `value` borrows from the trie (lifetime `'n`), independent of
/// however long the query slice itself (lifetime `'q`) happens to live.
pub(crate) struct Hit<'n, V> {
    pub(crate) len: usize,
    pub(crate) value: &'n V,
}

/// Lazily enumerates every stored key that is a prefix of `query`, in
/// strictly increasing order of length (spec §4.7).
///
/// A good producer for iterator fusion: built from a plain recursive descent
/// with no intermediate `Vec`, so callers that only want the first hit (or
/// the first `n`) never pay for hits beyond what they consume.
///
/// Two independent lifetimes: `'n` for the trie nodes (what the yielded
/// values borrow from) and `'q` for the query slice (only ever sliced
/// internally, never returned), so a caller is not forced to keep the query
/// alive as long as the trie itself.
pub(crate) struct Matches<'n, 'q, E, V> {
    /// Stack of `(node, consumed_so_far, remaining_query)` frames still to
    /// visit, innermost (next to yield from) last.
    stack: Vec<(&'n Rc<Node<E, V>>, usize, &'q [E])>,
}

impl<'n, 'q, E: KeyElement, V: Clone> Matches<'n, 'q, E, V> {
    pub(crate) fn new(root: &'n Rc<Node<E, V>>, query: &'q [E]) -> Self {
        Matches {
            stack: vec![(root, 0, query)],
        }
    }
}

impl<'n, 'q, E: KeyElement, V: Clone> Iterator for Matches<'n, 'q, E, V> {
    type Item = Hit<'n, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, consumed, query)) = self.stack.pop() {
            match &**node {
                Node::Empty => {}
                Node::Arc {
                    prefix,
                    value,
                    child,
                } => {
                    let (_, q_rest, p_rest) = common_prefix(query, prefix);
                    if !p_rest.is_empty() {
                        // Query diverges from, or ends inside, this arc's
                        // prefix: no further descent is possible, but a
                        // value exactly at the arc's own key can still be a
                        // hit only when the whole prefix was consumed,
                        // which is exactly the p_rest.is_empty() case below.
                        continue;
                    }
                    let new_consumed = consumed + prefix.len();
                    self.stack.push((child, new_consumed, q_rest));
                    if let Some(v) = value {
                        return Some(Hit {
                            len: new_consumed,
                            value: v,
                        });
                    }
                }
                Node::Branch {
                    prefix,
                    mask,
                    left,
                    right,
                } => {
                    let (_, q_rest, cp_rest) = common_prefix(query, prefix);
                    if !cp_rest.is_empty() || q_rest.is_empty() {
                        // Query ends inside (or diverges from) the branch's
                        // own common prefix: no stored value lives here
                        // (branches never carry one), and no side can be
                        // reached.
                        continue;
                    }
                    let new_consumed = consumed + prefix.len();
                    if zero_bit(q_rest[0], *mask) {
                        self.stack.push((left, new_consumed, q_rest));
                    } else {
                        self.stack.push((right, new_consumed, q_rest));
                    }
                }
            }
        }
        None
    }
}

/// `match_ q t`: the longest stored key that is a prefix of `q`, with its
/// value and the count of leftover (unconsumed) query elements. `None` if no
/// stored key is a prefix of `q`.
///
/// Because hits are produced in strictly increasing `len` order, the longest
/// is simply the last one the iterator yields; we still only walk the path
/// once rather than materialising every hit.
pub(crate) fn match_longest<'n, 'q, E: KeyElement, V: Clone>(
    node: &'n Rc<Node<E, V>>,
    query: &'q [E],
) -> Option<(usize, &'n V)> {
    Matches::new(node, query)
        .last()
        .map(|hit| (hit.len, hit.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alter::insert;

    fn build(pairs: &[(&[u8], i32)]) -> Rc<Node<u8, i32>> {
        let mut root = Rc::new(Node::Empty);
        for (k, v) in pairs {
            root = insert(&root, k, *v);
        }
        root
    }

    #[test]
    fn match_picks_longest_prefix() {
        let t = build(&[(b"a", 1), (b"abc", 2), (b"abcde", 3)]);
        let (len, v) = match_longest(&t, b"abcd").expect("some prefix matches");
        assert_eq!(len, 3);
        assert_eq!(*v, 2);
    }

    #[test]
    fn match_exact_key_matches_its_full_length() {
        let t = build(&[(b"abc", 2)]);
        let (len, v) = match_longest(&t, b"abc").expect("exact key matches itself");
        assert_eq!(len, 3);
        assert_eq!(*v, 2);
    }

    #[test]
    fn match_empty_key_only_matches_empty_stored_key() {
        let t = build(&[(b"", 0), (b"a", 1)]);
        let (len, v) = match_longest(&t, b"").expect("empty key matches the empty binding");
        assert_eq!(len, 0);
        assert_eq!(*v, 0);
    }

    #[test]
    fn match_none_when_query_diverges_immediately() {
        let t = build(&[(b"abc", 2)]);
        assert!(match_longest(&t, b"xyz").is_none());
    }

    #[test]
    fn matches_enumerates_every_prefix_in_increasing_length_order() {
        let t = build(&[(b"a", 1), (b"abc", 2), (b"abcde", 3)]);
        let hits: Vec<(usize, i32)> = Matches::new(&t, b"abcdef")
            .map(|hit| (hit.len, *hit.value))
            .collect();
        assert_eq!(hits, vec![(1, 1), (3, 2), (5, 3)]);
    }

    #[test]
    fn matches_stops_at_divergence() {
        let t = build(&[(b"a", 1), (b"ab", 2), (b"xy", 9)]);
        let hits: Vec<(usize, i32)> = Matches::new(&t, b"abz")
            .map(|hit| (hit.len, *hit.value))
            .collect();
        assert_eq!(hits, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn matches_is_empty_when_nothing_matches() {
        let t = build(&[(b"abc", 2)]);
        assert_eq!(Matches::new(&t, b"xyz").count(), 0);
    }
}
