//! A persistent, immutable associative map keyed by byte strings or UTF-16
//! code-unit sequences, implemented as a big-endian Patricia trie with
//! compressed edge labels.
//!
//! The trie supports logarithmic-time point lookup, insertion, deletion,
//! submap extraction and structural merge, plus prefix matching: given a
//! query, find the longest (or all) stored keys that are prefixes of it.
//!
//! Every operation is persistent: it returns a new [`Trie`] sharing whatever
//! subtries the update didn't touch with the trie it was called on, rather
//! than mutating in place. There is no ordering comparator; the sort order
//! exposed by [`Trie::to_list`] and friends is fixed by the big-endian bit
//! representation of the key-element type `E` (see [`KeyElement`]).
//!
//! ```
//! use patricia_trie::ByteTrie;
//!
//! let t = ByteTrie::new()
//!     .insert(b"foo", 1)
//!     .insert(b"foobar", 2);
//! assert_eq!(t.lookup(b"foo"), Some(&1));
//! assert_eq!(t.lookup(b"foobar"), Some(&2));
//!
//! let (prefix, value, leftover) = t.longest_prefix_match(b"foobarbaz").unwrap();
//! assert_eq!((prefix, *value, leftover), (b"foobar".as_slice(), 2, b"baz".as_slice()));
//! ```

#![warn(missing_docs)]

mod alter;
mod bits;
#[cfg(test)]
mod invariants;
mod key;
mod list;
mod lookup;
mod merge;
mod node;
mod prefix_match;
mod transform;

use std::rc::Rc;

pub use key::KeyElement;
use node::Node;

/// A persistent Patricia trie mapping keys of element type `E` to values of
/// type `V`.
///
/// Construct with [`Trie::new`]/[`Trie::default`] (the empty trie) or
/// [`Trie::singleton`]; every other method takes `&self` and returns a new,
/// independent `Trie` without mutating the receiver (spec §5 "Ownership").
/// Unchanged subtries are shared by reference count with the original, so an
/// `alter`/`insert`/`delete` allocates only along the spine from the root to
/// the changed key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trie<E, V> {
    root: Rc<Node<E, V>>,
}

impl<E, V> Default for Trie<E, V> {
    fn default() -> Self {
        Trie {
            root: Rc::new(Node::Empty),
        }
    }
}

impl<E: KeyElement, V: Clone> Trie<E, V> {
    /// The empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// The trie containing exactly the binding `key ↦ value`.
    pub fn singleton(key: &[E], value: V) -> Self {
        Trie::new().insert(key, value)
    }

    /// Whether `self` has no bindings at all (spec's `null`).
    pub fn is_empty(&self) -> bool {
        list::is_empty(&self.root)
    }

    /// The number of bindings in `self`. O(n): not cached (spec §3 "Size").
    pub fn len(&self) -> usize {
        list::size(&self.root)
    }

    /// `Some(&v)` if `key` is bound to `v`, else `None`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn lookup(&self, key: &[E]) -> Option<&V> {
        lookup::lookup(&self.root, key)
    }

    /// Whether `key` is bound in `self`.
    pub fn member(&self, key: &[E]) -> bool {
        lookup::member(&self.root, key)
    }

    /// The subtrie of every binding whose key has `key` as a prefix, rekeyed
    /// so those keys retain their original spelling.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn submap(&self, key: &[E]) -> Self {
        Trie {
            root: lookup::submap(&self.root, key),
        }
    }

    /// The binding at `key` set to `value`, overriding any prior value.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, value)))]
    pub fn insert(&self, key: &[E], value: V) -> Self {
        Trie {
            root: alter::insert(&self.root, key, value),
        }
    }

    /// `key ↦ f(v)` if `key ↦ v` is bound in `self`; otherwise `self`
    /// unchanged (and, if nothing changed, the very same shared root).
    pub fn adjust(&self, key: &[E], f: impl FnOnce(&V) -> V) -> Self {
        Trie {
            root: alter::adjust(&self.root, key, f),
        }
    }

    /// `self` with any binding at `key` removed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn delete(&self, key: &[E]) -> Self {
        Trie {
            root: alter::delete(&self.root, key),
        }
    }

    /// `self` with every binding whose key has `key` as a prefix removed, in
    /// one direct structural splice rather than enumerating and deleting
    /// each matching key one by one (spec §9's `deleteSubmap` Open
    /// Question; see DESIGN.md).
    pub fn delete_submap(&self, key: &[E]) -> Self {
        Trie {
            root: alter::delete_submap(&self.root, key),
        }
    }

    /// The generic single-key rewrite: the binding at `key` becomes
    /// `f(lookup(key))`, removed if `f` returns `None`. [`Trie::insert`],
    /// [`Trie::delete`] and [`Trie::adjust`] are all one-line calls to this.
    pub fn alter_by(&self, key: &[E], f: impl FnOnce(Option<&V>) -> Option<V>) -> Self {
        Trie {
            root: alter::alter_by(&self.root, key, f),
        }
    }

    /// The union of `self` and `other`, combining the value with `f`
    /// wherever both have a binding for the same key; a key bound in only
    /// one side keeps that side's value.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, other, f)))]
    pub fn merge_by(&self, other: &Self, f: impl Fn(&V, &V) -> V) -> Self {
        Trie {
            root: merge::merge_by(f, &self.root, &other.root),
        }
    }

    /// `merge_by`, keeping `self`'s value on a collision.
    pub fn union_l(&self, other: &Self) -> Self
    where
        V: Clone,
    {
        Trie {
            root: merge::union_l(&self.root, &other.root),
        }
    }

    /// `merge_by`, keeping `other`'s value on a collision.
    pub fn union_r(&self, other: &Self) -> Self
    where
        V: Clone,
    {
        Trie {
            root: merge::union_r(&self.root, &other.root),
        }
    }

    /// The longest stored key that is a prefix of `query`: its key, its
    /// value, and the unconsumed remainder of `query`. `None` if no stored
    /// key is a prefix of `query` (spec's `match`; the empty key matches
    /// only the empty key).
    pub fn longest_prefix_match<'q>(&self, query: &'q [E]) -> Option<(&'q [E], &V, &'q [E])> {
        prefix_match::match_longest(&self.root, query).map(|(len, v)| (&query[..len], v, &query[len..]))
    }

    /// The lazy, strictly-increasing-by-length sequence of every stored key
    /// that is a prefix of `query` (spec's `matches`). Yields `(prefix,
    /// value, leftover)` triples, each `prefix ++ leftover == query`.
    pub fn matches<'a>(&'a self, query: &'a [E]) -> Matches<'a, E, V> {
        Matches {
            inner: prefix_match::Matches::new(&self.root, query),
            query,
        }
    }

    /// Every value transformed by `f(key, value)`, where `key` is the full
    /// path from the root to that binding. No binding is ever removed.
    pub fn map_by<W: Clone>(&self, mut f: impl FnMut(&[E], &V) -> W) -> Trie<E, W> {
        Trie {
            root: transform::map_by(&self.root, &[], &mut f),
        }
    }

    /// Like [`Trie::map_by`], but `f` may return `None` to delete the
    /// binding; invariants are restored through the smart constructors.
    pub fn filter_map<W: Clone>(&self, mut f: impl FnMut(&[E], &V) -> Option<W>) -> Trie<E, W> {
        Trie {
            root: transform::filter_map(&self.root, &[], &mut f),
        }
    }

    /// Every binding as `(key, &value)`, in strictly increasing big-endian
    /// bit order (spec's `toList`).
    pub fn to_list(&self) -> Iter<'_, E, V> {
        Iter(list::Iter::new(&self.root))
    }

    /// Every key, in the same order as [`Trie::to_list`] (spec's `keys`).
    pub fn keys(&self) -> Keys<'_, E, V> {
        Keys(list::Iter::new(&self.root))
    }

    /// Every value, keyed in the same order as [`Trie::to_list`] (spec's
    /// `elems`).
    pub fn values(&self) -> Values<'_, E, V> {
        Values(list::Iter::new(&self.root))
    }
}

impl<E: KeyElement, V: Clone> FromIterator<(Box<[E]>, V)> for Trie<E, V> {
    /// Builds a trie from `(key, value)` pairs where an earlier pair shadows
    /// a later one with the same key (spec's `fromList`), rather than the
    /// usual last-write-wins behaviour of repeated `insert`.
    fn from_iter<I: IntoIterator<Item = (Box<[E]>, V)>>(iter: I) -> Self {
        Trie {
            root: list::from_list(iter),
        }
    }
}

impl<'a, E: KeyElement, V: Clone> IntoIterator for &'a Trie<E, V> {
    type Item = (Box<[E]>, &'a V);
    type IntoIter = Iter<'a, E, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_list()
    }
}

/// Iterator over `(key, &value)` pairs in sorted order; see [`Trie::to_list`].
pub struct Iter<'a, E, V>(list::Iter<'a, E, V>);

impl<'a, E: Clone, V> Iterator for Iter<'a, E, V> {
    type Item = (Box<[E]>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// Iterator over keys in sorted order; see [`Trie::keys`].
pub struct Keys<'a, E, V>(list::Iter<'a, E, V>);

impl<'a, E: Clone, V> Iterator for Keys<'a, E, V> {
    type Item = Box<[E]>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
}

/// Iterator over values, keyed in sorted order; see [`Trie::values`].
pub struct Values<'a, E, V>(list::Iter<'a, E, V>);

impl<'a, E: Clone, V> Iterator for Values<'a, E, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

/// Lazy sequence of every stored key that is a prefix of a query, in
/// strictly increasing length order; see [`Trie::matches`].
pub struct Matches<'a, E, V> {
    inner: prefix_match::Matches<'a, 'a, E, V>,
    query: &'a [E],
}

impl<'a, E: KeyElement, V: Clone> Iterator for Matches<'a, E, V> {
    type Item = (&'a [E], &'a V, &'a [E]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|hit| {
            (
                &self.query[..hit.len],
                hit.value,
                &self.query[hit.len..],
            )
        })
    }
}

/// Convenience alias for byte-keyed tries (spec §6's "byte-key
/// instantiation", `E = u8`).
pub type ByteTrie<V> = Trie<u8, V>;

/// Convenience alias for UTF-16-keyed tries (spec §6's "16-bit text
/// instantiation", `E = u16`).
pub type Utf16Trie<V> = Trie<u16, V>;

impl<V: Clone> Trie<u16, V> {
    /// Builds the key by encoding `s` as UTF-16 code units.
    pub fn insert_str(&self, s: &str, value: V) -> Self {
        let key: Vec<u16> = s.encode_utf16().collect();
        self.insert(&key, value)
    }

    /// Looks up the binding for `s`, encoded as UTF-16 code units.
    pub fn lookup_str(&self, s: &str) -> Option<&V> {
        let key: Vec<u16> = s.encode_utf16().collect();
        self.lookup(&key)
    }
}
