//! Bit arithmetic (L2) over a single key element.

use crate::key::KeyElement;

/// The highest-order bit at which `p` and `q` differ, as a mask with exactly
/// one bit set. Precondition: `p != q`.
///
/// `mask(p, q) = highestSetBit(p XOR q)`: the left subtrie holds keys whose
/// first differing element has a `0` at this bit, the right subtrie the
/// rest (see [`zero_bit`]).
pub fn branching_bit<E: KeyElement>(p: E, q: E) -> E {
    debug_assert_ne!(p, q, "internal invariant violated: forced impossible value in branching_bit");
    (p ^ q).highest_set_bit()
}

/// Whether `e` has a `0` at the single set bit of mask `m`.
///
/// By convention the left child of a branch holds every key whose element
/// satisfies `zero_bit(e, m) == true`.
pub fn zero_bit<E: KeyElement>(e: E, m: E) -> bool {
    (e & m) == E::ZERO
}

/// Whether `e` agrees with `p` on every bit strictly above `m`'s set bit.
///
/// Used when deciding whether a query element could plausibly descend into
/// a branch discriminated by mask `m` and prefix element `p` at all, before
/// paying for the `zero_bit` test that picks a side.
pub fn match_prefix<E: KeyElement>(e: E, p: E, m: E) -> bool {
    let above_and_at = m | m.wrapping_sub_one();
    (e & above_and_at) == (p & above_and_at)
}
