//! A multiset implementation counting multiplicities in a hash table.
//!
//! ---
//!
//! [`Multiset`] is a [multiset](https://en.wikipedia.org/wiki/Multiset)
//! (or bag) implementation where items are stored as a hash map
//! from each distinct item to the number of times it occurs:
//!  - `a -> 2`
//!  - `b -> 1`
//!
//! Storage grows with the number of distinct items, not with the total number of items.
//!
//! ---
//!
//! Besides counting insertion and removal, the multiset supports the multiset analogues of the
//! classical set operations, each generalized through multiplicity arithmetic:
//!
//! | operation            | operator | multiplicity of each item |
//! |----------------------|----------|---------------------------|
//! | union                | `\|`     | `max(a, b)`               |
//! | intersection         | `&`      | `min(a, b)`               |
//! | sum                  | `+`      | `a + b`                   |
//! | difference           | `-`      | `a - b`, at least `0`     |
//! | symmetric difference | `^`      | `\|a - b\|`               |
//!
//! ```
//! use counted_multiset::Multiset;
//!
//! let ms1 = Multiset::from([1, 1, 2]);
//! let ms2 = Multiset::from([2, 3, 4]);
//!
//! assert!(ms2.is_subset(&(&ms1 + &ms2)));
//! assert_eq!(&ms1 & &ms2, Multiset::from([2]));
//! assert_eq!(&ms1 - &ms2, Multiset::from([1, 1]));
//! ```
//!
//! ---
//!
//! Optional features:
//!  - `serde`: (de)serializes a multiset as a map from item to multiplicity.
//!  - `rayon`: parallel iteration over, and parallel collection into, a multiset.

mod algebra;
mod error;

/// Multiset implementation where items are stored once together with their multiplicity.
pub mod multiset;

/// Parallel iterator types for [`Multiset`].
#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(feature = "serde")]
mod serde;

pub use error::Error;
pub use hashbrown::TryReserveError;
pub use multiset::Multiset;
