use thiserror::Error;

/// Error returned when a [`Multiset`](crate::Multiset) operation is given an invalid argument,
/// or when its result would not fit in a `usize`.
///
/// The multiset is never modified by a call that returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A negative count was passed to [`insert_many`](crate::Multiset::insert_many)
    /// or [`remove_many`](crate::Multiset::remove_many).
    #[error("attempt to use negative count {0}")]
    NegativeCount(isize),

    /// A negative factor was passed to [`scale`](crate::Multiset::scale).
    #[error("attempt to scale by negative factor {0}")]
    NegativeFactor(isize),

    /// The total number of items would exceed `usize::MAX`.
    #[error("multiset size overflows usize")]
    CountOverflow,
}
