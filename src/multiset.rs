use crate::Error;
use hashbrown::hash_map::{self, HashMap};
use hashbrown::TryReserveError;
use std::borrow::Borrow;
use std::collections::hash_map::{DefaultHasher, RandomState};
use std::fmt::{self, Debug, Display};
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FusedIterator;

/// Multiset implementation where each distinct item is stored once, together with its multiplicity.
///
/// A multiset (or bag) is similar to a set, but allows duplicate values.
/// Every stored multiplicity is strictly positive: an item whose count drops to zero is removed.
///
/// Mutators take `&mut self` and return `&mut Self`, so calls can be chained.
/// Mutators which validate an argument return `Result<&mut Self, Error>` instead,
/// and leave the multiset untouched when they fail.
///
/// # Examples
///
/// ```
/// use counted_multiset::Multiset;
///
/// let mut ms1: Multiset<i32> = [1, 2].into_iter().collect();
/// let ms2 = Multiset::from([2, 1]);
/// assert_eq!(ms1, ms2);
///
/// ms1.insert(2).merge_iter([2, 6]);
/// assert_eq!(ms1.multiplicity(&2), 3);
/// assert_eq!(ms1.len(), 5);
///
/// assert!(!ms1.is_subset(&ms2));
/// assert!(ms2.is_subset(&ms1));
/// ```
#[derive(Clone)]
pub struct Multiset<T, S = RandomState> {
    pub(crate) map: HashMap<T, usize, S>,
    len: usize,
}

impl<T> Multiset<T, RandomState> {
    /// Creates an empty `Multiset` with a capacity of 0,
    /// so it will not allocate until it is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms: Multiset<i32> = Multiset::new();
    ///
    /// assert!(ms.is_empty());
    /// assert_eq!(ms.capacity(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty `Multiset` with room for at least `capacity` distinct items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T, S> Multiset<T, S> {
    /// Creates an empty `Multiset` with default capacity which will use the given hash builder to hash items.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
            len: 0,
        }
    }

    /// Creates an empty `Multiset` with at least the specified capacity, using the given hash builder to hash items.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            len: 0,
        }
    }

    /// Returns the number of distinct items the multiset can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns a reference to the multiset's [`BuildHasher`].
    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// Returns the number of items in the multiset, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// assert_eq!(Multiset::from([1, 2, 3]).len(), 3);
    /// assert_eq!(Multiset::from([1, 1, 1, 2, 3]).len(), 5);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of distinct items in the multiset.
    pub fn distinct_len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the multiset contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes all items and returns `self`.
    pub fn clear(&mut self) -> &mut Self {
        log::trace!("clearing multiset of {} items", self.len);
        self.map.clear();
        self.len = 0;
        self
    }

    /// Clears the multiset, returning every distinct item with its multiplicity as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.len = 0;
        Drain {
            iter: self.map.drain(),
        }
    }

    /// Retains only the distinct items specified by the predicate,
    /// which receives each item together with its multiplicity.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        let len = &mut self.len;
        self.map.retain(|value, count| {
            let keep = f(value, *count);
            if !keep {
                *len -= *count;
            }
            keep
        });
    }

    /// Multiplies the multiplicity of every item by `factor` and returns `self`.
    ///
    /// A factor of zero clears the multiset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeFactor`] if `factor` is negative,
    /// and [`Error::CountOverflow`] if the scaled size would not fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::{Error, Multiset};
    ///
    /// let mut ms = Multiset::from([1, 2, 2]);
    /// ms.scale(2)?;
    /// assert_eq!(ms, Multiset::from([1, 1, 2, 2, 2, 2]));
    ///
    /// assert_eq!(ms.scale(-1).unwrap_err(), Error::NegativeFactor(-1));
    /// assert_eq!(ms.scale(isize::MAX).unwrap_err(), Error::CountOverflow);
    /// assert_eq!(ms.len(), 6);
    ///
    /// assert!(ms.scale(0)?.is_empty());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn scale(&mut self, factor: isize) -> Result<&mut Self, Error> {
        let factor = usize::try_from(factor).map_err(|_| {
            log::debug!("rejected negative scale factor {}", factor);
            Error::NegativeFactor(factor)
        })?;

        self.scale_by(factor)?;
        Ok(self)
    }

    pub(crate) fn scale_by(&mut self, factor: usize) -> Result<(), Error> {
        if factor == 0 {
            self.clear();
            return Ok(());
        }

        // Every multiplicity is at most `len`, so a product that fits for `len` fits for all of them.
        let len = self.len.checked_mul(factor).ok_or_else(|| {
            log::debug!("scaling {} items by {} overflows", self.len, factor);
            Error::CountOverflow
        })?;

        log::trace!("scaling multiset of {} items by {}", self.len, factor);

        for count in self.map.values_mut() {
            *count *= factor;
        }
        self.len = len;

        Ok(())
    }

    /// An iterator visiting every item, each distinct item repeated consecutively as many times as it occurs.
    /// The order between distinct items is arbitrary. The iterator element type is `&'a T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 2, 1]);
    ///
    /// let mut items: Vec<_> = ms.iter().collect();
    /// items.sort_unstable(); // Sort since distinct items are visited in arbitrary order.
    ///
    /// assert_eq!(items, [&1, &1, &2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            iter: self.map.iter(),
            repeat: None,
            left: self.len,
        }
    }

    /// An iterator visiting every distinct item once, in arbitrary order.
    pub fn distinct(&self) -> Distinct<'_, T> {
        Distinct {
            iter: self.map.keys(),
        }
    }

    /// An iterator visiting every distinct item together with its multiplicity, in arbitrary order.
    pub fn counts(&self) -> Counts<'_, T> {
        Counts {
            iter: self.map.iter(),
        }
    }

    /// Calls `f` on every item, duplicates included, and returns `self`.
    pub fn visit<F>(&self, f: F) -> &Self
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f);
        self
    }
}

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Reserves capacity for at least `additional` more distinct items.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more distinct items.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.map.try_reserve(additional)
    }

    /// Shrinks the capacity of the multiset as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    /// Shrinks the capacity of the multiset with a lower limit.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        self.map.shrink_to(min_capacity);
    }

    /// Returns the number of occurrences of `value` in the multiset, `0` if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from(["a".to_string(), "b".to_string(), "b".to_string()]);
    ///
    /// assert_eq!(ms.multiplicity("a"), 1);
    /// assert_eq!(ms.multiplicity("b"), 2);
    /// assert_eq!(ms.multiplicity("c"), 0);
    /// ```
    pub fn multiplicity<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(value).copied().unwrap_or(0)
    }

    /// Returns `true` if the multiset contains `value` at least once.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(value)
    }

    /// Returns the stored item equal to `value` together with its multiplicity.
    pub fn get<Q>(&self, value: &Q) -> Option<(&T, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map
            .get_key_value(value)
            .map(|(value, count)| (value, *count))
    }

    /// Adds a single occurrence of `value` and returns `self`.
    ///
    /// # Panics
    ///
    /// Panics if the multiset already holds `usize::MAX` items.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut ms = Multiset::from([1, 2, 3]);
    /// ms.insert(4).insert(4);
    ///
    /// assert_eq!(ms.multiplicity(&4), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> &mut Self {
        self.add_count(value, 1);
        self
    }

    /// Increments the multiplicity of `value` by `count` and returns `self`.
    ///
    /// A count of zero leaves the multiset unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeCount`] if `count` is negative,
    /// and [`Error::CountOverflow`] if the new size would not fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut ms = Multiset::from([1, 2, 3]);
    /// ms.insert_many(4, 2)?;
    ///
    /// assert_eq!(ms.multiplicity(&4), 2);
    /// assert_eq!(ms.len(), 5);
    /// assert!(ms.insert_many(4, -1).is_err());
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn insert_many(&mut self, value: T, count: isize) -> Result<&mut Self, Error> {
        let count = check_count(count)?;
        self.try_add_count(value, count)?;
        Ok(self)
    }

    /// Removes a single occurrence of `value` and returns `self`.
    /// Removing an absent value does nothing.
    pub fn remove<Q>(&mut self, value: &Q) -> &mut Self
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_count(value, 1);
        self
    }

    /// Decrements the multiplicity of `value` by `count` and returns `self`.
    ///
    /// If the multiplicity would drop to zero or below, the item is removed entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeCount`] if `count` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut ms = Multiset::from([4, 4, 5]);
    /// ms.remove_many(&4, 3)?;
    ///
    /// assert_eq!(ms, Multiset::from([5]));
    /// assert!(!ms.contains(&4));
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn remove_many<Q>(&mut self, value: &Q, count: isize) -> Result<&mut Self, Error>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let count = check_count(count)?;
        self.remove_count(value, count);
        Ok(self)
    }

    /// Adds every occurrence in `other`, multiplicity-wise, and returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CountOverflow`] if the combined size would not fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut ms = Multiset::from([1, 2, 3]);
    /// ms.merge(&Multiset::from([3, 4, 5]))?;
    ///
    /// assert_eq!(ms, Multiset::from([1, 2, 3, 3, 4, 5]));
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn merge<S2>(&mut self, other: &Multiset<T, S2>) -> Result<&mut Self, Error>
    where
        T: Clone,
    {
        let len = checked_len(self.len, other.len)?;
        self.reserve(other.distinct_len());

        for (value, count) in other.counts() {
            match self.map.get_mut(value) {
                Some(current) => *current += count,
                None => {
                    self.map.insert(value.clone(), count);
                }
            }
        }
        self.len = len;

        Ok(self)
    }

    /// Adds one occurrence for every item yielded by `iter` and returns `self`.
    ///
    /// # Panics
    ///
    /// Panics if the multiset would hold more than `usize::MAX` items.
    pub fn merge_iter<I>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.extend(iter);
        self
    }

    /// Removes every occurrence in `other`, multiplicity-wise, and returns `self`.
    pub fn subtract<S2>(&mut self, other: &Multiset<T, S2>) -> &mut Self {
        for (value, count) in other.counts() {
            self.remove_count(value, count);
        }

        self
    }

    /// Removes one occurrence for every item yielded by `iter` and returns `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut ms = Multiset::from([1, 2, 3]);
    /// ms.subtract_iter(&[1, 3]);
    ///
    /// assert_eq!(ms, Multiset::from([2]));
    /// ```
    pub fn subtract_iter<'a, I, Q>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Q>,
        T: Borrow<Q>,
        Q: 'a + ?Sized + Hash + Eq,
    {
        for value in iter {
            self.remove_count(value, 1);
        }

        self
    }

    /// Adds `count` occurrences of `value`, or fails without touching the multiset.
    pub(crate) fn try_add_count(&mut self, value: T, count: usize) -> Result<(), Error> {
        if count == 0 {
            return Ok(());
        }

        // No multiplicity exceeds `len`, so the entry cannot overflow once `len` does not.
        self.len = checked_len(self.len, count)?;
        *self.map.entry(value).or_insert(0) += count;
        Ok(())
    }

    pub(crate) fn add_count(&mut self, value: T, count: usize) {
        if let Err(err) = self.try_add_count(value, count) {
            panic!("{}", err);
        }
    }

    fn remove_count<Q>(&mut self, value: &Q, count: usize)
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = match self.map.get_mut(value) {
            Some(current) if *current > count => {
                *current -= count;
                count
            }
            Some(current) => {
                let current = *current;
                self.map.remove(value);
                current
            }
            None => return,
        };

        self.len -= removed;
    }
}

fn check_count(count: isize) -> Result<usize, Error> {
    usize::try_from(count).map_err(|_| {
        log::debug!("rejected negative count {}", count);
        Error::NegativeCount(count)
    })
}

fn checked_len(len: usize, additional: usize) -> Result<usize, Error> {
    len.checked_add(additional).ok_or_else(|| {
        log::debug!("adding {} items to {} overflows", additional, len);
        Error::CountOverflow
    })
}

impl<T, S, S2> PartialEq<Multiset<T, S2>> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &Multiset<T, S2>) -> bool {
        self.len == other.len
            && self.distinct_len() == other.distinct_len()
            && self
                .counts()
                .all(|(value, count)| other.multiplicity(value) == count)
    }
}

impl<T, S> Eq for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

/// A multiset equals a set when both hold the same number of items and every item of the set is in the multiset.
///
/// Multiplicities are never looked at, only the total size and the set's members.
impl<T, S, S2> PartialEq<std::collections::HashSet<T, S2>> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &std::collections::HashSet<T, S2>) -> bool {
        self.len == other.len() && other.iter().all(|value| self.contains(value))
    }
}

impl<T, S, S2> PartialEq<hashbrown::HashSet<T, S2>> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &hashbrown::HashSet<T, S2>) -> bool {
        self.len == other.len() && other.iter().all(|value| self.contains(value))
    }
}

impl<T, S> Hash for Multiset<T, S>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entries are combined with a commutative sum so the hash does not depend on table order.
        let combined = self.counts().fold(0u64, |acc, (value, count)| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            count.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });

        state.write_usize(self.len);
        state.write_u64(combined);
    }
}

impl<T, S> FromIterator<T> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ms = Self::with_hasher(Default::default());
        ms.extend(iter);
        ms
    }
}

/// # Panics
///
/// Panics if the multiset would hold more than `usize::MAX` items.
impl<T, S> Extend<T> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add_count(value, 1);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for Multiset<T, S>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, S> Extend<(T, usize)> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (T, usize)>>(&mut self, iter: I) {
        for (value, count) in iter {
            self.add_count(value, count);
        }
    }
}

impl<'a, T, S> IntoIterator for &'a Multiset<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> IntoIterator for Multiset<T, S> {
    type Item = (T, usize);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

impl<T, S> Default for Multiset<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> Display for Multiset<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Multiset{")?;

        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", value)?;
        }

        f.write_str("}")
    }
}

impl<T, S> Debug for Multiset<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<T, const N: usize> From<[T; N]> for Multiset<T, RandomState>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

/// An iterator over the items of a `Multiset`, each repeated as many times as it occurs.
///
/// This `struct` is created by [`Multiset::iter`].
pub struct Iter<'a, T> {
    iter: hash_map::Iter<'a, T, usize>,
    repeat: Option<(&'a T, usize)>,
    left: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            repeat: self.repeat,
            left: self.left,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if let Some((value, remaining)) = self.repeat {
            if remaining > 0 {
                self.repeat = Some((value, remaining - 1));
                self.left -= 1;
                return Some(value);
            }
        }

        let (value, count) = self.iter.next()?;
        self.repeat = Some((value, *count - 1));
        self.left -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.left
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the distinct items of a `Multiset`.
///
/// This `struct` is created by [`Multiset::distinct`].
pub struct Distinct<'a, T> {
    iter: hash_map::Keys<'a, T, usize>,
}

impl<T> Clone for Distinct<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Distinct<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Distinct<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Distinct<'_, T> {}

impl<T: Debug> Debug for Distinct<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the distinct items of a `Multiset` and their multiplicities.
///
/// This `struct` is created by [`Multiset::counts`].
pub struct Counts<'a, T> {
    iter: hash_map::Iter<'a, T, usize>,
}

impl<T> Clone for Counts<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Counts<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<(&'a T, usize)> {
        self.iter.next().map(|(value, count)| (value, *count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Counts<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Counts<'_, T> {}

impl<T: Debug> Debug for Counts<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the distinct items of a `Multiset` and their multiplicities.
pub struct IntoIter<T> {
    iter: hash_map::IntoIter<T, usize>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<(T, usize)> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: Debug> Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter.fmt(f)
    }
}

/// A draining iterator over the distinct items of a `Multiset` and their multiplicities.
///
/// This `struct` is created by [`Multiset::drain`].
pub struct Drain<'a, T> {
    iter: hash_map::Drain<'a, T, usize>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<(T, usize)> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T: Debug> Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sorted<T: Ord + Copy>(ms: &Multiset<T>) -> Vec<T> {
        let mut items: Vec<_> = ms.iter().copied().collect();
        items.sort_unstable();
        items
    }

    #[test]
    fn counts_occurrences_on_construction() {
        let ms = Multiset::from([1, 2, 3, 1]);

        assert_eq!(ms.len(), 4);
        assert_eq!(ms.distinct_len(), 3);
        assert_eq!(ms.multiplicity(&1), 2);
        assert_eq!(ms.multiplicity(&9), 0);
        assert_eq!(sorted(&ms), [1, 1, 2, 3]);
    }

    #[test]
    fn with_capacity_behaves_like_new() {
        let mut ms = Multiset::with_capacity(16);
        assert!(ms.capacity() >= 16);
        assert!(ms.is_empty());

        ms.insert("x");
        assert_eq!(ms, Multiset::from(["x"]));
    }

    #[test]
    fn insert_many_increments_multiplicity() {
        let mut ms = Multiset::from([1, 2, 3]);
        ms.insert_many(4, 2).unwrap();

        assert_eq!(ms.multiplicity(&4), 2);
        assert_eq!(ms.len(), 5);
    }

    #[test]
    fn insert_many_zero_does_not_create_key() {
        let mut ms = Multiset::from([1]);
        ms.insert_many(2, 0).unwrap();

        assert!(!ms.contains(&2));
        assert_eq!(ms.distinct_len(), 1);
    }

    #[test]
    fn negative_counts_are_rejected_without_mutation() {
        let mut ms = Multiset::from([1, 1, 2]);
        let before = ms.clone();

        assert_eq!(ms.insert_many(1, -1).unwrap_err(), Error::NegativeCount(-1));
        assert_eq!(ms.remove_many(&1, -1).unwrap_err(), Error::NegativeCount(-1));
        assert_eq!(ms, before);
        assert_eq!(ms.len(), 3);
    }

    #[test]
    fn remove_many_drops_exhausted_items() {
        let mut ms = Multiset::from([4, 4, 5]);
        ms.remove_many(&4, 2).unwrap();

        assert_eq!(ms, Multiset::from([5]));
        assert_eq!(ms.distinct_len(), 1);
    }

    #[test]
    fn remove_more_than_present_clamps_to_removal() {
        let mut ms = Multiset::from([4, 4, 5]);
        ms.remove_many(&4, 10).unwrap();

        assert_eq!(ms.multiplicity(&4), 0);
        assert_eq!(ms.len(), 1);
    }

    #[test]
    fn remove_single_and_absent() {
        let mut ms = Multiset::from([1, 2, 3]);
        ms.remove(&2).remove(&7);

        assert_eq!(ms, Multiset::from([1, 3]));

        let mut ms = Multiset::from([4, 4, 5]);
        ms.remove(&4);
        assert_eq!(ms, Multiset::from([4, 5]));
    }

    #[test]
    fn chained_mutation_is_visible_through_binding() {
        let mut ms = Multiset::new();
        ms.insert(1).insert(1).merge_iter([2, 3]).subtract_iter(&[3]);

        assert_eq!(sorted(&ms), [1, 1, 2]);
    }

    #[test]
    fn merge_and_subtract_are_multiplicity_wise() {
        let mut ms = Multiset::from([1, 2, 3]);
        ms.merge(&Multiset::from([3, 3, 4])).unwrap();
        assert_eq!(sorted(&ms), [1, 2, 3, 3, 3, 4]);

        ms.subtract(&Multiset::from([3, 3, 1, 9]));
        assert_eq!(sorted(&ms), [2, 3, 4]);
    }

    #[test]
    fn merge_iter_matches_manual_tally() {
        let first = [1, 2, 2, 3];
        let second = [2, 3, 3, 5];

        let mut ms: Multiset<i32> = first.into_iter().collect();
        ms.merge_iter(second);

        for value in 0..7 {
            let expected = first.iter().chain(&second).filter(|&&x| x == value).count();
            assert_eq!(ms.multiplicity(&value), expected);
        }
        assert_eq!(ms.len(), first.len() + second.len());
    }

    #[test]
    fn scale_multiplies_counts() {
        let mut ms = Multiset::from([1, 2, 2]);
        ms.scale(2).unwrap();
        assert_eq!(ms, Multiset::from([1, 1, 2, 2, 2, 2]));

        assert_eq!(ms.scale(-1).unwrap_err(), Error::NegativeFactor(-1));
        assert_eq!(ms.len(), 6);

        ms.scale(0).unwrap();
        assert!(ms.is_empty());
        assert_eq!(ms.distinct_len(), 0);
    }

    #[test]
    fn scale_overflow_leaves_multiset_untouched() {
        let mut ms = Multiset::from([1, 1, 2]);

        assert_eq!(ms.scale(isize::MAX).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms, Multiset::from([1, 1, 2]));
        assert_eq!(ms.len(), 3);

        let mut ms = Multiset::from([7]);
        ms.scale(isize::MAX).unwrap();
        assert_eq!(ms.multiplicity(&7), isize::MAX as usize);
        ms.scale(2).unwrap();
        assert_eq!(ms.len(), usize::MAX - 1);
        assert_eq!(ms.iter().len(), usize::MAX - 1);
        assert_eq!(ms.scale(2).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms.len(), usize::MAX - 1);
    }

    #[test]
    fn insert_many_overflow_leaves_multiset_untouched() {
        let mut ms = Multiset::new();
        ms.insert_many(2, isize::MAX).unwrap();
        ms.insert_many(2, isize::MAX).unwrap();
        assert_eq!(ms.len(), usize::MAX - 1);

        assert_eq!(ms.insert_many(2, 2).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms.insert_many(3, 2).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms.len(), usize::MAX - 1);
        assert_eq!(ms.multiplicity(&2), usize::MAX - 1);
        assert!(!ms.contains(&3));

        ms.insert_many(3, 1).unwrap();
        assert_eq!(ms.len(), usize::MAX);
        assert_eq!(ms.insert_many(3, 0).unwrap().len(), usize::MAX);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn insert_past_usize_max_panics() {
        let mut ms = Multiset::new();
        ms.insert_many(1, isize::MAX).unwrap();
        ms.insert_many(1, isize::MAX).unwrap();
        ms.insert(1).insert(1);
    }

    #[test]
    fn merge_overflow_leaves_multiset_untouched() {
        let mut big = Multiset::new();
        big.insert_many('a', isize::MAX).unwrap();
        big.insert_many('b', isize::MAX).unwrap();

        let mut ms = Multiset::from(['a', 'c']);
        assert_eq!(ms.merge(&big).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms, Multiset::from(['a', 'c']));

        let mut ms = Multiset::from(['c']);
        ms.merge(&big).unwrap();
        assert_eq!(ms.len(), usize::MAX);
        assert_eq!(ms.multiplicity(&'a'), isize::MAX as usize);
        assert_eq!(ms.merge(&Multiset::from(['c'])).unwrap_err(), Error::CountOverflow);
        assert_eq!(ms.multiplicity(&'c'), 1);
    }

    #[test]
    fn clear_empties() {
        let mut ms = Multiset::from([1, 2, 2]);
        assert!(ms.clear().is_empty());
        assert_eq!(ms.iter().count(), 0);
    }

    #[test]
    fn clone_is_not_aliased() {
        let original = Multiset::from([1, 2]);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.insert(3);
        assert_ne!(copy, original);
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn retain_and_drain_keep_len_in_sync() {
        let mut ms = Multiset::from([1, 1, 2, 3, 3, 3]);
        ms.retain(|_, count| count > 1);
        assert_eq!(ms.len(), 5);
        assert!(!ms.contains(&2));

        let mut drained: Vec<_> = ms.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [(1, 2), (3, 3)]);
        assert!(ms.is_empty());
    }

    #[test]
    fn iterators_are_sane() {
        let ms = Multiset::from(["a", "a", "b"]);

        assert_eq!(ms.iter().size_hint(), (3, Some(3)));
        assert_eq!(ms.iter().clone().count(), 3);
        assert_eq!(ms.distinct().count(), 2);
        assert_eq!(ms.counts().map(|(_, n)| n).sum::<usize>(), 3);
        assert_eq!(ms.clone().into_iter().len(), 2);

        let mut seen = Vec::new();
        assert_eq!(ms.visit(|v| seen.push(*v)).len(), 3);
        seen.sort_unstable();
        assert_eq!(seen, ["a", "a", "b"]);
    }

    #[test]
    fn repeated_items_are_consecutive() {
        let ms = Multiset::from([1, 2, 1, 2, 1, 3]);
        let items: Vec<_> = ms.iter().copied().collect();

        let mut runs = items.clone();
        runs.dedup();
        assert_eq!(runs.len(), ms.distinct_len());
    }

    #[test]
    fn extend_with_counts() {
        let mut ms: Multiset<&str> = Multiset::new();
        ms.extend([("a", 3), ("b", 0), ("a", 1)]);

        assert_eq!(ms.multiplicity("a"), 4);
        assert!(!ms.contains("b"));
        assert_eq!(ms.len(), 4);
    }

    #[test]
    fn borrowed_lookups() {
        let ms: Multiset<String> = ["x", "y", "y"].iter().map(|s| s.to_string()).collect();

        assert_eq!(ms.multiplicity("y"), 2);
        assert_eq!(ms.get("y"), Some((&"y".to_string(), 2)));
        assert!(ms.get("z").is_none());
    }

    #[test]
    fn formatting() {
        assert_eq!(Multiset::<i32>::new().to_string(), "Multiset{}");
        assert_eq!(Multiset::from([7, 7]).to_string(), "Multiset{7, 7}");
        assert_eq!(format!("{:?}", Multiset::from(["a"])), "Multiset{\"a\"}");
        assert_eq!(format!("{:?}", Multiset::from([1, 1]).iter()), "[1, 1]");
    }

    #[test]
    fn equality_ignores_insertion_order() {
        assert_eq!(Multiset::from([1, 2, 2]), Multiset::from([2, 1, 2]));
        assert_ne!(Multiset::from([1, 2, 2]), Multiset::from([1, 1, 2]));
    }

    #[test]
    fn equality_with_plain_set_compares_size_and_members() {
        let set: HashSet<i32> = [1, 2].into_iter().collect();

        assert_eq!(Multiset::from([1, 2]), set);
        // Same size but not the same members.
        assert_ne!(Multiset::from([1, 1]), set);
        // Same members but a different size.
        assert_ne!(Multiset::from([1, 1, 2]), set);

        let set: hashbrown::HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(Multiset::from([3, 2, 1]), set);
        // Sizes coincide, but 3 is missing from the multiset.
        assert_ne!(Multiset::from([1, 1, 2]), set);
    }

    #[test]
    fn equal_multisets_hash_equally() {
        fn hash_of<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let a = Multiset::from([1, 2, 2, 3]);
        let b = Multiset::from([3, 2, 1, 2]);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<Multiset<i32>> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
