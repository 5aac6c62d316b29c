use crate::Multiset;
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::ops::{Add, AddAssign, BitAnd, BitOr, BitXor, MulAssign, Sub, SubAssign};

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns `true` if every item occurs in `other` at least as often as in `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 2]);
    ///
    /// assert!(ms.is_subset(&Multiset::from([1, 2, 3])));
    /// assert!(ms.is_subset(&Multiset::from([1, 1, 2])));
    /// assert!(ms.is_subset(&Multiset::from([1, 2])));
    /// assert!(!ms.is_subset(&Multiset::from([1, 3, 3])));
    /// ```
    pub fn is_subset<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.len() <= other.len() && self.fits_in(other)
    }

    /// Returns `true` if `self` is a subset of `other` and holds strictly fewer items.
    pub fn is_proper_subset<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.len() < other.len() && self.fits_in(other)
    }

    /// Returns `true` if every item occurs in `self` at least as often as in `other`.
    pub fn is_superset<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        other.is_subset(self)
    }

    /// Returns `true` if `self` is a superset of `other` and holds strictly more items.
    pub fn is_proper_superset<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        other.is_proper_subset(self)
    }

    /// Returns `true` if the multisets have at least one item in common.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 1, 2]);
    ///
    /// assert!(ms.intersects(&Multiset::from([2, 3])));
    /// assert!(!ms.intersects(&Multiset::from([3, 3])));
    /// ```
    pub fn intersects<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        if self.distinct_len() <= other.distinct_len() {
            self.distinct().any(|value| other.contains(value))
        } else {
            other.distinct().any(|value| self.contains(value))
        }
    }

    fn fits_in<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.counts()
            .all(|(value, count)| count <= other.multiplicity(value))
    }
}

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Returns the union of `self` and `other`: every item occurs as often as in whichever operand holds it more.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms1 = Multiset::from([1, 1, 1, 2, 2, 3, 4, 5]);
    /// let ms2 = Multiset::from([1, 1, 3, 3, 6]);
    ///
    /// assert_eq!(ms1.union(&ms2), Multiset::from([1, 1, 1, 2, 2, 3, 3, 4, 5, 6]));
    /// assert_eq!(&ms1 | &ms2, ms1.union(&ms2));
    /// ```
    pub fn union<S2>(&self, other: &Multiset<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();

        for (value, count) in other.counts() {
            let current = result.multiplicity(value);
            if count > current {
                result.add_count(value.clone(), count - current);
            }
        }

        result
    }

    /// Returns the intersection of `self` and `other`: every item occurs as often as in whichever operand holds it less.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms1 = Multiset::from([1, 1, 1, 2, 2, 3, 4, 5]);
    /// let ms2 = Multiset::from([1, 1, 3, 3, 6]);
    ///
    /// assert_eq!(&ms1 & &ms2, Multiset::from([1, 1, 3]));
    /// ```
    pub fn intersection<S2>(&self, other: &Multiset<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.empty_like();

        for (value, count) in self.counts() {
            result.add_count(value.clone(), count.min(other.multiplicity(value)));
        }

        result
    }

    /// Returns the intersection of `self` with the candidates yielded by `iter`.
    ///
    /// Every distinct candidate present in `self` is kept with its full multiplicity,
    /// no matter how many times it is yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 1, 1, 2, 3]);
    ///
    /// assert_eq!(ms.intersection_iter(&[1, 1, 3, 7]), Multiset::from([1, 1, 1, 3]));
    /// ```
    pub fn intersection_iter<'a, I, Q>(&self, iter: I) -> Self
    where
        I: IntoIterator<Item = &'a Q>,
        T: Borrow<Q>,
        Q: 'a + ?Sized + Hash + Eq,
    {
        let mut result = self.empty_like();

        for candidate in iter {
            if let Some((value, count)) = self.get(candidate) {
                if !result.contains::<T>(value) {
                    result.add_count(value.clone(), count);
                }
            }
        }

        result
    }

    /// Returns a multiset holding the items of both `self` and `other`; multiplicities add up.
    ///
    /// # Panics
    ///
    /// Panics if the sum would hold more than `usize::MAX` items.
    /// [`merge`](Self::merge) reports that case as an error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 2, 3]) + Multiset::from([3, 4, 5]);
    ///
    /// assert_eq!(ms, Multiset::from([1, 2, 3, 3, 4, 5]));
    /// ```
    pub fn sum<S2>(&self, other: &Multiset<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        if let Err(err) = result.merge(other) {
            panic!("{}", err);
        }
        result
    }

    /// Returns a multiset holding the items of `self` with the items of `other` removed, multiplicity-wise.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = &Multiset::from([1, 1, 2, 3]) - &Multiset::from([1, 3, 3]);
    ///
    /// assert_eq!(ms, Multiset::from([1, 2]));
    /// ```
    pub fn difference<S2>(&self, other: &Multiset<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        result.subtract(other);
        result
    }

    /// Returns a multiset holding the items of `self` with one occurrence removed for every item yielded by `iter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms = Multiset::from([1, 1, 1, 2, 3]);
    ///
    /// assert_eq!(ms.difference_iter(&[1, 1, 3, 7]), Multiset::from([1, 2]));
    /// assert_eq!(ms.len(), 5);
    /// ```
    pub fn difference_iter<'a, I, Q>(&self, iter: I) -> Self
    where
        I: IntoIterator<Item = &'a Q>,
        T: Borrow<Q>,
        Q: 'a + ?Sized + Hash + Eq,
    {
        let mut result = self.clone();
        result.subtract_iter(iter);
        result
    }

    /// Returns the symmetric difference of `self` and `other`:
    /// every item occurs as often as the absolute difference of its multiplicities.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let ms1 = Multiset::from([1, 1, 1, 2, 2, 3, 4, 5]);
    /// let ms2 = Multiset::from([1, 1, 3, 3, 6]);
    ///
    /// assert_eq!(&ms1 ^ &ms2, Multiset::from([1, 2, 2, 3, 4, 5, 6]));
    /// ```
    pub fn symmetric_difference<S2>(&self, other: &Multiset<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.empty_like();

        for (value, count) in self.counts() {
            result.add_count(value.clone(), count.abs_diff(other.multiplicity(value)));
        }

        for (value, count) in other.counts() {
            if !self.contains(value) {
                result.add_count(value.clone(), count);
            }
        }

        result
    }

    fn empty_like(&self) -> Self {
        Self::with_hasher(self.hasher().clone())
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<T, S, S2> $trait<&Multiset<T, S2>> for &Multiset<T, S>
        where
            T: Eq + Hash + Clone,
            S: BuildHasher + Clone,
            S2: BuildHasher,
        {
            type Output = Multiset<T, S>;

            fn $method(self, rhs: &Multiset<T, S2>) -> Multiset<T, S> {
                self.$op(rhs)
            }
        }

        impl<T, S, S2> $trait<Multiset<T, S2>> for Multiset<T, S>
        where
            T: Eq + Hash + Clone,
            S: BuildHasher + Clone,
            S2: BuildHasher,
        {
            type Output = Multiset<T, S>;

            fn $method(self, rhs: Multiset<T, S2>) -> Multiset<T, S> {
                (&self).$op(&rhs)
            }
        }
    };
}

binary_op!(BitOr, bitor, union);
binary_op!(BitAnd, bitand, intersection);
binary_op!(Add, add, sum);
binary_op!(Sub, sub, difference);
binary_op!(BitXor, bitxor, symmetric_difference);

impl<T, S, S2> AddAssign<&Multiset<T, S2>> for Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// # Panics
    ///
    /// Panics if `self` would hold more than `usize::MAX` items.
    fn add_assign(&mut self, rhs: &Multiset<T, S2>) {
        if let Err(err) = self.merge(rhs) {
            panic!("{}", err);
        }
    }
}

impl<T, S, S2> SubAssign<&Multiset<T, S2>> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn sub_assign(&mut self, rhs: &Multiset<T, S2>) {
        self.subtract(rhs);
    }
}

/// Scales every multiplicity in place, like [`Multiset::scale`].
///
/// # Panics
///
/// Panics if `self` would hold more than `usize::MAX` items.
///
/// # Examples
///
/// ```
/// use counted_multiset::Multiset;
///
/// let mut ms = Multiset::from(['a', 'b', 'b']);
/// ms *= 3;
///
/// assert_eq!(ms.multiplicity(&'b'), 6);
/// assert_eq!(ms.len(), 9);
/// ```
impl<T, S> MulAssign<usize> for Multiset<T, S> {
    fn mul_assign(&mut self, factor: usize) {
        if let Err(err) = self.scale_by(factor) {
            panic!("{}", err);
        }
    }
}
