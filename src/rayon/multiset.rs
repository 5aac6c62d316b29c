use super::collect;
use crate::Multiset;
use hashbrown::HashMap;
use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::{
    FromParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelExtend,
    ParallelIterator,
};
use std::hash::{BuildHasher, Hash};
use std::iter;

/// Parallel iterator over shared references to the items of a multiset,
/// each repeated as many times as it occurs.
pub struct ParIter<'a, T, S> {
    map: &'a HashMap<T, usize, S>,
}

impl<'a, T: Sync, S: Sync> ParallelIterator for ParIter<'a, T, S> {
    type Item = &'a T;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.map
            .par_iter()
            .flat_map_iter(|(value, &count)| iter::repeat(value).take(count))
            .drive_unindexed(consumer)
    }
}

/// Parallel iterator over the distinct items of a consumed multiset and their multiplicities.
pub struct IntoParIter<T, S> {
    map: HashMap<T, usize, S>,
}

impl<T: Send, S: Send> ParallelIterator for IntoParIter<T, S> {
    type Item = (T, usize);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.map.into_par_iter().drive_unindexed(consumer)
    }
}

impl<T: Send, S: Send> IntoParallelIterator for Multiset<T, S> {
    type Item = (T, usize);
    type Iter = IntoParIter<T, S>;

    fn into_par_iter(self) -> Self::Iter {
        IntoParIter { map: self.map }
    }
}

impl<'a, T: Sync, S: Sync> IntoParallelIterator for &'a Multiset<T, S> {
    type Item = &'a T;
    type Iter = ParIter<'a, T, S>;

    fn into_par_iter(self) -> Self::Iter {
        ParIter { map: &self.map }
    }
}

impl<T, S> FromParallelIterator<T> for Multiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = T>,
    {
        let mut ms = Multiset::default();
        ms.par_extend(par_iter);
        ms
    }
}

impl<T, S> ParallelExtend<T> for Multiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        extend(self, par_iter);
    }
}

impl<'a, T, S> ParallelExtend<&'a T> for Multiset<T, S>
where
    T: 'a + Copy + Eq + Hash + Sync,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = &'a T>,
    {
        extend(self, par_iter);
    }
}

fn extend<T, S, I>(ms: &mut Multiset<T, S>, par_iter: I)
where
    T: Eq + Hash,
    S: BuildHasher,
    I: IntoParallelIterator,
    Multiset<T, S>: Extend<I::Item>,
{
    for vec in collect(par_iter) {
        ms.extend(vec);
    }
}
