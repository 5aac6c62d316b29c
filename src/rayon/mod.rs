mod multiset;

pub use self::multiset::{IntoParIter, ParIter};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::LinkedList;

/// Collects a parallel iterator into a list of per-thread vectors.
fn collect<I: IntoParallelIterator>(iter: I) -> LinkedList<Vec<I::Item>> {
    iter.into_par_iter()
        .fold(Vec::new, |mut vec, elem| {
            vec.push(elem);
            vec
        })
        .map(|vec| {
            let mut list = LinkedList::new();
            list.push_back(vec);
            list
        })
        .reduce(LinkedList::new, |mut list1, mut list2| {
            list1.append(&mut list2);
            list1
        })
}
