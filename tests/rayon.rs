#![cfg(feature = "rayon")]

use counted_multiset::Multiset;
use rayon::prelude::*;

#[test]
fn par_iter_yields_every_occurrence() {
    let ms = Multiset::from([1, 1, 1, 2, 3, 3]);

    let mut items: Vec<i32> = ms.par_iter().copied().collect();
    items.sort_unstable();

    assert_eq!(items, [1, 1, 1, 2, 3, 3]);
    assert_eq!(ms.par_iter().count(), ms.len());
}

#[test]
fn into_par_iter_yields_counts() {
    let ms = Multiset::from(["a", "b", "b"]);

    let mut counts: Vec<(&str, usize)> = ms.into_par_iter().collect();
    counts.sort_unstable();

    assert_eq!(counts, [("a", 1), ("b", 2)]);
}

#[test]
fn collects_from_parallel_iterator() {
    let ms: Multiset<u32> = (0..1000u32).into_par_iter().map(|x| x % 10).collect();

    assert_eq!(ms.len(), 1000);
    assert_eq!(ms.distinct_len(), 10);
    assert!(ms.counts().all(|(_, count)| count == 100));
}

#[test]
fn par_extend_adds_occurrences() {
    let mut ms = Multiset::from([1, 2]);
    let extra = vec![2, 3, 3];

    ms.par_extend(extra.par_iter());
    ms.par_extend(vec![4]);

    assert_eq!(ms, Multiset::from([1, 2, 2, 3, 3, 4]));
}
