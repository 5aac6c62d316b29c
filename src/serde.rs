use crate::Multiset;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

// A multiset is (de)serialized as a map from item to multiplicity.
// Counts whose total overflows `usize` are rejected.

impl<T, H> Serialize for Multiset<T, H>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.counts())
    }
}

impl<'de, T, S> Deserialize<'de> for Multiset<T, S>
where
    T: Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsVisitor<T, S> {
            marker: PhantomData<Multiset<T, S>>,
        }

        impl<'de, T, S> Visitor<'de> for CountsVisitor<T, S>
        where
            T: Deserialize<'de> + Eq + Hash,
            S: BuildHasher + Default,
        {
            type Value = Multiset<T, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map from items to multiplicities")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut values =
                    Multiset::with_capacity_and_hasher(map.size_hint().unwrap_or(0), S::default());

                while let Some((value, count)) = map.next_entry::<T, usize>()? {
                    values
                        .try_add_count(value, count)
                        .map_err(A::Error::custom)?;
                }

                Ok(values)
            }
        }

        let visitor = CountsVisitor {
            marker: PhantomData,
        };

        deserializer.deserialize_map(visitor)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsInPlaceVisitor<'a, T, S>(&'a mut Multiset<T, S>);

        impl<'a, 'de, T, S> Visitor<'de> for CountsInPlaceVisitor<'a, T, S>
        where
            T: Deserialize<'de> + Eq + Hash,
            S: BuildHasher + Default,
        {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map from items to multiplicities")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                self.0.clear();
                self.0.reserve(map.size_hint().unwrap_or(0));

                while let Some((value, count)) = map.next_entry::<T, usize>()? {
                    self.0
                        .try_add_count(value, count)
                        .map_err(A::Error::custom)?;
                }

                Ok(())
            }
        }

        deserializer.deserialize_map(CountsInPlaceVisitor(place))
    }
}
