//! `serde` support for [`FigTree`]s
//!
//! A tree is serialized as the sequence of its effective `(start, end, value)` entries, in order.
//! Deserializing writes each entry back into a new tree over the full domain of the index type, so
//! any sequence of valid writes is accepted -- later entries overwrite earlier ones, just like
//! calls to [`FigTree::write`].

use serde::de::{self, Deserialize, Deserializer, Error as _, Visitor};
use serde::{Serialize, Serializer};

use std::fmt;
use std::marker::PhantomData;

use crate::{FigTree, Index};

impl<I, V, const ORDER: usize> Serialize for FigTree<I, V, ORDER>
where
    I: Serialize + Index,
    V: Serialize,
{
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        let entries = self.iter().filter_map(|(range, value)| {
            let (start, end) = range.to_range()?.into_inner();
            Some((start, end, value))
        });

        serializer.collect_seq(entries)
    }
}

impl<'de, I, V, const ORDER: usize> Deserialize<'de> for FigTree<I, V, ORDER>
where
    I: Deserialize<'de> + Index,
    V: Deserialize<'de> + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(FigTreeVisitor { marker: PhantomData })
    }
}

struct FigTreeVisitor<I, V, const ORDER: usize> {
    marker: PhantomData<FigTree<I, V, ORDER>>,
}

impl<'de, I, V, const ORDER: usize> Visitor<'de> for FigTreeVisitor<I, V, ORDER>
where
    I: Deserialize<'de> + Index,
    V: Deserialize<'de> + Clone,
{
    type Value = FigTree<I, V, ORDER>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a sequence of (start, end, value) triples")
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut this = FigTree::new();
        while let Some((start, end, value)) = seq.next_element()? {
            this.write(start, end, value).map_err(A::Error::custom)?;
        }

        Ok(this)
    }
}
