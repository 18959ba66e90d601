//! Reconciliation of a product's image set.
//!
//! Images are matched by URL value only. Slot position in the submitted form
//! carries no identity, so a URL moving between slots is neither deleted nor
//! recreated.

use std::collections::BTreeSet;

use crate::domain::types::ImageUrl;

/// Store operations needed to turn an old image set into a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiff {
    /// URLs attached before and absent from the new set.
    pub to_delete: BTreeSet<ImageUrl>,
    /// URLs in the new set that were not attached before.
    pub to_create: BTreeSet<ImageUrl>,
}

impl ImageDiff {
    /// Compute `old - new` and `new - old`. Duplicates on either side collapse.
    pub fn between<'a, O, N>(old: O, new: N) -> Self
    where
        O: IntoIterator<Item = &'a ImageUrl>,
        N: IntoIterator<Item = &'a ImageUrl>,
    {
        let old: BTreeSet<&ImageUrl> = old.into_iter().collect();
        let new: BTreeSet<&ImageUrl> = new.into_iter().collect();

        Self {
            to_delete: old.difference(&new).map(|url| (*url).clone()).collect(),
            to_create: new.difference(&old).map(|url| (*url).clone()).collect(),
        }
    }

    /// `true` when the sets were already equal.
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty()
    }

    /// Apply the diff to an in-memory image set.
    #[cfg(test)]
    pub fn apply_to(&self, images: &mut BTreeSet<ImageUrl>) {
        for url in &self.to_delete {
            images.remove(url);
        }
        images.extend(self.to_create.iter().cloned());
    }
}
