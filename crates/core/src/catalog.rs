//! Product references and the all-or-nothing resolution rule.
//!
//! Buyers name products either by id or by exact title. A request carries
//! exactly one scheme; duplicates collapse because an order holds at most one
//! association per product. Resolution succeeds only when every distinct
//! reference maps to exactly one product of the target store.

use std::collections::HashSet;

use crate::types::{Price, ProductId};

/// Errors building a [`ProductRefs`] list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RefsError {
    /// No references were given.
    #[error("at least one product is required")]
    Empty,
    /// A title reference was blank.
    #[error("product names cannot be blank")]
    BlankTitle,
}

/// Error returned when references do not all resolve within a store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("some products were not found for this store")]
pub struct Unresolved {
    /// The references that matched no product (or more than one).
    pub missing: Vec<String>,
}

/// A single reference to a product within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductRef {
    /// Reference by primary key.
    Id(ProductId),
    /// Reference by exact title.
    Title(String),
}

impl std::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Title(title) => write!(f, "{title:?}"),
        }
    }
}

/// A non-empty list of distinct product references using a single scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRefs {
    /// References by id.
    Ids(Vec<ProductId>),
    /// References by exact title.
    Titles(Vec<String>),
}

impl ProductRefs {
    /// Build an id-based reference list, collapsing duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`RefsError::Empty`] if `ids` is empty.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Result<Self, RefsError> {
        let ids = distinct(ids);
        if ids.is_empty() {
            return Err(RefsError::Empty);
        }
        Ok(Self::Ids(ids))
    }

    /// Build a title-based reference list, trimming and collapsing duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`RefsError::Empty`] if no titles are given and
    /// [`RefsError::BlankTitle`] if any title is blank.
    pub fn from_titles<S: AsRef<str>>(
        titles: impl IntoIterator<Item = S>,
    ) -> Result<Self, RefsError> {
        let mut trimmed = Vec::new();
        for title in titles {
            let title = title.as_ref().trim();
            if title.is_empty() {
                return Err(RefsError::BlankTitle);
            }
            trimmed.push(title.to_owned());
        }
        let titles = distinct(trimmed);
        if titles.is_empty() {
            return Err(RefsError::Empty);
        }
        Ok(Self::Titles(titles))
    }

    /// Number of distinct references.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Titles(titles) => titles.len(),
        }
    }

    /// Always `false`; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The references as individual [`ProductRef`] values.
    #[must_use]
    pub fn to_refs(&self) -> Vec<ProductRef> {
        match self {
            Self::Ids(ids) => ids.iter().copied().map(ProductRef::Id).collect(),
            Self::Titles(titles) => titles.iter().cloned().map(ProductRef::Title).collect(),
        }
    }
}

/// The view of a product needed to resolve references and total an order.
pub trait CatalogEntry {
    /// The product's id.
    fn product_id(&self) -> ProductId;
    /// The product's title.
    fn title(&self) -> &str;
    /// The product's current price.
    fn price(&self) -> Price;
}

/// Check that `found` is exactly the resolution of `refs`.
///
/// `found` must already be restricted to the target store. Every reference
/// must match exactly one entry and no entry may be left over; a title shared
/// by two products of the store is treated as unresolved.
///
/// # Errors
///
/// Returns [`Unresolved`] listing the references that did not resolve.
pub fn ensure_resolved<P: CatalogEntry>(refs: &ProductRefs, found: &[P]) -> Result<(), Unresolved> {
    let missing: Vec<String> = refs
        .to_refs()
        .into_iter()
        .filter(|r| {
            let matches = found
                .iter()
                .filter(|p| match r {
                    ProductRef::Id(id) => p.product_id() == *id,
                    ProductRef::Title(title) => p.title() == title.as_str(),
                })
                .count();
            matches != 1
        })
        .map(|r| r.to_string())
        .collect();

    if !missing.is_empty() || found.len() != refs.len() {
        return Err(Unresolved { missing });
    }
    Ok(())
}

/// Total of an order: the flat sum of its products' prices.
#[must_use]
pub fn order_total<P: CatalogEntry>(products: &[P]) -> Price {
    products.iter().map(CatalogEntry::price).sum()
}

fn distinct<T: Eq + std::hash::Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
