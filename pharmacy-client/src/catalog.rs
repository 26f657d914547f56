//! Catalog derivation pipeline
//!
//! Pure, synchronous transformations over the medicine list fetched once
//! from the server: filter, sort and paginate, with zero additional
//! network calls per filter/sort/search change. Deterministic and
//! referentially transparent; callers re-run the pipeline whenever the
//! filter state changes.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use shared::Medicine;
use std::collections::BTreeSet;

// ============================================================================
// Filter descriptor
// ============================================================================

/// Sort order for the catalog view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "newest")]
    Newest,
}

/// How a search term interacts with the other active filters.
///
/// `Combine` (the default) ANDs the search predicate with every other
/// active filter. `Override` reproduces the legacy behavior where a search
/// term decides the outcome for an item on its own, bypassing filters the
/// item already passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Combine,
    Override,
}

/// Ephemeral client-side query descriptor for a catalog browsing session
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Exact category match
    pub category: Option<String>,
    /// Exact manufacturer match
    pub manufacturer: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
    /// Tri-state: unset matches everything
    pub prescription_required: Option<bool>,
    /// Only medicines with stock_quantity > 0
    pub in_stock: bool,
    pub sort_by: Option<SortKey>,
    /// Case-insensitive free-text search over name/description/manufacturer/category
    pub search: Option<String>,
    pub search_mode: SearchMode,
}

// ============================================================================
// Derivations
// ============================================================================

/// Sorted unique category names
pub fn categories(medicines: &[Medicine]) -> Vec<String> {
    medicines
        .iter()
        .map(|medicine| medicine.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted unique manufacturer names
pub fn manufacturers(medicines: &[Medicine]) -> Vec<String> {
    medicines
        .iter()
        .map(|medicine| medicine.manufacturer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Observed price range, floored/ceiled to whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

/// Price range over the list, with a fixed fallback for an empty catalog
/// so dependent range widgets never divide by zero.
pub fn price_range(medicines: &[Medicine]) -> PriceRange {
    if medicines.is_empty() {
        return PriceRange { min: 0, max: 1000 };
    }

    let mut min = medicines[0].price;
    let mut max = medicines[0].price;
    for medicine in medicines {
        if medicine.price < min {
            min = medicine.price;
        }
        if medicine.price > max {
            max = medicine.price;
        }
    }

    PriceRange {
        min: min.floor().to_i64().unwrap_or(0),
        // Saturate rather than collapse to 0, so max >= min always holds.
        max: max.ceil().to_i64().unwrap_or(i64::MAX),
    }
}

fn matches(medicine: &Medicine, filters: &FilterOptions) -> bool {
    if let Some(category) = &filters.category {
        if &medicine.category != category {
            return false;
        }
    }

    if let Some(manufacturer) = &filters.manufacturer {
        if &medicine.manufacturer != manufacturer {
            return false;
        }
    }

    if let Some(min_price) = filters.min_price {
        if medicine.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = filters.max_price {
        if medicine.price > max_price {
            return false;
        }
    }

    if let Some(prescription_required) = filters.prescription_required {
        if medicine.prescription_required != prescription_required {
            return false;
        }
    }

    if filters.in_stock && !medicine.in_stock() {
        return false;
    }

    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        let term = search.to_lowercase();
        return medicine.name.to_lowercase().contains(&term)
            || medicine.description.to_lowercase().contains(&term)
            || medicine.manufacturer.to_lowercase().contains(&term)
            || medicine.category.to_lowercase().contains(&term);
    }

    true
}

/// Keep the medicines for which every active predicate holds
pub fn apply_filters(medicines: &[Medicine], filters: &FilterOptions) -> Vec<Medicine> {
    match filters.search_mode {
        SearchMode::Combine => medicines
            .iter()
            .filter(|medicine| matches(medicine, filters))
            .cloned()
            .collect(),
        SearchMode::Override => {
            // A present search term replaces the other predicates entirely.
            if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
                let term = search.to_lowercase();
                medicines
                    .iter()
                    .filter(|medicine| {
                        medicine.name.to_lowercase().contains(&term)
                            || medicine.description.to_lowercase().contains(&term)
                            || medicine.manufacturer.to_lowercase().contains(&term)
                            || medicine.category.to_lowercase().contains(&term)
                    })
                    .cloned()
                    .collect()
            } else {
                let filters = FilterOptions {
                    search: None,
                    search_mode: SearchMode::Combine,
                    ..filters.clone()
                };
                apply_filters(medicines, &filters)
            }
        }
    }
}

/// Stable sort by the selected key; `None` preserves the filtered order
pub fn apply_sort(mut medicines: Vec<Medicine>, sort_by: Option<SortKey>) -> Vec<Medicine> {
    let Some(sort_by) = sort_by else {
        return medicines;
    };

    match sort_by {
        SortKey::PriceAsc => medicines.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => medicines.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::NameAsc => {
            medicines.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::NameDesc => {
            medicines.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
        SortKey::Newest => medicines.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    medicines
}

/// Slice for the given 1-indexed page
pub fn paginate(medicines: &[Medicine], page: usize, page_size: usize) -> Vec<Medicine> {
    if page_size == 0 {
        return Vec::new();
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    medicines
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect()
}

/// Total page count: ceil(len / page_size)
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { len.div_ceil(page_size) }
}
