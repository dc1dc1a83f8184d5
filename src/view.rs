use std::cmp::Ordering;

use crate::types::ProductTrend;

/// Numeric field a product list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DemandRate,
    ProfitabilityScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Descending,
    Ascending,
}

/// Active sort, if any. `None` means the model's original order.
pub type SortState = Option<(SortKey, SortDirection)>;

/// Advance the three-state toggle for `key`:
/// unsorted -> descending -> ascending -> unsorted. Clicking a different key
/// restarts at descending.
pub fn toggle_sort(current: SortState, key: SortKey) -> SortState {
    match current {
        Some((active, SortDirection::Descending)) if active == key => {
            Some((key, SortDirection::Ascending))
        }
        Some((active, SortDirection::Ascending)) if active == key => None,
        _ => Some((key, SortDirection::Descending)),
    }
}

/// Case-insensitive substring filter over product name and supplier names
/// (logical OR). An empty query matches everything.
pub fn filter_products<'a>(products: &'a [ProductTrend], query: &str) -> Vec<&'a ProductTrend> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.suppliers
                    .iter()
                    .any(|s| s.to_lowercase().contains(&needle))
        })
        .collect()
}

fn sort_value(product: &ProductTrend, key: SortKey) -> f64 {
    match key {
        SortKey::DemandRate => product.demand_rate,
        // Missing scores sort as zero.
        SortKey::ProfitabilityScore => product.profitability_score.unwrap_or(0) as f64,
    }
}

/// Order a product list for display. Stable: equal keys keep their original
/// relative order; `None` returns the list as-is.
pub fn sort_products(products: &[ProductTrend], sort: SortState) -> Vec<ProductTrend> {
    let mut out: Vec<ProductTrend> = products.to_vec();
    if let Some((key, direction)) = sort {
        out.sort_by(|a, b| {
            let cmp = sort_value(a, key)
                .partial_cmp(&sort_value(b, key))
                .unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
    }
    out
}
