//! Ranking and merging rules for food listings.

use crate::models::TopFood;

/// How many featured foods the landing page shows.
pub const TOP_FOODS_LIMIT: usize = 6;

/// Concatenates the admin shelf and the user shelf, admin first.
/// Order within each shelf is kept; nothing is re-sorted or deduplicated.
pub fn merge_catalog<T>(admin: Vec<T>, user: Vec<T>) -> Vec<T> {
    let mut merged = admin;
    merged.extend(user);
    merged
}

/// Sorts by `purchaseCount` descending (stable) and keeps the first `limit`.
pub fn rank_top_foods(mut foods: Vec<TopFood>, limit: usize) -> Vec<TopFood> {
    foods.sort_by(|a, b| b.rank().total_cmp(&a.rank()));
    foods.truncate(limit);
    foods
}
