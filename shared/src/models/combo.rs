//! Combo Model

use super::dish::Dish;
use serde::{Deserialize, Serialize};

/// A bundle of dishes sold at one price
///
/// Combos are built from the catalog on demand and never stored; only the
/// cart line made from one is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Short label shown on the card ("Healthy", "Tiết kiệm", ...)
    pub badge: String,
    pub dishes: Vec<Dish>,
    pub price: i64,
    /// Struck-through price shown next to `price`
    pub original_price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Combo {
    /// `original_price - price`, never negative
    pub fn saving(&self) -> i64 {
        (self.original_price - self.price).max(0)
    }

    /// Σ calories of the dishes
    pub fn calories(&self) -> i32 {
        self.dishes.iter().map(|d| d.calories.max(0)).sum()
    }

    /// Case-insensitive match on title, description, badge and the dishes'
    /// names and categories
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        [&self.title, &self.description, &self.badge]
            .iter()
            .any(|field| field.to_lowercase().contains(&keyword))
            || self.dishes.iter().any(|d| {
                d.name.to_lowercase().contains(&keyword)
                    || d.category.to_lowercase().contains(&keyword)
            })
    }
}
