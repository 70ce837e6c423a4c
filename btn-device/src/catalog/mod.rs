//! Dish catalog
//!
//! The menu is static data compiled into the binary (`data/catalog.json`)
//! and never mutated at runtime. Carts and orders copy what they need from a
//! [`Dish`], so nothing downstream holds references into the catalog.

use shared::models::{Dish, DishDraft};
use shared::AppResult;

const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Calorie ceiling below which a dish counts as light
const LIGHT_CALORIES: i32 = 300;

/// Spicy heuristic: the name mentions tikka or masala, or the description
/// mentions "cay"
pub fn is_spicy(name: &str, description: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("tikka") || name.contains("masala") || description.to_lowercase().contains("cay")
}

#[derive(Debug, Clone)]
pub struct Catalog {
    dishes: Vec<Dish>,
}

impl Catalog {
    /// The built-in menu
    pub fn load() -> Result<Self, serde_json::Error> {
        let dishes: Vec<Dish> = serde_json::from_str(CATALOG_JSON)?;
        tracing::debug!(dishes = dishes.len(), "Catalog loaded");
        Ok(Self { dishes })
    }

    pub fn from_dishes(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    pub fn all(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Dish> {
        self.dishes.iter().filter(|d| d.category == category).collect()
    }

    /// Distinct categories in menu order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for dish in &self.dishes {
            if !seen.contains(&dish.category.as_str()) {
                seen.push(&dish.category);
            }
        }
        seen
    }

    /// Case-insensitive exact name match
    pub fn find_by_name(&self, name: &str) -> Option<&Dish> {
        let name = name.trim().to_lowercase();
        self.dishes.iter().find(|d| d.name.to_lowercase() == name)
    }

    /// Case-insensitive substring search over name, description, category
    /// and ingredient names. An empty keyword matches everything.
    pub fn search(&self, keyword: &str) -> Vec<&Dish> {
        let term = keyword.trim().to_lowercase();
        if term.is_empty() {
            return self.dishes.iter().collect();
        }
        self.dishes
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&term)
                    || d.description.to_lowercase().contains(&term)
                    || d.category.to_lowercase().contains(&term)
                    || d.ingredients
                        .iter()
                        .any(|i| i.name.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn spicy(&self) -> Vec<&Dish> {
        self.dishes
            .iter()
            .filter(|d| is_spicy(&d.name, &d.description))
            .collect()
    }

    /// Low-calorie dishes, dal dishes and beverages
    pub fn light(&self) -> Vec<&Dish> {
        self.dishes
            .iter()
            .filter(|d| {
                d.calories < LIGHT_CALORIES
                    || d.name.to_lowercase().contains("dal")
                    || d.category == "Beverage"
            })
            .collect()
    }

    /// Validate a staff-submitted recipe
    ///
    /// The menu itself is fixed; the returned dish is handed back to the
    /// caller for whatever publishing flow it uses.
    pub fn submit_draft(&self, draft: DishDraft) -> AppResult<Dish> {
        match draft.into_dish() {
            Ok(dish) => {
                tracing::info!(dish_id = %dish.id, name = %dish.name, category = %dish.category, "Recipe submitted");
                Ok(dish)
            }
            Err(e) => {
                tracing::debug!(error = %e, details = ?e.details, "Recipe draft rejected");
                Err(e)
            }
        }
    }
}
