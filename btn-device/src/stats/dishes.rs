use super::{Tally, most_recent};
use crate::catalog::{Catalog, is_spicy};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::models::Order;

/// Category used when neither the catalog nor the line names one
const UNKNOWN_CATEGORY: &str = "Khác";

/// Period selector of the statistics screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    #[default]
    All,
}

impl TimeFilter {
    pub fn includes(&self, order: &Order, now: DateTime<Utc>) -> bool {
        match self {
            TimeFilter::Week => order.created_at >= now - Duration::days(7),
            TimeFilter::Month => order.created_at >= now - Duration::days(30),
            TimeFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    /// Portions ordered
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishStatistics {
    pub total_orders: usize,
    /// Order lines considered
    pub total_dishes: usize,
    pub total_calories: i64,
    /// Lines with no calorie figure anywhere; left out of `total_calories`
    pub unknown_calorie_lines: usize,
    /// Rounded share of spicy lines, 0..=100
    pub spicy_percentage: u32,
    /// Portions per category, in first-seen order
    pub category_breakdown: Vec<CategoryShare>,
    pub recent_orders: Vec<Order>,
}

fn spicy_by_name(catalog: &Catalog, name: &str) -> bool {
    match catalog.find_by_name(name) {
        Some(d) => is_spicy(&d.name, &d.description),
        None => is_spicy(name, ""),
    }
}

/// Eating-habit statistics over the paid history
///
/// Each line is matched to the catalog by dish name. Catalog data wins over
/// what the line carries: calories come from the catalog, then the line;
/// the category from the catalog, then the line, then "Khác". A line is
/// spicy when its dish (or, for dishes no longer on the menu, its name)
/// passes [`is_spicy`]; a combo line is spicy when any bundled dish is.
pub fn dish_statistics(
    history: &[Order],
    catalog: &Catalog,
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> DishStatistics {
    let orders: Vec<Order> = history
        .iter()
        .filter(|o| filter.includes(o, now))
        .cloned()
        .collect();

    let mut total_dishes = 0usize;
    let mut total_calories = 0i64;
    let mut unknown_calorie_lines = 0usize;
    let mut spicy_lines = 0usize;
    let mut categories = Tally::default();

    for item in orders.iter().flat_map(|o| o.items.iter()) {
        total_dishes += 1;
        let dish = catalog.find_by_name(&item.name);
        let portions = i64::from(item.quantity.max(1));

        let calories = dish
            .map(|d| d.calories)
            .filter(|c| *c > 0)
            .or(Some(item.calories).filter(|c| *c > 0));
        match calories {
            Some(c) => total_calories += i64::from(c) * portions,
            None => unknown_calorie_lines += 1,
        }

        let spicy = if item.is_combo() {
            item.combo_items.iter().any(|name| spicy_by_name(catalog, name))
        } else {
            spicy_by_name(catalog, &item.name)
        };
        if spicy {
            spicy_lines += 1;
        }

        let category = dish
            .map(|d| d.category.as_str())
            .filter(|c| !c.is_empty())
            .or(Some(item.category.as_str()).filter(|c| !c.is_empty()))
            .unwrap_or(UNKNOWN_CATEGORY);
        categories.add(category, portions);
    }

    let spicy_percentage = if total_dishes > 0 {
        (spicy_lines as f64 / total_dishes as f64 * 100.0).round() as u32
    } else {
        0
    };

    DishStatistics {
        total_orders: orders.len(),
        total_dishes,
        total_calories,
        unknown_calorie_lines,
        spicy_percentage,
        category_breakdown: categories
            .into_entries()
            .into_iter()
            .map(|(category, count)| CategoryShare { category, count })
            .collect(),
        recent_orders: most_recent(&orders),
    }
}
