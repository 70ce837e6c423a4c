//! Statistics and recommendation views
//!
//! Pure functions over the `history` list (plus the catalog where dish
//! details matter), plus the combo menus built from the catalog. Nothing
//! here writes to the store, and every result is deterministic for a given
//! input.

mod combos;
mod dishes;
mod recommend;
mod spending;

pub use combos::{COMBO_UNIT_PRICE, event_message, lunch_combos, search_combos, today_combos};
pub use dishes::{CategoryShare, DishStatistics, TimeFilter, dish_statistics};
pub use recommend::{meal_category, recommend, statistics_recommendations};
pub use spending::{
    DailyOrders, MonthlyStats, OrderSummary, group_by_day, monthly_stats, order_summary, orders_on,
};

use shared::models::Order;

/// Number of orders shown in "recent" lists
pub const RECENT_LIMIT: usize = 5;

/// Most recent orders first, at most [`RECENT_LIMIT`]
pub(crate) fn most_recent(history: &[Order]) -> Vec<Order> {
    let mut sorted: Vec<&Order> = history.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().take(RECENT_LIMIT).cloned().collect()
}

/// Count keyed by first appearance, so ties and output order are stable
#[derive(Debug, Default)]
pub(crate) struct Tally {
    entries: Vec<(String, i64)>,
}

impl Tally {
    pub(crate) fn add(&mut self, key: &str, n: i64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += n,
            None => self.entries.push((key.to_string(), n)),
        }
    }

    /// Highest count; the earliest key wins a tie
    pub(crate) fn top(&self) -> Option<&str> {
        let mut best: Option<&(String, i64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k.as_str())
    }

    pub(crate) fn into_entries(self) -> Vec<(String, i64)> {
        self.entries
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use shared::models::{CartLine, Order, OrderStatus};

    pub fn line(name: &str, category: &str, calories: i32, price: i64, quantity: i32) -> CartLine {
        CartLine {
            id: name.to_string(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            calories,
            image: String::new(),
            quantity,
            note: None,
            combo_items: vec![],
        }
    }

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    pub fn paid(created_at: DateTime<Utc>, items: Vec<CartLine>) -> Order {
        let mut order = Order::new("table_1", "Table 1", items);
        order.created_at = created_at;
        order.status = OrderStatus::Paid;
        order
    }
}
