use super::{Tally, most_recent};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::models::Order;

/// Category used for lines that carry none
const OTHER_CATEGORY: &str = "Other";

/// Months covered by [`monthly_stats`]
const MONTH_WINDOW: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    pub total_spent: i64,
    /// `None` until something has been ordered
    pub favorite_category: Option<String>,
    pub favorite_dish: Option<String>,
    pub recent_orders: Vec<Order>,
}

/// Spending overview of the order-statistics screen
///
/// Favourites are counted in portions, using the category stored on each
/// line.
pub fn order_summary(history: &[Order]) -> OrderSummary {
    let mut categories = Tally::default();
    let mut dishes = Tally::default();

    for item in history.iter().flat_map(|o| o.items.iter()) {
        let portions = i64::from(item.quantity);
        let category = if item.category.is_empty() {
            OTHER_CATEGORY
        } else {
            item.category.as_str()
        };
        categories.add(category, portions);
        dishes.add(&item.name, portions);
    }

    OrderSummary {
        total_orders: history.len(),
        total_spent: history.iter().map(Order::total).sum(),
        favorite_category: categories.top().map(String::from),
        favorite_dish: dishes.top().map(String::from),
        recent_orders: most_recent(history),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub orders: usize,
    pub spent: i64,
}

impl MonthlyStats {
    /// "tháng 3 2025"
    pub fn label(&self) -> String {
        format!("tháng {} {}", self.month, self.year)
    }
}

/// The three calendar months ending with `today`'s month, oldest first
///
/// Months without orders are still listed. Orders outside the window are
/// ignored. Months are UTC calendar months.
pub fn monthly_stats(history: &[Order], today: NaiveDate) -> Vec<MonthlyStats> {
    let mut months: Vec<MonthlyStats> = (0..MONTH_WINDOW)
        .rev()
        .map(|back| {
            let (year, month) = months_before(today.year(), today.month(), back);
            MonthlyStats {
                year,
                month,
                orders: 0,
                spent: 0,
            }
        })
        .collect();

    for order in history {
        let date = order.created_at.date_naive();
        if let Some(slot) = months
            .iter_mut()
            .find(|m| m.year == date.year() && m.month == date.month())
        {
            slot.orders += 1;
            slot.spent += order.total();
        }
    }
    months
}

/// (year, month) `back` months before the given one
fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOrders {
    pub date: NaiveDate,
    /// Newest first
    pub orders: Vec<Order>,
    pub total: i64,
}

impl DailyOrders {
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

/// History grouped by UTC calendar day, newest day first
pub fn group_by_day(history: &[Order]) -> Vec<DailyOrders> {
    let mut days: Vec<DailyOrders> = Vec::new();
    for order in history {
        let date = order.created_at.date_naive();
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.total += order.total();
                day.orders.push(order.clone());
            }
            None => days.push(DailyOrders {
                date,
                orders: vec![order.clone()],
                total: order.total(),
            }),
        }
    }

    for day in &mut days {
        day.orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

/// The orders of one day, if there were any
pub fn orders_on(history: &[Order], date: NaiveDate) -> Option<DailyOrders> {
    group_by_day(history).into_iter().find(|d| d.date == date)
}
