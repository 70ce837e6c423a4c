use super::Tally;
use crate::catalog::Catalog;
use shared::models::{Dish, Order};

/// Dishes suggested by the recommendation popup
const RECOMMENDATION_COUNT: usize = 4;
/// Taken from each of the favourite and meal-time categories
const PER_SOURCE: usize = 2;
/// Dishes shown under the statistics screen
const STATISTICS_PICKS: usize = 3;
/// Spicy share above which cooling drinks are suggested
const SPICY_THRESHOLD: u32 = 30;
/// Calorie ceiling for the healthy suggestions (exclusive)
const HEALTHY_CALORIES: i32 = 300;

/// Catalog category that suits the hour of day (0..=23)
pub fn meal_category(hour: u32) -> &'static str {
    match hour {
        6..=10 => "Beverage",
        11..=13 => "Lunch",
        17..=20 => "Dinner",
        _ => "Dessert",
    }
}

/// Up to four dishes for the guest
///
/// Two from the guest's most-ordered category, two from the category that
/// fits the hour, then the rest of the menu in catalog order. No dish
/// appears twice. The favourite category is weighed by portions, the same
/// way [`order_summary`](super::order_summary) counts it.
pub fn recommend<'a>(history: &[Order], catalog: &'a Catalog, hour: u32) -> Vec<&'a Dish> {
    let mut categories = Tally::default();
    for item in history.iter().flat_map(|o| o.items.iter()) {
        if !item.category.is_empty() {
            categories.add(&item.category, i64::from(item.quantity.max(1)));
        }
    }

    let mut picks: Vec<&Dish> = Vec::with_capacity(RECOMMENDATION_COUNT);
    let push = |dish: &'a Dish, picks: &mut Vec<&'a Dish>| {
        if picks.len() < RECOMMENDATION_COUNT && !picks.iter().any(|p| p.id == dish.id) {
            picks.push(dish);
        }
    };

    if let Some(favorite) = categories.top() {
        for dish in catalog.by_category(favorite).into_iter().take(PER_SOURCE) {
            push(dish, &mut picks);
        }
    }
    for dish in catalog
        .by_category(meal_category(hour))
        .into_iter()
        .take(PER_SOURCE)
    {
        push(dish, &mut picks);
    }
    for dish in catalog.all() {
        push(dish, &mut picks);
    }
    picks
}

/// Suggestions under the eating-habit statistics
///
/// Up to two drinks when more than 30% of lines were spicy, then up to two
/// healthy dishes (the `Healthy` category or under 300 kcal), then one
/// dessert; catalog order, no repeats, at most three.
pub fn statistics_recommendations(spicy_percentage: u32, catalog: &Catalog) -> Vec<&Dish> {
    let mut candidates: Vec<&Dish> = Vec::new();
    if spicy_percentage > SPICY_THRESHOLD {
        candidates.extend(catalog.by_category("Beverage").into_iter().take(2));
    }
    candidates.extend(
        catalog
            .all()
            .iter()
            .filter(|d| d.category == "Healthy" || (d.calories > 0 && d.calories < HEALTHY_CALORIES))
            .take(2),
    );
    candidates.extend(catalog.by_category("Dessert").into_iter().take(1));

    let mut picks: Vec<&Dish> = Vec::with_capacity(STATISTICS_PICKS);
    for dish in candidates {
        if picks.len() == STATISTICS_PICKS {
            break;
        }
        if !picks.iter().any(|p| p.id == dish.id) {
            picks.push(dish);
        }
    }
    picks
}
