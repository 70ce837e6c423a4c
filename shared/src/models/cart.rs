//! Cart Line Model

use super::combo::Combo;
use super::dish::Dish;
use serde::{Deserialize, Serialize};

/// Category given to combo lines
pub const COMBO_CATEGORY: &str = "Combo";

/// One line of the guest cart
///
/// The dish fields are copied in at add time, so a later catalog change never
/// rewrites what the guest already put in the cart (or an order built from it).
/// The line id is the dish id (or combo id): each occupies at most one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub name: String,
    /// Unit price in the smallest currency unit
    pub price: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub image: String,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Names of the bundled dishes when the line is a combo
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub combo_items: Vec<String>,
}

impl CartLine {
    pub fn from_dish(dish: &Dish, quantity: i32, note: Option<String>) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            price: dish.price,
            category: dish.category.clone(),
            calories: dish.calories,
            image: dish.image.clone(),
            quantity,
            note,
            combo_items: Vec::new(),
        }
    }

    /// One combo as a single line; calories add up over the bundled dishes
    pub fn from_combo(combo: &Combo, quantity: i32) -> Self {
        Self {
            id: combo.id.clone(),
            name: combo.title.clone(),
            price: combo.price,
            category: COMBO_CATEGORY.to_string(),
            calories: combo.calories(),
            image: combo.dishes.first().map(|d| d.image.clone()).unwrap_or_default(),
            quantity,
            note: None,
            combo_items: combo.dishes.iter().map(|d| d.name.clone()).collect(),
        }
    }

    pub fn is_combo(&self) -> bool {
        !self.combo_items.is_empty()
    }

    /// price × quantity
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: &str, name: &str, calories: i32) -> Dish {
        Dish {
            id: id.to_string(),
            name: name.to_string(),
            price: 70000,
            category: "Lunch".to_string(),
            description: String::new(),
            calories,
            cooking_time: "15 phút".to_string(),
            servings: 1,
            image: format!("{}.jpg", id),
            ingredients: vec![],
            instructions: vec![],
        }
    }

    #[test]
    fn test_dish_line_is_not_combo() {
        let line = CartLine::from_dish(&dish("8", "Bún Chả", 400), 2, None);
        assert!(!line.is_combo());
        assert_eq!(line.line_total(), 140000);
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("comboItems").is_none());
    }

    #[test]
    fn test_combo_line() {
        let combo = Combo {
            id: "combo_today_4".to_string(),
            title: "Combo Tiết Kiệm".to_string(),
            description: String::new(),
            badge: "Tiết kiệm".to_string(),
            dishes: vec![dish("9", "Gỏi Cuốn", 200), dish("13", "Canh Chua Cá", 200)],
            price: 120000,
            original_price: 130000,
            prep_time: None,
            rating: None,
        };

        let line = CartLine::from_combo(&combo, 1);
        assert!(line.is_combo());
        assert_eq!(line.id, "combo_today_4");
        assert_eq!(line.category, COMBO_CATEGORY);
        assert_eq!(line.calories, 400);
        assert_eq!(line.image, "9.jpg");
        assert_eq!(line.combo_items, vec!["Gỏi Cuốn", "Canh Chua Cá"]);

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["comboItems"][0], "Gỏi Cuốn");
    }
}
