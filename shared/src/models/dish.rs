//! Dish Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingredient line of a dish (tên nguyên liệu + định lượng)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

/// Catalog dish entity
///
/// Immutable once built; carts and orders copy the fields they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    /// Price in the smallest currency unit (VND)
    pub price: i64,
    pub category: String,
    pub description: String,
    pub calories: i32,
    pub cooking_time: String,
    pub servings: i32,
    /// Image URI
    pub image: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
}

/// Create dish payload, filled in by staff on the recipe form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 1, message = "calories are required"))]
    pub calories: i32,
    #[validate(length(min = 1, message = "cooking time is required"))]
    pub cooking_time: String,
    #[validate(range(min = 1, message = "servings must be at least 1"))]
    pub servings: i32,
    /// Picked image URI; the picker itself lives outside this crate
    #[validate(required(message = "an image is required"))]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl DishDraft {
    /// Validate the draft and turn it into a dish with a fresh id.
    ///
    /// Missing fields report `RequiredField` with the field list; a draft
    /// whose only problem is a negative price reports `DishInvalidPrice`.
    ///
    /// Blank ingredient rows and blank steps are dropped, the way the form
    /// leaves them behind.
    pub fn into_dish(self) -> Result<Dish, AppError> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            if fields == ["price"] {
                return Err(AppError::with_message(
                    ErrorCode::DishInvalidPrice,
                    "Price must not be negative",
                )
                .with_detail("price", self.price));
            }
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Please fill in all fields and add an image",
            )
            .with_detail("fields", fields));
        }

        let image = self.image.unwrap_or_default();
        Ok(Dish {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            price: self.price,
            category: self.category,
            description: self.description,
            calories: self.calories,
            cooking_time: self.cooking_time,
            servings: self.servings,
            image,
            ingredients: self
                .ingredients
                .into_iter()
                .filter(|i| !i.name.trim().is_empty())
                .collect(),
            instructions: self
                .steps
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect(),
        })
    }
}
