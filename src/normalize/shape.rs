use serde_json::Value;

use super::range::average_range;
use crate::model::{display_value, field, NutritionRecord};

/// Top-level keys that mark a flat, single-item answer.
const FLAT_KEYS: [&str; 5] = ["calories", "protein", "carbs", "fat", "carbohydrates"];

/// The response layouts Gemini has been seen to produce.
///
/// Detection checks keys in a fixed priority order, so an answer carrying both
/// `food_items` and `dishes` is always read as [`Shape::FoodItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{"food_items": [{"item", "quantity", ...}]}`, the layout we ask for
    FoodItems,
    /// `{"dishes": [{"dish", ...}], "serving_size"}`
    Dishes,
    /// `{"nutritional_information": {"food_name": {...}}, "serving_size"}`
    NutritionalInformation,
    /// `{"calories", "protein", ...}` describing the whole query
    FlatItem,
    Unrecognized,
}

impl Shape {
    pub fn detect(value: &Value) -> Shape {
        let Some(object) = value.as_object() else {
            return Shape::Unrecognized;
        };

        if object.contains_key("food_items") {
            Shape::FoodItems
        } else if object.contains_key("dishes") {
            Shape::Dishes
        } else if object.contains_key("nutritional_information") {
            Shape::NutritionalInformation
        } else if FLAT_KEYS.iter().any(|key| object.contains_key(*key)) {
            Shape::FlatItem
        } else {
            Shape::Unrecognized
        }
    }

    /// Map `value` to records according to this shape.
    ///
    /// `food` is the text the user typed, used as the item name for
    /// flat answers.
    pub fn records(self, value: &Value, food: &str) -> Vec<NutritionRecord> {
        match self {
            Shape::FoodItems => food_items(value),
            Shape::Dishes => dishes(value),
            Shape::NutritionalInformation => nutritional_information(value),
            Shape::FlatItem => vec![flat_item(value, food)],
            Shape::Unrecognized => Vec::new(),
        }
    }
}

/// Object elements of the array under `key`; anything else is skipped.
fn objects<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|element| element.is_object())
}

fn food_items(value: &Value) -> Vec<NutritionRecord> {
    objects(value, "food_items")
        .map(|item| NutritionRecord {
            item: field(item, "item"),
            quantity: field(item, "quantity"),
            calories: field(item, "calories"),
            protein: field(item, "protein"),
            carbs: field(item, "carbs"),
            fat: field(item, "fat"),
            notes: field(item, "notes"),
        })
        .collect()
}

fn dishes(value: &Value) -> Vec<NutritionRecord> {
    let serving_size = field(value, "serving_size");
    objects(value, "dishes")
        .map(|dish| NutritionRecord {
            item: field(dish, "dish"),
            quantity: serving_size.clone(),
            calories: field(dish, "calories"),
            protein: field(dish, "protein"),
            carbs: field(dish, "carbs"),
            fat: field(dish, "fat"),
            notes: field(dish, "notes"),
        })
        .collect()
}

fn nutritional_information(value: &Value) -> Vec<NutritionRecord> {
    let serving_size = field(value, "serving_size");
    let Some(entries) = value
        .get("nutritional_information")
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|(_, details)| details.is_object())
        .map(|(name, details)| {
            let averaged = |key: &str| details.get(key).map(average_range).unwrap_or_default();
            let carbs = first_present(details, "carbohydrates", "carbs");
            NutritionRecord {
                item: display_name(name),
                quantity: serving_size.clone(),
                calories: averaged("calories"),
                protein: averaged("protein"),
                carbs: carbs.map(average_range).unwrap_or_default(),
                fat: averaged("fat"),
                notes: field(details, "description"),
            }
        })
        .collect()
}

fn flat_item(value: &Value, food: &str) -> NutritionRecord {
    NutritionRecord {
        item: food.to_string(),
        quantity: field(value, "serving_size"),
        calories: field(value, "calories"),
        protein: field(value, "protein"),
        carbs: first_present(value, "carbs", "carbohydrates")
            .map(display_value)
            .unwrap_or_default(),
        fat: field(value, "fat"),
        notes: String::new(),
    }
}

/// The value under `primary` unless it is missing or empty, else `fallback`.
fn first_present<'a>(value: &'a Value, primary: &str, fallback: &str) -> Option<&'a Value> {
    value
        .get(primary)
        .filter(|v| !is_empty(v))
        .or_else(|| value.get(fallback))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(true) => false,
    }
}

/// `grilled_chicken_breast` -> `Grilled Chicken Breast`
///
/// A word starts after any non-alphabetic character, so `chicken-tikka`
/// becomes `Chicken-Tikka`.
fn display_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if word_start {
            name.extend(c.to_uppercase());
        } else {
            name.extend(c.to_lowercase());
        }
        word_start = !c.is_alphabetic();
    }
    name
}
