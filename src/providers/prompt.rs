/// The prompt template used to ask for nutrition estimates.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
///
/// Contains a `{{FOOD}}` placeholder that `build_nutrition_prompt` replaces
/// with the user's description.
pub const NUTRITION_PROMPT: &str = include_str!("prompt.txt");

/// Injects the food description into the prompt template.
pub fn build_nutrition_prompt(food: &str) -> String {
    NUTRITION_PROMPT.replace("{{FOOD}}", food.trim())
}
