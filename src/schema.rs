//! Response schemas handed to the generative backend alongside each prompt.

use crate::api_connection::endpoints::{JsonSchema, JsonSchemaDefinition};
use crate::meal_plan::{GROCERY_CATEGORIES, PLAN_DAYS};

fn day_schema() -> JsonSchema {
    JsonSchema::object([
        ("Breakfast", JsonSchema::string()),
        ("Lunch", JsonSchema::string()),
        ("Dinner", JsonSchema::string()),
    ])
}

fn cooking_day_schema() -> JsonSchema {
    JsonSchema::object([
        ("Breakfast", JsonSchema::string_array()),
        ("Lunch", JsonSchema::string_array()),
        ("Dinner", JsonSchema::string_array()),
    ])
}

fn per_day(schema: fn() -> JsonSchema) -> JsonSchema {
    JsonSchema::object(PLAN_DAYS.iter().map(|day| (*day, schema())))
}

pub fn meal_plan_object_schema() -> JsonSchema {
    let grocery_list = JsonSchema::object(
        GROCERY_CATEGORIES
            .iter()
            .map(|category| (*category, JsonSchema::string_array())),
    )
    .with_description("Grocery list categorized into Produce, Grains, and Spices.");

    let substitution = JsonSchema::object([
        ("meal", JsonSchema::string()),
        ("original", JsonSchema::string()),
        ("substitute1", JsonSchema::string()),
        ("substitute2", JsonSchema::string()),
    ]);

    JsonSchema::object([
        ("planTitle", JsonSchema::string()),
        ("mealPlan", per_day(day_schema)),
        ("groceryList", grocery_list),
        ("cookingSequence", per_day(cooking_day_schema)),
        ("substitutions", JsonSchema::array(substitution)),
        ("usingYourIngredients", JsonSchema::string_array()),
        ("basedOnYourInputs", JsonSchema::string()),
    ])
}

pub fn meal_plan_response_definition() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "meal_plan_response".to_string(),
        strict: Some(true),
        schema: JsonSchema::object([
            ("mainPlan", meal_plan_object_schema().nullable()),
            ("budgetAlternatives", JsonSchema::array(meal_plan_object_schema())),
        ]),
    }
}

pub fn meal_plan_object_definition() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "meal_plan_object".to_string(),
        strict: Some(true),
        schema: meal_plan_object_schema(),
    }
}

pub fn single_recipe_definition() -> JsonSchemaDefinition {
    let ingredient = JsonSchema::object([
        ("name", JsonSchema::string()),
        (
            "notes",
            JsonSchema::string().with_description("e.g., 'From your pantry' or 'Pantry staple'"),
        ),
    ]);

    JsonSchemaDefinition {
        name: "single_recipe".to_string(),
        strict: Some(true),
        schema: JsonSchema::object([
            ("recipeName", JsonSchema::string()),
            ("description", JsonSchema::string()),
            ("ingredients", JsonSchema::array(ingredient)),
            ("instructions", JsonSchema::string_array()),
        ]),
    }
}
