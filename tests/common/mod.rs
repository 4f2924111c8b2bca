#![allow(dead_code)]

use async_trait::async_trait;
use cooksy::api_connection::{ApiConnectionError, GenerativeBackend, JsonSchemaDefinition};
use cooksy::preferences::{CityType, Diet, KitchenSetup, UserPreferences};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned replies in order and records every prompt it was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, ApiConnectionError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(value.to_string()));
        self
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(ApiConnectionError::EmptyCompletion));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompt(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index].0.clone()
    }

    pub fn schema_name(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &JsonSchemaDefinition,
    ) -> Result<String, ApiConnectionError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), schema.name.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiConnectionError::EmptyCompletion))
    }
}

pub fn preferences(time: u32) -> UserPreferences {
    UserPreferences {
        city_type: CityType::Metro,
        diet: Diet::Veg,
        taste: "North Indian".to_string(),
        budget: 500,
        time,
        kitchen_setup: KitchenSetup::Medium,
        ingredients: vec!["rice".into(), "onion".into(), "paneer".into()],
        avoid_ingredients: vec![],
    }
}

pub fn plan_json(title: &str, day1_dinner: &str, day3_lunch: &str) -> Value {
    json!({
        "planTitle": title,
        "mealPlan": {
            "Day 1": { "Breakfast": "Oats", "Lunch": "Salad", "Dinner": day1_dinner },
            "Day 2": { "Breakfast": "Cereal", "Lunch": "Sandwich", "Dinner": "Dal" },
            "Day 3": { "Breakfast": "Toast", "Lunch": day3_lunch, "Dinner": "Rice" }
        },
        "groceryList": { "Produce": ["Onion"], "Grains": ["Rice"], "Spices": ["Cumin"] },
        "cookingSequence": {
            "Day 1": { "Breakfast": ["Soak oats"], "Lunch": ["Toss salad"], "Dinner": [format!("Cook {day1_dinner}")] },
            "Day 2": { "Breakfast": [], "Lunch": [], "Dinner": ["Boil dal"] },
            "Day 3": { "Breakfast": [], "Lunch": [format!("Make {day3_lunch}")], "Dinner": ["Steam rice"] }
        },
        "substitutions": [
            { "meal": "Dinner", "original": day1_dinner, "substitute1": "Matar Paneer", "substitute2": "Paneer Toast" }
        ],
        "usingYourIngredients": ["rice", "onion", "paneer"],
        "basedOnYourInputs": "Veg, 500/day"
    })
}

pub fn original_plan() -> Value {
    plan_json("Original Plan", "Paneer Butter Masala", "Soup")
}

pub fn response_json(main: Option<Value>, alternatives: Vec<Value>) -> Value {
    json!({ "mainPlan": main, "budgetAlternatives": alternatives })
}
