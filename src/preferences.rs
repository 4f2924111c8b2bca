use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum number of available ingredients a plan request must list.
pub const MIN_INGREDIENTS: usize = 3;

pub const TASTE_OPTIONS: &[&str] = &[
    "Sweet", "Salty", "Spicy", "Indian", "North Indian", "South Indian", "Punjabi",
    "Maharashtrian", "Gujarati", "Rajasthani", "Bengali", "Kerala", "Andhra",
    "Tamil", "Hyderabadi", "Mughlai", "Italian", "Western", "Chinese", "Indo-Chinese",
    "Japanese", "Korean", "Thai", "Mexican", "American", "French", "Spanish",
    "Mediterranean", "Middle Eastern", "Lebanese", "Turkish", "Greek", "Vietnamese",
    "Asian Fusion", "Continental", "Street Food", "Fast Food", "Vegan", "Vegetarian",
    "Jain", "Keto", "High-Protein", "Low-Carb", "Random",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum CityType {
    Metro,
    #[serde(rename = "Tier-2")]
    #[value(name = "tier-2")]
    Tier2,
    #[serde(rename = "Tier-3")]
    #[value(name = "tier-3")]
    Tier3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    Veg,
    NonVeg,
    Eggitarian,
    Vegan,
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Diet::Veg => "veg",
            Diet::NonVeg => "non-veg",
            Diet::Eggitarian => "eggitarian",
            Diet::Vegan => "vegan",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KitchenSetup {
    Basic,
    Medium,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Persona {
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
    Student,
    Household,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum OptimizationOption {
    Tastier,
    #[serde(rename = "Higher protein")]
    HigherProtein,
    Cheapest,
    Fastest,
}

impl fmt::Display for OptimizationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OptimizationOption::Tastier => "Tastier",
            OptimizationOption::HigherProtein => "Higher protein",
            OptimizationOption::Cheapest => "Cheapest",
            OptimizationOption::Fastest => "Fastest",
        };
        f.write_str(label)
    }
}

/// Validated planning inputs. `budget` is rupees per day, `time` minutes per meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub city_type: CityType,
    pub diet: Diet,
    pub taste: String,
    pub budget: u32,
    pub time: u32,
    pub kitchen_setup: KitchenSetup,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub avoid_ingredients: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill out all preference fields.")]
    MissingFields,
    #[error("At least 3 ingredients are required.")]
    TooFewIngredients,
    #[error("Budget and Time must be positive numbers.")]
    NonPositiveNumbers,
    #[error("Budget and Time must be whole numbers.")]
    NotWholeNumber,
    #[error("Unknown taste preference: {0}")]
    UnknownTaste(String),
}

/// Raw, unvalidated form state. Text fields hold exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceForm {
    pub city_type: Option<CityType>,
    pub diet: Option<Diet>,
    pub taste: Option<String>,
    pub budget: String,
    pub time: String,
    pub kitchen_setup: Option<KitchenSetup>,
    pub ingredients: String,
    pub avoid_ingredients: String,
}

impl PreferenceForm {
    /// An empty form pre-filled with the persona's budget, time and kitchen defaults.
    pub fn for_persona(persona: Persona) -> Self {
        let (budget, time, kitchen) = match persona {
            Persona::Student => ("300", "20", KitchenSetup::Basic),
            Persona::WorkingProfessional => ("700", "30", KitchenSetup::Medium),
            Persona::Household => ("1000", "45", KitchenSetup::Full),
        };
        Self {
            budget: budget.to_string(),
            time: time.to_string(),
            kitchen_setup: Some(kitchen),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<UserPreferences, FormError> {
        let taste = self.taste.as_deref().map(str::trim).unwrap_or_default();
        let (Some(city_type), Some(diet), Some(kitchen_setup)) =
            (self.city_type, self.diet, self.kitchen_setup)
        else {
            return Err(FormError::MissingFields);
        };
        if taste.is_empty() || self.budget.trim().is_empty() || self.time.trim().is_empty() {
            return Err(FormError::MissingFields);
        }

        let ingredients = split_ingredient_list(&self.ingredients);
        if ingredients.len() < MIN_INGREDIENTS {
            return Err(FormError::TooFewIngredients);
        }

        let budget = parse_positive(&self.budget)?;
        let time = parse_positive(&self.time)?;

        let taste = TASTE_OPTIONS
            .iter()
            .find(|option| option.eq_ignore_ascii_case(taste))
            .ok_or_else(|| FormError::UnknownTaste(taste.to_string()))?;

        Ok(UserPreferences {
            city_type,
            diet,
            taste: taste.to_string(),
            budget,
            time,
            kitchen_setup,
            ingredients,
            avoid_ingredients: split_ingredient_list(&self.avoid_ingredients),
        })
    }
}

/// Accepts whole positive amounts, including decimal spellings such as `"12.0"`.
fn parse_positive(raw: &str) -> Result<u32, FormError> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u32>() {
        return if value > 0 { Ok(value) } else { Err(FormError::NonPositiveNumbers) };
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => {
            if value.fract() == 0.0 && value <= f64::from(u32::MAX) {
                Ok(value as u32)
            } else {
                Err(FormError::NotWholeNumber)
            }
        }
        _ => Err(FormError::NonPositiveNumbers),
    }
}

/// Splits comma-separated ingredient text, trimming entries and dropping empty ones.
pub fn split_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
