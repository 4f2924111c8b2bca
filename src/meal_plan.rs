use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PLAN_DAYS: [&str; 3] = ["Day 1", "Day 2", "Day 3"];

/// Grocery categories the model is asked for, in display order.
pub const GROCERY_CATEGORIES: [&str; 3] = ["Produce", "Grains", "Spices"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = PlanEditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlanEditError::InvalidSlot(s.to_string()))
    }
}

/// A position in the plan: a day label plus a meal of that day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    pub day: String,
    pub meal_type: MealType,
}

impl MealSlot {
    pub fn new(day: impl Into<String>, meal_type: MealType) -> Self {
        Self {
            day: day.into(),
            meal_type,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.meal_type)
    }
}

impl FromStr for MealSlot {
    type Err = PlanEditError;

    /// Parses `"Day 1:Dinner"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, meal) = s
            .split_once(':')
            .ok_or_else(|| PlanEditError::InvalidSlot(s.to_string()))?;
        let day = day.trim();
        if day.is_empty() {
            return Err(PlanEditError::InvalidSlot(s.to_string()));
        }
        Ok(Self::new(day, meal.parse()?))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanEditError {
    #[error("invalid meal slot '{0}', expected e.g. 'Day 1:Dinner'")]
    InvalidSlot(String),
    #[error("the plan has no {0}")]
    UnknownSlot(MealSlot),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MealSlots<T> {
    pub breakfast: T,
    pub lunch: T,
    pub dinner: T,
}

impl<T> MealSlots<T> {
    pub fn get(&self, meal_type: MealType) -> &T {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
        }
    }

    pub fn get_mut(&mut self, meal_type: MealType) -> &mut T {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
        }
    }
}

pub type DayMenu = MealSlots<String>;
pub type DaySteps = MealSlots<Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub meal: String,
    pub original: String,
    pub substitute1: String,
    pub substitute2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanObject {
    pub plan_title: String,
    pub meal_plan: BTreeMap<String, DayMenu>,
    pub grocery_list: BTreeMap<String, Vec<String>>,
    pub cooking_sequence: BTreeMap<String, DaySteps>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    #[serde(default)]
    pub using_your_ingredients: Vec<String>,
    #[serde(default)]
    pub based_on_your_inputs: String,
}

impl MealPlanObject {
    /// Day labels ordered by their numeric suffix ("Day 2" before "Day 10").
    pub fn days(&self) -> Vec<&str> {
        let mut days: Vec<&str> = self.meal_plan.keys().map(String::as_str).collect();
        days.sort_by_key(|day| {
            let number = day
                .rsplit(' ')
                .next()
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(u32::MAX);
            (number, day.to_string())
        });
        days
    }

    pub fn meal(&self, slot: &MealSlot) -> Option<&str> {
        self.meal_plan
            .get(&slot.day)
            .map(|menu| menu.get(slot.meal_type).as_str())
    }

    /// Replaces the meal at `slot`, returning the previous name.
    pub fn set_meal(&mut self, slot: &MealSlot, name: impl Into<String>) -> Result<String, PlanEditError> {
        let menu = self
            .meal_plan
            .get_mut(&slot.day)
            .ok_or_else(|| PlanEditError::UnknownSlot(slot.clone()))?;
        Ok(std::mem::replace(menu.get_mut(slot.meal_type), name.into()))
    }

    /// Exchanges the meals assigned to two slots. Derived views are left untouched.
    pub fn swap_meals(&mut self, source: &MealSlot, target: &MealSlot) -> Result<(), PlanEditError> {
        let source_meal = self
            .meal(source)
            .ok_or_else(|| PlanEditError::UnknownSlot(source.clone()))?
            .to_string();
        let target_meal = self
            .meal(target)
            .ok_or_else(|| PlanEditError::UnknownSlot(target.clone()))?
            .to_string();
        self.set_meal(target, source_meal)?;
        self.set_meal(source, target_meal)?;
        Ok(())
    }

    /// The substitution record offered for the meal currently at `slot`.
    pub fn substitution_for(&self, slot: &MealSlot) -> Option<&Substitution> {
        let meal = self.meal(slot)?;
        self.substitutions.iter().find(|s| s.original == meal)
    }

    pub fn cooking_steps(&self, slot: &MealSlot) -> &[String] {
        self.cooking_sequence
            .get(&slot.day)
            .map(|steps| steps.get(slot.meal_type).as_slice())
            .unwrap_or(&[])
    }

    /// Grocery categories with their items: the standard categories first, then any extras.
    pub fn grocery_items(&self) -> Vec<(&str, &[String])> {
        let standard = GROCERY_CATEGORIES
            .iter()
            .filter_map(|category| {
                self.grocery_list
                    .get_key_value(*category)
                    .map(|(k, v)| (k.as_str(), v.as_slice()))
            });
        let extras = self
            .grocery_list
            .iter()
            .filter(|(k, _)| !GROCERY_CATEGORIES.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_slice()));
        standard.chain(extras).collect()
    }

    pub fn has_groceries(&self) -> bool {
        self.grocery_list.values().any(|items| !items.is_empty())
    }

    /// Forces the meal assignments back to those of `reference`.
    pub fn pin_meals(&mut self, reference: &MealPlanObject) {
        self.meal_plan = reference.meal_plan.clone();
    }

    /// Forces assignments, title and input summary back to those of `reference`,
    /// leaving only the derived views (groceries, cooking sequence, substitutions).
    pub fn pin_assignments(&mut self, reference: &MealPlanObject) {
        self.pin_meals(reference);
        self.plan_title = reference.plan_title.clone();
        self.using_your_ingredients = reference.using_your_ingredients.clone();
        self.based_on_your_inputs = reference.based_on_your_inputs.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub main_plan: Option<MealPlanObject>,
    #[serde(default)]
    pub budget_alternatives: Vec<MealPlanObject>,
}

impl MealPlanResponse {
    /// The plan shown and edited: the main plan, else the first budget alternative.
    pub fn active_plan(&self) -> Option<&MealPlanObject> {
        self.main_plan.as_ref().or(self.budget_alternatives.first())
    }

    pub fn active_plan_mut(&mut self) -> Option<&mut MealPlanObject> {
        match self.main_plan {
            Some(ref mut plan) => Some(plan),
            None => self.budget_alternatives.first_mut(),
        }
    }

    pub fn is_budget_fallback(&self) -> bool {
        self.main_plan.is_none() && !self.budget_alternatives.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRecipe {
    pub recipe_name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_plan() -> MealPlanObject {
        serde_json::from_value(json!({
            "planTitle": "Original Plan",
            "mealPlan": {
                "Day 1": { "Breakfast": "Oats", "Lunch": "Salad", "Dinner": "Paneer Butter Masala" },
                "Day 2": { "Breakfast": "Cereal", "Lunch": "Sandwich", "Dinner": "Dal" },
                "Day 3": { "Breakfast": "Toast", "Lunch": "Soup", "Dinner": "Rice" }
            },
            "groceryList": { "Produce": ["Onion"], "Grains": ["Rice"], "Spices": [], "Dairy": ["Paneer"] },
            "cookingSequence": {
                "Day 1": { "Breakfast": [], "Lunch": [], "Dinner": ["Cook paneer"] },
                "Day 2": { "Breakfast": [], "Lunch": [], "Dinner": ["Boil dal"] },
                "Day 3": { "Breakfast": [], "Lunch": [], "Dinner": ["Steam rice"] }
            },
            "substitutions": [
                { "meal": "Dinner", "original": "Paneer Butter Masala", "substitute1": "Matar Paneer", "substitute2": "Paneer Toast" }
            ],
            "usingYourIngredients": ["rice", "onion", "paneer"],
            "basedOnYourInputs": "Veg, 500/day"
        }))
        .unwrap()
    }

    #[test]
    fn test_slot_parsing() {
        let slot: MealSlot = "Day 2: dinner".parse().unwrap();
        assert_eq!(slot, MealSlot::new("Day 2", MealType::Dinner));
        assert_eq!(slot.to_string(), "Day 2 Dinner");
        assert!("Day 2".parse::<MealSlot>().is_err());
        assert!(":Lunch".parse::<MealSlot>().is_err());
        assert!("Day 1:Brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_swap_meals_exchanges_only_assignments() {
        let mut plan = sample_plan();
        let a = MealSlot::new("Day 1", MealType::Dinner);
        let b = MealSlot::new("Day 3", MealType::Lunch);
        plan.swap_meals(&a, &b).unwrap();
        assert_eq!(plan.meal(&a), Some("Soup"));
        assert_eq!(plan.meal(&b), Some("Paneer Butter Masala"));
        // derived views stay as they were until a rebalance
        assert_eq!(plan.cooking_steps(&a), ["Cook paneer".to_string()]);
    }

    #[test]
    fn test_swap_with_unknown_slot_leaves_plan_untouched() {
        let mut plan = sample_plan();
        let before = plan.clone();
        let err = plan
            .swap_meals(&MealSlot::new("Day 1", MealType::Lunch), &MealSlot::new("Day 9", MealType::Lunch))
            .unwrap_err();
        assert!(matches!(err, PlanEditError::UnknownSlot(_)));
        assert_eq!(plan, before);
    }

    #[test]
    fn test_substitution_lookup_follows_meal_name() {
        let plan = sample_plan();
        let sub = plan
            .substitution_for(&MealSlot::new("Day 1", MealType::Dinner))
            .unwrap();
        assert_eq!(sub.substitute1, "Matar Paneer");
        assert!(plan
            .substitution_for(&MealSlot::new("Day 2", MealType::Dinner))
            .is_none());
    }

    #[test]
    fn test_grocery_items_standard_categories_first() {
        let plan = sample_plan();
        let categories: Vec<&str> = plan.grocery_items().iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec!["Produce", "Grains", "Spices", "Dairy"]);
        assert!(plan.has_groceries());
    }

    #[test]
    fn test_pin_assignments_restores_meals_and_provenance() {
        let reference = sample_plan();
        let mut drifted = sample_plan();
        drifted.plan_title = "Renamed".to_string();
        drifted
            .set_meal(&MealSlot::new("Day 2", MealType::Lunch), "Pizza")
            .unwrap();
        drifted.grocery_list.insert("Produce".to_string(), vec!["Basil".to_string()]);

        drifted.pin_assignments(&reference);
        assert_eq!(drifted.meal_plan, reference.meal_plan);
        assert_eq!(drifted.plan_title, "Original Plan");
        assert_eq!(drifted.grocery_list["Produce"], vec!["Basil".to_string()]);
    }

    #[test]
    fn test_active_plan_falls_back_to_budget_alternative() {
        let response = MealPlanResponse {
            main_plan: None,
            budget_alternatives: vec![sample_plan()],
        };
        assert!(response.is_budget_fallback());
        assert_eq!(response.active_plan().unwrap().plan_title, "Original Plan");

        let empty: MealPlanResponse =
            serde_json::from_value(json!({ "mainPlan": null, "budgetAlternatives": [] })).unwrap();
        assert!(empty.active_plan().is_none());
    }
}
