use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::meal_plan::MealPlanResponse;
use crate::preferences::{OptimizationOption, UserPreferences};

#[derive(Serialize)]
struct CacheKey<'a> {
    preferences: &'a UserPreferences,
    optimization: Option<OptimizationOption>,
}

/// Session-lifetime memo of generated plans, keyed by the serialized request.
/// Unbounded: entries live until `clear` or drop.
#[derive(Debug, Default)]
pub struct PlanCache {
    entries: Mutex<HashMap<String, MealPlanResponse>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_for(preferences: &UserPreferences, optimization: Option<OptimizationOption>) -> String {
        // Serializing plain data with derived impls cannot fail.
        serde_json::to_string(&CacheKey {
            preferences,
            optimization,
        })
        .unwrap_or_default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, MealPlanResponse>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(
        &self,
        preferences: &UserPreferences,
        optimization: Option<OptimizationOption>,
    ) -> Option<MealPlanResponse> {
        self.entries()
            .get(&Self::key_for(preferences, optimization))
            .cloned()
    }

    pub fn insert(
        &self,
        preferences: &UserPreferences,
        optimization: Option<OptimizationOption>,
        response: MealPlanResponse,
    ) {
        self.entries()
            .insert(Self::key_for(preferences, optimization), response);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}
