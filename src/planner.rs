use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api_connection::connection::{ApiConnectionError, GenerativeBackend};
use crate::api_connection::endpoints::JsonSchemaDefinition;
use crate::cache::PlanCache;
use crate::config::DEFAULT_FAST_PATH_MINUTES;
use crate::meal_plan::{MealPlanObject, MealPlanResponse, MealSlot, PlanEditError, SingleRecipe};
use crate::preferences::{OptimizationOption, UserPreferences};
use crate::prompts;
use crate::schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GeneratePlan,
    SwapMeal,
    Rebalance,
    Recipe,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::GeneratePlan => "Failed to generate a valid meal plan.",
            Operation::SwapMeal => "Failed to generate a valid meal swap.",
            Operation::Rebalance => "Failed to rebalance the meal plan.",
            Operation::Recipe => "Failed to generate a valid recipe.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::GeneratePlan => "generate_plan",
            Operation::SwapMeal => "swap_meal",
            Operation::Rebalance => "rebalance",
            Operation::Recipe => "recipe",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{} ({source})", .operation.failure_message())]
    Backend {
        operation: Operation,
        #[source]
        source: ApiConnectionError,
    },
    #[error("{}", .operation.failure_message())]
    InvalidResponse {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to generate a valid meal plan.")]
    EmptyPlan,
    #[error(transparent)]
    Edit(#[from] PlanEditError),
    #[error("could not encode the plan for the prompt: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PlannerError {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            PlannerError::Backend { operation, .. } | PlannerError::InvalidResponse { operation, .. } => {
                Some(*operation)
            }
            PlannerError::EmptyPlan => Some(Operation::GeneratePlan),
            PlannerError::Edit(_) | PlannerError::Encode(_) => None,
        }
    }
}

/// Builds prompts, talks to the backend and turns its JSON into plan types.
pub struct Planner<B> {
    backend: B,
    cache: PlanCache,
    fast_path_minutes: u32,
}

impl<B: GenerativeBackend> Planner<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: PlanCache::new(),
            fast_path_minutes: DEFAULT_FAST_PATH_MINUTES,
        }
    }

    /// Plans whose per-meal time is below `minutes` use the fast-path prompt.
    pub fn with_fast_path_minutes(mut self, minutes: u32) -> Self {
        self.fast_path_minutes = minutes;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn uses_fast_path(&self, prefs: &UserPreferences) -> bool {
        prefs.time < self.fast_path_minutes
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: Operation,
        prompt: &str,
        schema: &JsonSchemaDefinition,
    ) -> Result<T, PlannerError> {
        debug!(%operation, schema = %schema.name, prompt_len = prompt.len(), "requesting generation");
        let json_text = self
            .backend
            .generate_json(prompt, schema)
            .await
            .map_err(|source| {
                warn!(%operation, error = %source, "generative backend call failed");
                PlannerError::Backend { operation, source }
            })?;

        serde_json::from_str(&json_text).map_err(|source| {
            warn!(%operation, error = %source, "response did not match the expected shape");
            debug!(%operation, raw = %json_text, "unparseable response");
            PlannerError::InvalidResponse { operation, source }
        })
    }

    pub async fn generate_meal_plan(
        &self,
        prefs: &UserPreferences,
        optimization: Option<OptimizationOption>,
    ) -> Result<MealPlanResponse, PlannerError> {
        if let Some(cached) = self.cache.get(prefs, optimization) {
            debug!("meal plan cache hit");
            return Ok(cached);
        }

        let prompt = if self.uses_fast_path(prefs) {
            info!(time = prefs.time, "using fast-path plan prompt");
            prompts::fast_path_prompt(prefs)
        } else {
            prompts::full_plan_prompt(prefs, optimization)
        };

        let response: MealPlanResponse = self
            .request(
                Operation::GeneratePlan,
                &prompt,
                &schema::meal_plan_response_definition(),
            )
            .await?;
        if response.active_plan().is_none() {
            warn!("response contained neither a main plan nor a budget alternative");
            return Err(PlannerError::EmptyPlan);
        }

        info!(
            budget_fallback = response.is_budget_fallback(),
            "meal plan generated"
        );
        self.cache.insert(prefs, optimization, response.clone());
        Ok(response)
    }

    /// Replaces one meal and asks the backend to recompute the derived views.
    /// Every other assignment is kept as it was, whatever the backend returns.
    pub async fn generate_meal_swap(
        &self,
        plan: &MealPlanObject,
        slot: &MealSlot,
        new_meal: &str,
        prefs: &UserPreferences,
    ) -> Result<MealPlanObject, PlannerError> {
        let mut expected = plan.clone();
        let previous = expected.set_meal(slot, new_meal)?;

        let plan_json = serde_json::to_string(plan).map_err(PlannerError::Encode)?;
        let prompt = prompts::meal_swap_prompt(plan, &plan_json, slot, new_meal, prefs);
        let mut updated: MealPlanObject = self
            .request(
                Operation::SwapMeal,
                &prompt,
                &schema::meal_plan_object_definition(),
            )
            .await?;

        if updated.meal_plan != expected.meal_plan {
            warn!(%slot, "backend altered meal assignments during swap, restoring them");
            updated.pin_meals(&expected);
        }
        info!(%slot, from = %previous, to = %new_meal, "meal swapped");
        Ok(updated)
    }

    /// Recomputes groceries, cooking sequence and substitutions for a plan whose
    /// meals were rearranged locally.
    pub async fn rebalance_plan_after_swap(
        &self,
        swapped: &MealPlanObject,
    ) -> Result<MealPlanObject, PlannerError> {
        let plan_json = serde_json::to_string(swapped).map_err(PlannerError::Encode)?;
        let prompt = prompts::rebalance_prompt(&plan_json);
        let mut rebalanced: MealPlanObject = self
            .request(
                Operation::Rebalance,
                &prompt,
                &schema::meal_plan_object_definition(),
            )
            .await?;

        if rebalanced.meal_plan != swapped.meal_plan {
            warn!("backend altered meal assignments during rebalance, restoring them");
        }
        rebalanced.pin_assignments(swapped);
        info!("plan rebalanced");
        Ok(rebalanced)
    }

    pub async fn generate_zero_waste_recipe(&self, pantry: &[String]) -> Result<SingleRecipe, PlannerError> {
        let prompt = prompts::zero_waste_recipe_prompt(pantry);
        self.request(Operation::Recipe, &prompt, &schema::single_recipe_definition())
            .await
    }
}
