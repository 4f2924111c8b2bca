//! The interactive plan workflow: generate, then edit while keeping the derived
//! views (groceries, cooking sequence, substitutions) in step with the meals.

use thiserror::Error;
use tracing::{error, info};

use crate::api_connection::connection::GenerativeBackend;
use crate::meal_plan::{MealPlanObject, MealPlanResponse, MealSlot};
use crate::planner::Planner;
use crate::preferences::{OptimizationOption, UserPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    PlanForm,
    GeneratingPlan,
    ShowingPlan,
    SwappingMeal,
    RebalancingPlan,
}

/// User-facing failures. The display text is what gets shown, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Could not generate a meal plan. Please try again.")]
    GenerationFailed,
    #[error("Could not perform swap: missing context.")]
    MissingContext,
    #[error("That meal is not part of the current plan.")]
    UnknownSlot,
    #[error("Could not swap the meal. Please try again.")]
    SwapFailed,
    #[error("Could not rebalance the plan after swapping. Please review the plan.")]
    RebalanceFailed,
}

/// Which alternative of a substitution record to swap in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteChoice {
    PrepLight,
    EasyFallback,
}

type StageListener = Box<dyn Fn(PlanStage) + Send + Sync>;

pub struct PlanSession<B> {
    planner: Planner<B>,
    preferences: Option<UserPreferences>,
    response: Option<MealPlanResponse>,
    stage: PlanStage,
    last_error: Option<SessionError>,
    listener: Option<StageListener>,
}

impl<B: GenerativeBackend> PlanSession<B> {
    pub fn new(planner: Planner<B>) -> Self {
        Self {
            planner,
            preferences: None,
            response: None,
            stage: PlanStage::PlanForm,
            last_error: None,
            listener: None,
        }
    }

    /// Resumes from a previously generated plan.
    pub fn restore(planner: Planner<B>, preferences: UserPreferences, response: MealPlanResponse) -> Self {
        let mut session = Self::new(planner);
        session.preferences = Some(preferences);
        session.response = Some(response);
        session.stage = PlanStage::ShowingPlan;
        session
    }

    /// Registers a callback invoked on every stage transition.
    pub fn on_stage_change(mut self, listener: impl Fn(PlanStage) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn planner(&self) -> &Planner<B> {
        &self.planner
    }

    pub fn stage(&self) -> PlanStage {
        self.stage
    }

    pub fn last_error(&self) -> Option<SessionError> {
        self.last_error
    }

    pub fn preferences(&self) -> Option<&UserPreferences> {
        self.preferences.as_ref()
    }

    pub fn response(&self) -> Option<&MealPlanResponse> {
        self.response.as_ref()
    }

    pub fn active_plan(&self) -> Option<&MealPlanObject> {
        self.response.as_ref().and_then(MealPlanResponse::active_plan)
    }

    fn set_stage(&mut self, stage: PlanStage) {
        self.stage = stage;
        if let Some(listener) = &self.listener {
            listener(stage);
        }
    }

    fn fail(&mut self, err: SessionError, stage: PlanStage) -> Result<(), SessionError> {
        self.last_error = Some(err);
        self.set_stage(stage);
        Err(err)
    }

    fn replace_active_plan(&mut self, plan: MealPlanObject) {
        if let Some(active) = self.response.as_mut().and_then(MealPlanResponse::active_plan_mut) {
            *active = plan;
        }
    }

    pub async fn create_plan(
        &mut self,
        preferences: UserPreferences,
        optimization: Option<OptimizationOption>,
    ) -> Result<(), SessionError> {
        self.set_stage(PlanStage::GeneratingPlan);
        self.last_error = None;
        let result = self.planner.generate_meal_plan(&preferences, optimization).await;
        self.preferences = Some(preferences);

        match result {
            Ok(response) => {
                self.response = Some(response);
                self.set_stage(PlanStage::ShowingPlan);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "meal plan generation failed");
                self.fail(SessionError::GenerationFailed, PlanStage::PlanForm)
            }
        }
    }

    /// Regenerates the plan from the stored preferences with an optimization goal.
    pub async fn optimize(&mut self, option: OptimizationOption) -> Result<(), SessionError> {
        match self.preferences.clone() {
            Some(preferences) => self.create_plan(preferences, Some(option)).await,
            None => self.fail(SessionError::MissingContext, self.stage),
        }
    }

    /// Replaces the meal at `slot` with `new_meal`. On failure the plan is unchanged.
    pub async fn swap_meal(&mut self, slot: &MealSlot, new_meal: &str) -> Result<(), SessionError> {
        let (Some(plan), Some(preferences)) = (self.active_plan().cloned(), self.preferences.clone()) else {
            return self.fail(SessionError::MissingContext, PlanStage::ShowingPlan);
        };
        if plan.meal(slot).is_none() {
            return self.fail(SessionError::UnknownSlot, PlanStage::ShowingPlan);
        }

        self.set_stage(PlanStage::SwappingMeal);
        self.last_error = None;
        match self
            .planner
            .generate_meal_swap(&plan, slot, new_meal, &preferences)
            .await
        {
            Ok(updated) => {
                self.replace_active_plan(updated);
                self.set_stage(PlanStage::ShowingPlan);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, %slot, "meal swap failed");
                self.fail(SessionError::SwapFailed, PlanStage::ShowingPlan)
            }
        }
    }

    /// Swaps in one of the alternatives the plan offers for the meal at `slot`.
    pub async fn swap_with_substitute(
        &mut self,
        slot: &MealSlot,
        choice: SubstituteChoice,
    ) -> Result<(), SessionError> {
        let substitute = self
            .active_plan()
            .and_then(|plan| plan.substitution_for(slot))
            .map(|sub| match choice {
                SubstituteChoice::PrepLight => sub.substitute1.clone(),
                SubstituteChoice::EasyFallback => sub.substitute2.clone(),
            });
        match substitute {
            Some(name) => self.swap_meal(slot, &name).await,
            None => self.fail(SessionError::MissingContext, PlanStage::ShowingPlan),
        }
    }

    /// Exchanges two meal positions, applied locally first, then rebalances the
    /// derived views. If the rebalance fails the plan returns to its pre-edit state.
    pub async fn swap_positions(&mut self, source: &MealSlot, target: &MealSlot) -> Result<(), SessionError> {
        let Some(before) = self.active_plan().cloned() else {
            return self.fail(SessionError::MissingContext, self.stage);
        };
        if source == target {
            return Ok(());
        }

        let mut swapped = before.clone();
        if swapped.swap_meals(source, target).is_err() {
            return self.fail(SessionError::UnknownSlot, PlanStage::ShowingPlan);
        }

        self.replace_active_plan(swapped.clone());
        self.set_stage(PlanStage::RebalancingPlan);
        self.last_error = None;

        let result = self.planner.rebalance_plan_after_swap(&swapped).await;
        match result {
            Ok(rebalanced) => {
                info!(%source, %target, "positions swapped and plan rebalanced");
                self.replace_active_plan(rebalanced);
                self.set_stage(PlanStage::ShowingPlan);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, %source, %target, "rebalance failed, reverting swap");
                self.replace_active_plan(before);
                self.fail(SessionError::RebalanceFailed, PlanStage::ShowingPlan)
            }
        }
    }

    pub fn reset(&mut self) {
        self.preferences = None;
        self.response = None;
        self.last_error = None;
        self.set_stage(PlanStage::PlanForm);
    }
}
