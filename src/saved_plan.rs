use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::api_connection::connection::GenerativeBackend;
use crate::meal_plan::{MealPlanObject, MealPlanResponse};
use crate::preferences::UserPreferences;
use crate::session::PlanSession;

/// A generated plan together with the preferences it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlan {
    pub preferences: UserPreferences,
    pub response: MealPlanResponse,
}

impl SavedPlan {
    /// Snapshot of the session's current plan, if it has one.
    pub fn from_session<B: GenerativeBackend>(session: &PlanSession<B>) -> Option<Self> {
        Some(Self {
            preferences: session.preferences()?.clone(),
            response: session.response()?.clone(),
        })
    }

    pub fn active_plan(&self) -> Result<&MealPlanObject> {
        self.response
            .active_plan()
            .ok_or_else(|| anyhow::anyhow!("Saved plan contains no meal plan"))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read saved plan '{}'", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Saved plan '{}' is not valid plan JSON", path.display()))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write saved plan '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plan::tests::sample_plan;
    use crate::preferences::{CityType, Diet, KitchenSetup};
    use tempfile::tempdir;

    fn saved() -> SavedPlan {
        SavedPlan {
            preferences: UserPreferences {
                city_type: CityType::Metro,
                diet: Diet::Veg,
                taste: "North Indian".to_string(),
                budget: 500,
                time: 30,
                kitchen_setup: KitchenSetup::Medium,
                ingredients: vec!["rice".into(), "onion".into(), "paneer".into()],
                avoid_ingredients: vec![],
            },
            response: MealPlanResponse {
                main_plan: None,
                budget_alternatives: vec![sample_plan()],
            },
        }
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("plan.json");
        saved().save(&path).await?;

        let loaded = SavedPlan::load(&path).await?;
        assert_eq!(loaded, saved());
        assert_eq!(loaded.active_plan()?.plan_title, "Original Plan");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("plan.json");
        tokio::fs::write(&path, "{ not json").await?;
        let err = SavedPlan::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("is not valid plan JSON"));
        Ok(())
    }

    #[test]
    fn test_empty_response_has_no_active_plan() {
        let mut plan = saved();
        plan.response.budget_alternatives.clear();
        assert!(plan.active_plan().is_err());
    }
}
