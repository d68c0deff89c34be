use serde::{Deserialize, Serialize};

use crate::error::SustainError;
use crate::records::scenario::{MissingFields, StoredScenario};
use crate::stress::{StressModel, StressScenario};
use crate::SustainResult;

/// `{id, title}` pair used to pick a saved scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: i64,
    pub title: String,
    pub scenario: StoredScenario,
}

/// The saved scenarios of every model, as handed over by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved scenarios for one model, in stored order.
    pub fn list(&self, model: StressModel) -> Vec<ScenarioSummary> {
        self.scenarios
            .iter()
            .filter(|r| r.scenario.model() == model)
            .map(|r| ScenarioSummary {
                id: r.id,
                title: r.title.clone(),
            })
            .collect()
    }

    /// Load one scenario as validated calculator input.
    pub fn load(&self, model: StressModel, id: i64, mode: MissingFields) -> SustainResult<StressScenario> {
        let record = self
            .scenarios
            .iter()
            .find(|r| r.id == id && r.scenario.model() == model)
            .ok_or_else(|| SustainError::ScenarioNotFound {
                model: model.to_string(),
                id,
            })?;

        let scenario = record.scenario.clone().into_scenario(mode)?;
        scenario.validate()?;
        tracing::debug!(%model, id, title = %record.title, "loaded scenario");
        Ok(scenario)
    }

    /// Add a scenario under the next free id for its model and return the id.
    pub fn insert(&mut self, title: impl Into<String>, scenario: &StressScenario) -> i64 {
        let model = scenario.model();
        let id = self
            .scenarios
            .iter()
            .filter(|r| r.scenario.model() == model)
            .map(|r| r.id)
            .max()
            .map_or(1, |max| max + 1);
        self.scenarios.push(ScenarioRecord {
            id,
            title: title.into(),
            scenario: StoredScenario::from(scenario),
        });
        id
    }
}
