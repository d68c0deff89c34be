use serde::{Deserialize, Serialize};

use crate::error::SustainError;
use crate::stress::{
    BondInflationParams, Contribution, ExpenseIncreaseParams, OneTimeEventParams,
    ReturnDropParams, RevenueDropParams, ScenarioEvent, StressModel, StressScenario,
};
use crate::SustainResult;

/// What to do with a field the store did not return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFields {
    /// Refuse the record.
    #[default]
    Reject,
    /// Substitute zero (or an empty list / `false`).
    ZeroFill,
}

fn require<T: Default>(field: &str, value: Option<T>, mode: MissingFields) -> SustainResult<T> {
    match (value, mode) {
        (Some(v), _) => Ok(v),
        (None, MissingFields::ZeroFill) => Ok(T::default()),
        (None, MissingFields::Reject) => Err(SustainError::invalid(field, "Required field is missing")),
    }
}

// ---------------------------------------------------------------------------
// Persisted shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReturnDrop {
    pub present_value: Option<f64>,
    pub interest_rate: Option<f64>,
    pub term: Option<u32>,
    pub monthly_contribution: Option<f64>,
    pub drop_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRevenueDrop {
    pub base_revenue: Option<f64>,
    pub growth_rate: Option<f64>,
    pub start_year: Option<i32>,
    pub total_years: Option<u32>,
    pub initial_drop_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub year: Option<i32>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOneTimeEvent {
    pub annual_rate: Option<f64>,
    #[serde(default)]
    pub events: Vec<StoredEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredExpenseIncrease {
    pub initial_expense: Option<f64>,
    pub increase_rate: Option<f64>,
    pub return_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredContribution {
    pub year: Option<i32>,
    pub contribution: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBondInflation {
    pub present_value: Option<f64>,
    pub interest_rate: Option<f64>,
    pub term: Option<u32>,
    pub fully_funded: Option<bool>,
    #[serde(default)]
    pub contributions: Vec<StoredContribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

/// A scenario as the store keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum StoredScenario {
    ReturnDrop(StoredReturnDrop),
    RevenueDrop(StoredRevenueDrop),
    OneTimeEvent(StoredOneTimeEvent),
    ExpenseIncrease(StoredExpenseIncrease),
    BondInflation(StoredBondInflation),
}

// ---------------------------------------------------------------------------
// Stored -> params
// ---------------------------------------------------------------------------

impl StoredReturnDrop {
    pub fn into_params(self, mode: MissingFields) -> SustainResult<ReturnDropParams> {
        Ok(ReturnDropParams {
            present_value: require("presentValue", self.present_value, mode)?,
            interest_rate: require("interestRate", self.interest_rate, mode)?,
            term: require("term", self.term, mode)?,
            monthly_contribution: require("monthlyContribution", self.monthly_contribution, mode)?,
            drop_rate: require("dropRate", self.drop_rate, mode)?,
            start_year: self.start_year,
        })
    }
}

impl StoredRevenueDrop {
    pub fn into_params(self, mode: MissingFields) -> SustainResult<RevenueDropParams> {
        Ok(RevenueDropParams {
            base_revenue: require("baseRevenue", self.base_revenue, mode)?,
            growth_rate: require("growthRate", self.growth_rate, mode)?,
            start_year: require("startYear", self.start_year, mode)?,
            total_years: require("totalYears", self.total_years, mode)?,
            initial_drop_percent: require("initialDropPercent", self.initial_drop_percent, mode)?,
        })
    }
}

impl StoredOneTimeEvent {
    pub fn into_params(self, mode: MissingFields) -> SustainResult<OneTimeEventParams> {
        let events = self
            .events
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                Ok(ScenarioEvent {
                    year: require(&format!("events[{i}].year"), e.year, mode)?,
                    amount: require(&format!("events[{i}].amount"), e.amount, mode)?,
                })
            })
            .collect::<SustainResult<Vec<_>>>()?;
        Ok(OneTimeEventParams {
            annual_rate: require("annualRate", self.annual_rate, mode)?,
            events,
        })
    }
}

impl StoredExpenseIncrease {
    pub fn into_params(self, mode: MissingFields) -> SustainResult<ExpenseIncreaseParams> {
        Ok(ExpenseIncreaseParams {
            initial_expense: require("initialExpense", self.initial_expense, mode)?,
            increase_rate: require("increaseRate", self.increase_rate, mode)?,
            return_rate: require("returnRate", self.return_rate, mode)?,
        })
    }
}

impl StoredBondInflation {
    pub fn into_params(self, mode: MissingFields) -> SustainResult<BondInflationParams> {
        let contributions = self
            .contributions
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                Ok(Contribution {
                    year: require(&format!("contributions[{i}].year"), c.year, mode)?,
                    contribution: require(
                        &format!("contributions[{i}].contribution"),
                        c.contribution,
                        mode,
                    )?,
                })
            })
            .collect::<SustainResult<Vec<_>>>()?;
        Ok(BondInflationParams {
            present_value: require("presentValue", self.present_value, mode)?,
            interest_rate: require("interestRate", self.interest_rate, mode)?,
            term: require("term", self.term, mode)?,
            // An unset flag means "not fully funded" in either mode.
            fully_funded: self.fully_funded.unwrap_or(false),
            contributions,
            start_year: self.start_year,
        })
    }
}

impl StoredScenario {
    pub fn model(&self) -> StressModel {
        match self {
            StoredScenario::ReturnDrop(_) => StressModel::ReturnDrop,
            StoredScenario::RevenueDrop(_) => StressModel::RevenueDrop,
            StoredScenario::OneTimeEvent(_) => StressModel::OneTimeEvent,
            StoredScenario::ExpenseIncrease(_) => StressModel::ExpenseIncrease,
            StoredScenario::BondInflation(_) => StressModel::BondInflation,
        }
    }

    pub fn into_scenario(self, mode: MissingFields) -> SustainResult<StressScenario> {
        Ok(match self {
            StoredScenario::ReturnDrop(s) => StressScenario::ReturnDrop(s.into_params(mode)?),
            StoredScenario::RevenueDrop(s) => StressScenario::RevenueDrop(s.into_params(mode)?),
            StoredScenario::OneTimeEvent(s) => StressScenario::OneTimeEvent(s.into_params(mode)?),
            StoredScenario::ExpenseIncrease(s) => {
                StressScenario::ExpenseIncrease(s.into_params(mode)?)
            }
            StoredScenario::BondInflation(s) => {
                StressScenario::BondInflation(s.into_params(mode)?)
            }
        })
    }
}

impl TryFrom<StoredScenario> for StressScenario {
    type Error = SustainError;

    fn try_from(stored: StoredScenario) -> SustainResult<Self> {
        stored.into_scenario(MissingFields::Reject)
    }
}

// ---------------------------------------------------------------------------
// Params -> stored
// ---------------------------------------------------------------------------

impl From<&ReturnDropParams> for StoredReturnDrop {
    fn from(p: &ReturnDropParams) -> Self {
        StoredReturnDrop {
            present_value: Some(p.present_value),
            interest_rate: Some(p.interest_rate),
            term: Some(p.term),
            monthly_contribution: Some(p.monthly_contribution),
            drop_rate: Some(p.drop_rate),
            start_year: p.start_year,
        }
    }
}

impl From<&RevenueDropParams> for StoredRevenueDrop {
    fn from(p: &RevenueDropParams) -> Self {
        StoredRevenueDrop {
            base_revenue: Some(p.base_revenue),
            growth_rate: Some(p.growth_rate),
            start_year: Some(p.start_year),
            total_years: Some(p.total_years),
            initial_drop_percent: Some(p.initial_drop_percent),
        }
    }
}

impl From<&OneTimeEventParams> for StoredOneTimeEvent {
    fn from(p: &OneTimeEventParams) -> Self {
        StoredOneTimeEvent {
            annual_rate: Some(p.annual_rate),
            events: p
                .events
                .iter()
                .map(|e| StoredEvent {
                    year: Some(e.year),
                    amount: Some(e.amount),
                })
                .collect(),
        }
    }
}

impl From<&ExpenseIncreaseParams> for StoredExpenseIncrease {
    fn from(p: &ExpenseIncreaseParams) -> Self {
        StoredExpenseIncrease {
            initial_expense: Some(p.initial_expense),
            increase_rate: Some(p.increase_rate),
            return_rate: Some(p.return_rate),
        }
    }
}

impl From<&BondInflationParams> for StoredBondInflation {
    fn from(p: &BondInflationParams) -> Self {
        StoredBondInflation {
            present_value: Some(p.present_value),
            interest_rate: Some(p.interest_rate),
            term: Some(p.term),
            fully_funded: Some(p.fully_funded),
            contributions: p
                .contributions
                .iter()
                .map(|c| StoredContribution {
                    year: Some(c.year),
                    contribution: Some(c.contribution),
                })
                .collect(),
            start_year: p.start_year,
        }
    }
}

impl From<&StressScenario> for StoredScenario {
    fn from(s: &StressScenario) -> Self {
        match s {
            StressScenario::ReturnDrop(p) => StoredScenario::ReturnDrop(p.into()),
            StressScenario::RevenueDrop(p) => StoredScenario::RevenueDrop(p.into()),
            StressScenario::OneTimeEvent(p) => StoredScenario::OneTimeEvent(p.into()),
            StressScenario::ExpenseIncrease(p) => StoredScenario::ExpenseIncrease(p.into()),
            StressScenario::BondInflation(p) => StoredScenario::BondInflation(p.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
