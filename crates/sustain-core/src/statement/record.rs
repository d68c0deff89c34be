use serde::{Deserialize, Serialize};

use crate::error::SustainError;
use crate::types::{ensure_finite, ensure_year, Money};
use crate::SustainResult;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One audited fiscal year of raw figures.
///
/// Every amount is a signed finite number. `income_taxes` and
/// `interest_expense` are signed adjustments and are added, never subtracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialYearRecord {
    pub year: i32,
    // Income statement
    pub revenue: Money,
    pub cost_contracting: Money,
    pub overhead: Money,
    pub salaries_and_benefits: Money,
    pub rent_and_overhead: Money,
    pub depreciation_and_amortization: Money,
    pub interest: Money,
    pub interest_income: Money,
    pub interest_expense: Money,
    pub gain_on_disposal_assets: Money,
    pub other_income: Money,
    pub income_taxes: Money,
    // Balance sheet
    pub cash: Money,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub ppe: Money,
    pub investment: Money,
    pub accounts_payable: Money,
    pub current_debt_service: Money,
    pub taxes_payable: Money,
    pub long_term_debt_service: Money,
    pub loans_payable: Money,
    pub equity_capital: Money,
    pub retained_earnings: Money,
}

impl FinancialYearRecord {
    /// An all-zero record for `year`.
    pub fn empty(year: i32) -> Self {
        FinancialYearRecord {
            year,
            ..Default::default()
        }
    }

    pub fn get(&self, item: LineItem) -> Money {
        match item {
            LineItem::Revenue => self.revenue,
            LineItem::CostContracting => self.cost_contracting,
            LineItem::Overhead => self.overhead,
            LineItem::SalariesAndBenefits => self.salaries_and_benefits,
            LineItem::RentAndOverhead => self.rent_and_overhead,
            LineItem::DepreciationAndAmortization => self.depreciation_and_amortization,
            LineItem::Interest => self.interest,
            LineItem::InterestIncome => self.interest_income,
            LineItem::InterestExpense => self.interest_expense,
            LineItem::GainOnDisposalAssets => self.gain_on_disposal_assets,
            LineItem::OtherIncome => self.other_income,
            LineItem::IncomeTaxes => self.income_taxes,
            LineItem::Cash => self.cash,
            LineItem::AccountsReceivable => self.accounts_receivable,
            LineItem::Inventory => self.inventory,
            LineItem::Ppe => self.ppe,
            LineItem::Investment => self.investment,
            LineItem::AccountsPayable => self.accounts_payable,
            LineItem::CurrentDebtService => self.current_debt_service,
            LineItem::TaxesPayable => self.taxes_payable,
            LineItem::LongTermDebtService => self.long_term_debt_service,
            LineItem::LoansPayable => self.loans_payable,
            LineItem::EquityCapital => self.equity_capital,
            LineItem::RetainedEarnings => self.retained_earnings,
        }
    }

    pub fn set(&mut self, item: LineItem, value: Money) {
        let slot = match item {
            LineItem::Revenue => &mut self.revenue,
            LineItem::CostContracting => &mut self.cost_contracting,
            LineItem::Overhead => &mut self.overhead,
            LineItem::SalariesAndBenefits => &mut self.salaries_and_benefits,
            LineItem::RentAndOverhead => &mut self.rent_and_overhead,
            LineItem::DepreciationAndAmortization => &mut self.depreciation_and_amortization,
            LineItem::Interest => &mut self.interest,
            LineItem::InterestIncome => &mut self.interest_income,
            LineItem::InterestExpense => &mut self.interest_expense,
            LineItem::GainOnDisposalAssets => &mut self.gain_on_disposal_assets,
            LineItem::OtherIncome => &mut self.other_income,
            LineItem::IncomeTaxes => &mut self.income_taxes,
            LineItem::Cash => &mut self.cash,
            LineItem::AccountsReceivable => &mut self.accounts_receivable,
            LineItem::Inventory => &mut self.inventory,
            LineItem::Ppe => &mut self.ppe,
            LineItem::Investment => &mut self.investment,
            LineItem::AccountsPayable => &mut self.accounts_payable,
            LineItem::CurrentDebtService => &mut self.current_debt_service,
            LineItem::TaxesPayable => &mut self.taxes_payable,
            LineItem::LongTermDebtService => &mut self.long_term_debt_service,
            LineItem::LoansPayable => &mut self.loans_payable,
            LineItem::EquityCapital => &mut self.equity_capital,
            LineItem::RetainedEarnings => &mut self.retained_earnings,
        };
        *slot = value;
    }

    /// Reject an out-of-range year or any non-finite field.
    pub fn validate(&self) -> SustainResult<()> {
        ensure_year("year", self.year)?;
        for item in LineItem::ALL {
            ensure_finite(&format!("{} ({})", item.label(), self.year), self.get(item))?;
        }
        Ok(())
    }
}

/// Validate a chronologically ordered series: finite fields, strictly
/// ascending and therefore unique years.
pub fn validate_series(records: &[FinancialYearRecord]) -> SustainResult<()> {
    for record in records {
        record.validate()?;
    }
    for pair in records.windows(2) {
        if pair[1].year == pair[0].year {
            return Err(SustainError::invalid(
                "year",
                format!("Duplicate fiscal year {}", pair[1].year),
            ));
        }
        if pair[1].year < pair[0].year {
            return Err(SustainError::invalid(
                "year",
                format!(
                    "Records must be in ascending year order ({} follows {})",
                    pair[1].year, pair[0].year
                ),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// The raw, forecastable line items of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    Revenue,
    CostContracting,
    Overhead,
    SalariesAndBenefits,
    RentAndOverhead,
    DepreciationAndAmortization,
    Interest,
    InterestIncome,
    InterestExpense,
    GainOnDisposalAssets,
    OtherIncome,
    IncomeTaxes,
    Cash,
    AccountsReceivable,
    Inventory,
    Ppe,
    Investment,
    AccountsPayable,
    CurrentDebtService,
    TaxesPayable,
    LongTermDebtService,
    LoansPayable,
    EquityCapital,
    RetainedEarnings,
}

impl LineItem {
    pub const ALL: [LineItem; 24] = [
        LineItem::Revenue,
        LineItem::CostContracting,
        LineItem::Overhead,
        LineItem::SalariesAndBenefits,
        LineItem::RentAndOverhead,
        LineItem::DepreciationAndAmortization,
        LineItem::Interest,
        LineItem::InterestIncome,
        LineItem::InterestExpense,
        LineItem::GainOnDisposalAssets,
        LineItem::OtherIncome,
        LineItem::IncomeTaxes,
        LineItem::Cash,
        LineItem::AccountsReceivable,
        LineItem::Inventory,
        LineItem::Ppe,
        LineItem::Investment,
        LineItem::AccountsPayable,
        LineItem::CurrentDebtService,
        LineItem::TaxesPayable,
        LineItem::LongTermDebtService,
        LineItem::LoansPayable,
        LineItem::EquityCapital,
        LineItem::RetainedEarnings,
    ];

    /// Human-readable label, as shown in the statement and used to key policies.
    pub fn label(self) -> &'static str {
        match self {
            LineItem::Revenue => "Revenue",
            LineItem::CostContracting => "Cost of Contracting",
            LineItem::Overhead => "Overhead",
            LineItem::SalariesAndBenefits => "Salaries and Benefits",
            LineItem::RentAndOverhead => "Rent and Overhead",
            LineItem::DepreciationAndAmortization => "Depreciation and Amortization",
            LineItem::Interest => "Interest",
            LineItem::InterestIncome => "Interest Income",
            LineItem::InterestExpense => "Interest Expense",
            LineItem::GainOnDisposalAssets => "Gain on Disposal of Assets",
            LineItem::OtherIncome => "Other Income",
            LineItem::IncomeTaxes => "Income Taxes",
            LineItem::Cash => "Cash and Cash Equivalents",
            LineItem::AccountsReceivable => "Accounts Receivable",
            LineItem::Inventory => "Inventory",
            LineItem::Ppe => "Property, Plant and Equipment",
            LineItem::Investment => "Investment",
            LineItem::AccountsPayable => "Accounts Payable",
            LineItem::CurrentDebtService => "Current Debt Service",
            LineItem::TaxesPayable => "Taxes Payable",
            LineItem::LongTermDebtService => "Long-Term Debt Service",
            LineItem::LoansPayable => "Loans Payable",
            LineItem::EquityCapital => "Equity Capital",
            LineItem::RetainedEarnings => "Retained Earnings",
        }
    }

    pub fn from_label(label: &str) -> Option<LineItem> {
        let label = label.trim();
        LineItem::ALL.into_iter().find(|item| item.label() == label)
    }
}

/// Labels of computed lines. These are always re-derived, never forecast.
pub const DERIVED_LABELS: [&str; 22] = [
    "Net Sales",
    "Cost of Goods Sold",
    "Gross Profit",
    "Total Operating Expenses",
    "Profit from Operations",
    "Total Other Income",
    "Income Before Taxes",
    "Net Income",
    "Total Current Assets",
    "Total Long-Term Assets",
    "Total Assets",
    "Total Current Liabilities",
    "Total Long-Term Liabilities",
    "Total Liabilities",
    "Total Stockholders' Equity",
    "Total Liabilities and Equity",
    "Gross Margin %",
    "Operating Expenses %",
    "Profit from Operations %",
    "Total Other Income %",
    "Pre-Tax Income %",
    "Net Income %",
];

/// True for "Total ..." lines, percentage lines and the other computed lines.
pub fn is_derived_label(label: &str) -> bool {
    let label = label.trim();
    label.starts_with("Total ") || label.ends_with('%') || DERIVED_LABELS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for item in LineItem::ALL {
            assert_eq!(LineItem::from_label(item.label()), Some(item));
        }
        assert_eq!(LineItem::from_label("  Revenue "), Some(LineItem::Revenue));
        assert_eq!(LineItem::from_label("Gross Profit"), None);
    }

    #[test]
    fn test_get_set_every_field() {
        let mut r = FinancialYearRecord::empty(2024);
        for (i, item) in LineItem::ALL.into_iter().enumerate() {
            r.set(item, i as f64 + 1.0);
        }
        for (i, item) in LineItem::ALL.into_iter().enumerate() {
            assert_eq!(r.get(item), i as f64 + 1.0, "{}", item.label());
        }
    }

    #[test]
    fn test_derived_labels() {
        assert!(is_derived_label("Total Assets"));
        assert!(is_derived_label("Total Something New"));
        assert!(is_derived_label("Gross Margin %"));
        assert!(is_derived_label("Net Income"));
        assert!(!is_derived_label("Revenue"));
        assert!(!is_derived_label("Interest Income"));
        for item in LineItem::ALL {
            assert!(!is_derived_label(item.label()));
        }
    }

    #[test]
    fn test_validate_rejects_nan_field() {
        let mut r = FinancialYearRecord::empty(2024);
        r.inventory = f64::NAN;
        match r.validate() {
            Err(SustainError::InvalidInput { field, .. }) => assert!(field.contains("Inventory")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_year() {
        assert!(FinancialYearRecord::empty(0).validate().is_err());
        assert!(FinancialYearRecord::empty(i32::MAX).validate().is_err());
        assert!(FinancialYearRecord::empty(9_999).validate().is_ok());
    }

    #[test]
    fn test_validate_series_duplicate_year() {
        let rs = vec![FinancialYearRecord::empty(2022), FinancialYearRecord::empty(2022)];
        assert!(validate_series(&rs).is_err());
    }

    #[test]
    fn test_validate_series_unordered() {
        let rs = vec![FinancialYearRecord::empty(2023), FinancialYearRecord::empty(2022)];
        assert!(validate_series(&rs).is_err());
    }

    #[test]
    fn test_validate_series_accepts_gaps_and_negatives() {
        let mut a = FinancialYearRecord::empty(2019);
        a.other_income = -500.0;
        let rs = vec![a, FinancialYearRecord::empty(2021)];
        assert!(validate_series(&rs).is_ok());
    }
}
