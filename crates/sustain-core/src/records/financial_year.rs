use serde::{Deserialize, Serialize};

use crate::statement::record::{FinancialYearRecord, LineItem};

/// An audited year as the store returns it: camelCase keys, any amount may
/// be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFinancialYear {
    pub year: i32,
    pub revenue: Option<f64>,
    pub cost_contracting: Option<f64>,
    pub overhead: Option<f64>,
    pub salaries_and_benefits: Option<f64>,
    pub rent_and_overhead: Option<f64>,
    pub depreciation_and_amortization: Option<f64>,
    pub interest: Option<f64>,
    pub interest_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub gain_on_disposal_assets: Option<f64>,
    pub other_income: Option<f64>,
    pub income_taxes: Option<f64>,
    pub cash: Option<f64>,
    pub accounts_receivable: Option<f64>,
    pub inventory: Option<f64>,
    pub ppe: Option<f64>,
    pub investment: Option<f64>,
    pub accounts_payable: Option<f64>,
    pub current_debt_service: Option<f64>,
    pub taxes_payable: Option<f64>,
    pub long_term_debt_service: Option<f64>,
    pub loans_payable: Option<f64>,
    pub equity_capital: Option<f64>,
    pub retained_earnings: Option<f64>,
}

impl StoredFinancialYear {
    fn field(&self, item: LineItem) -> Option<f64> {
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

    /// The record with every absent amount set to zero.
    pub fn to_record(&self) -> FinancialYearRecord {
        let mut record = FinancialYearRecord::empty(self.year);
        for item in LineItem::ALL {
            record.set(item, self.field(item).unwrap_or(0.0));
        }
        record
    }

    /// Labels of the amounts `to_record` had to zero-fill.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        LineItem::ALL
            .into_iter()
            .filter(|item| self.field(*item).is_none())
            .map(LineItem::label)
            .collect()
    }
}

impl From<&FinancialYearRecord> for StoredFinancialYear {
    fn from(r: &FinancialYearRecord) -> Self {
        StoredFinancialYear {
            year: r.year,
            revenue: Some(r.revenue),
            cost_contracting: Some(r.cost_contracting),
            overhead: Some(r.overhead),
            salaries_and_benefits: Some(r.salaries_and_benefits),
            rent_and_overhead: Some(r.rent_and_overhead),
            depreciation_and_amortization: Some(r.depreciation_and_amortization),
            interest: Some(r.interest),
            interest_income: Some(r.interest_income),
            interest_expense: Some(r.interest_expense),
            gain_on_disposal_assets: Some(r.gain_on_disposal_assets),
            other_income: Some(r.other_income),
            income_taxes: Some(r.income_taxes),
            cash: Some(r.cash),
            accounts_receivable: Some(r.accounts_receivable),
            inventory: Some(r.inventory),
            ppe: Some(r.ppe),
            investment: Some(r.investment),
            accounts_payable: Some(r.accounts_payable),
            current_debt_service: Some(r.current_debt_service),
            taxes_payable: Some(r.taxes_payable),
            long_term_debt_service: Some(r.long_term_debt_service),
            loans_payable: Some(r.loans_payable),
            equity_capital: Some(r.equity_capital),
            retained_earnings: Some(r.retained_earnings),
        }
    }
}

/// Zero-fill a stored series. Returns the records and one warning per year
/// that had absent amounts.
pub fn adapt_financial_years(stored: &[StoredFinancialYear]) -> (Vec<FinancialYearRecord>, Vec<String>) {
    let mut warnings = Vec::new();
    let records = stored
        .iter()
        .map(|s| {
            let missing = s.missing_fields();
            if !missing.is_empty() {
                warnings.push(format!(
                    "Year {}: {} absent field(s) treated as zero ({})",
                    s.year,
                    missing.len(),
                    missing.join(", ")
                ));
            }
            s.to_record()
        })
        .collect();
    (records, warnings)
}
