use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::statement::record::{validate_series, FinancialYearRecord, LineItem};
use crate::types::{with_metadata, ComputationOutput, Money, Ratio};
use crate::SustainResult;

/// Tolerance below which assets and liabilities-plus-equity count as equal.
const BALANCE_TOLERANCE: Money = 0.005;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A record plus every computed total and ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStatement {
    #[serde(flatten)]
    pub record: FinancialYearRecord,

    // Income statement
    pub net_sales: Money,
    pub cost_of_goods_sold: Money,
    pub gross_profit: Money,
    pub total_operating_expenses: Money,
    pub profit_from_operations: Money,
    pub total_other_income: Money,
    pub income_before_taxes: Money,
    pub net_income: Money,

    // Balance sheet
    pub total_current_assets: Money,
    pub total_long_term_assets: Money,
    pub total_assets: Money,
    pub total_current_liabilities: Money,
    pub total_long_term_liabilities: Money,
    pub total_liabilities: Money,
    pub total_stockholders_equity: Money,
    pub total_liabilities_and_equity: Money,

    // Ratios to net sales
    pub gross_margin_percent: Ratio,
    pub operating_expenses_percent: Ratio,
    pub profit_from_operations_percent: Ratio,
    pub total_other_income_percent: Ratio,
    pub pre_tax_income_percent: Ratio,
    pub net_income_percent: Ratio,
}

/// One displayable line of a derived statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatementValue {
    Amount(Money),
    Ratio(Ratio),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub label: &'static str,
    pub value: StatementValue,
}

impl DerivedStatement {
    pub fn year(&self) -> i32 {
        self.record.year
    }

    /// Every raw and computed line in presentation order.
    pub fn rows(&self) -> Vec<StatementRow> {
        use StatementValue::{Amount, Ratio as R};
        let r = &self.record;
        let raw = |item: LineItem| StatementRow {
            label: item.label(),
            value: Amount(r.get(item)),
        };
        let amount = |label, v| StatementRow { label, value: Amount(v) };
        let ratio = |label, v| StatementRow { label, value: R(v) };

        vec![
            amount("Net Sales", self.net_sales),
            raw(LineItem::CostContracting),
            raw(LineItem::Overhead),
            amount("Cost of Goods Sold", self.cost_of_goods_sold),
            amount("Gross Profit", self.gross_profit),
            ratio("Gross Margin %", self.gross_margin_percent),
            raw(LineItem::SalariesAndBenefits),
            raw(LineItem::RentAndOverhead),
            raw(LineItem::DepreciationAndAmortization),
            raw(LineItem::Interest),
            amount("Total Operating Expenses", self.total_operating_expenses),
            ratio("Operating Expenses %", self.operating_expenses_percent),
            amount("Profit from Operations", self.profit_from_operations),
            ratio("Profit from Operations %", self.profit_from_operations_percent),
            raw(LineItem::InterestIncome),
            raw(LineItem::InterestExpense),
            raw(LineItem::GainOnDisposalAssets),
            raw(LineItem::OtherIncome),
            amount("Total Other Income", self.total_other_income),
            ratio("Total Other Income %", self.total_other_income_percent),
            amount("Income Before Taxes", self.income_before_taxes),
            ratio("Pre-Tax Income %", self.pre_tax_income_percent),
            raw(LineItem::IncomeTaxes),
            amount("Net Income", self.net_income),
            ratio("Net Income %", self.net_income_percent),
            raw(LineItem::Cash),
            raw(LineItem::AccountsReceivable),
            raw(LineItem::Inventory),
            amount("Total Current Assets", self.total_current_assets),
            raw(LineItem::Ppe),
            raw(LineItem::Investment),
            amount("Total Long-Term Assets", self.total_long_term_assets),
            amount("Total Assets", self.total_assets),
            raw(LineItem::AccountsPayable),
            raw(LineItem::CurrentDebtService),
            raw(LineItem::TaxesPayable),
            amount("Total Current Liabilities", self.total_current_liabilities),
            raw(LineItem::LongTermDebtService),
            raw(LineItem::LoansPayable),
            amount("Total Long-Term Liabilities", self.total_long_term_liabilities),
            amount("Total Liabilities", self.total_liabilities),
            raw(LineItem::EquityCapital),
            raw(LineItem::RetainedEarnings),
            amount("Total Stockholders' Equity", self.total_stockholders_equity),
            amount("Total Liabilities and Equity", self.total_liabilities_and_equity),
        ]
    }

    /// Difference between total assets and total liabilities plus equity.
    /// Nothing forces this to zero.
    pub fn balance_gap(&self) -> Money {
        self.total_assets - self.total_liabilities_and_equity
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full statement for one year. Pure and total: absent fields
/// must already be zero-filled by the caller.
pub fn derive(record: &FinancialYearRecord) -> DerivedStatement {
    let r = record;

    // Level 1: independent sums
    let net_sales = r.revenue;
    let cost_of_goods_sold = r.cost_contracting + r.overhead;
    let total_operating_expenses = r.salaries_and_benefits
        + r.rent_and_overhead
        + r.depreciation_and_amortization
        + r.interest;
    let total_other_income =
        r.interest_income + r.interest_expense + r.gain_on_disposal_assets + r.other_income;
    let total_current_assets = r.cash + r.accounts_receivable + r.inventory;
    let total_long_term_assets = r.ppe + r.investment;
    let total_current_liabilities = r.accounts_payable + r.current_debt_service + r.taxes_payable;
    let total_long_term_liabilities = r.long_term_debt_service + r.loans_payable;
    let total_stockholders_equity = r.equity_capital + r.retained_earnings;

    // Level 2
    let gross_profit = net_sales - cost_of_goods_sold;
    let profit_from_operations = gross_profit - total_operating_expenses;
    let income_before_taxes = profit_from_operations + total_other_income;
    // Income taxes are a signed adjustment.
    let net_income = income_before_taxes + r.income_taxes;
    let total_assets = total_current_assets + total_long_term_assets;
    let total_liabilities = total_current_liabilities + total_long_term_liabilities;
    let total_liabilities_and_equity = total_liabilities + total_stockholders_equity;

    // Level 3: ratios to net sales
    DerivedStatement {
        record: record.clone(),
        net_sales,
        cost_of_goods_sold,
        gross_profit,
        total_operating_expenses,
        profit_from_operations,
        total_other_income,
        income_before_taxes,
        net_income,
        total_current_assets,
        total_long_term_assets,
        total_assets,
        total_current_liabilities,
        total_long_term_liabilities,
        total_liabilities,
        total_stockholders_equity,
        total_liabilities_and_equity,
        gross_margin_percent: Ratio::of(gross_profit, net_sales),
        operating_expenses_percent: Ratio::of(total_operating_expenses, net_sales),
        profit_from_operations_percent: Ratio::of(profit_from_operations, net_sales),
        total_other_income_percent: Ratio::of(total_other_income, net_sales),
        pre_tax_income_percent: Ratio::of(income_before_taxes, net_sales),
        net_income_percent: Ratio::of(net_income, net_sales),
    }
}

/// Validate an audited series and derive every year.
pub fn derive_statements(
    records: &[FinancialYearRecord],
) -> SustainResult<ComputationOutput<Vec<DerivedStatement>>> {
    let start = Instant::now();
    validate_series(records)?;
    tracing::debug!(years = records.len(), "deriving audited statements");

    let statements: Vec<DerivedStatement> = records.iter().map(derive).collect();
    let warnings = statement_warnings(&statements);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Financial statement derivation (sums, margins, ratios to net sales)",
        &records,
        warnings,
        elapsed,
        statements,
    ))
}

pub(crate) fn statement_warnings(statements: &[DerivedStatement]) -> Vec<String> {
    let mut warnings = Vec::new();
    for s in statements {
        if s.net_sales == 0.0 {
            warnings.push(format!(
                "Year {}: net sales is zero, percentage ratios are undefined",
                s.year()
            ));
        }
        let gap = s.balance_gap();
        if gap.abs() > BALANCE_TOLERANCE {
            warnings.push(format!(
                "Year {}: total assets differ from liabilities and equity by {gap:.2}",
                s.year()
            ));
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> FinancialYearRecord {
        FinancialYearRecord {
            year: 2024,
            revenue: 100_000.0,
            cost_contracting: 20_000.0,
            overhead: 10_000.0,
            salaries_and_benefits: 30_000.0,
            rent_and_overhead: 5_000.0,
            depreciation_and_amortization: 5_000.0,
            interest: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_income_statement() {
        let s = derive(&sample_record());
        assert_eq!(s.net_sales, 100_000.0);
        assert_eq!(s.cost_of_goods_sold, 30_000.0);
        assert_eq!(s.gross_profit, 70_000.0);
        assert_eq!(s.total_operating_expenses, 40_000.0);
        assert_eq!(s.profit_from_operations, 30_000.0);
        assert_eq!(s.income_before_taxes, 30_000.0);
        assert_eq!(s.net_income, 30_000.0);
        assert_eq!(s.gross_margin_percent, Ratio::Fraction(0.70));
        assert_eq!(s.net_income_percent, Ratio::Fraction(0.30));
    }

    #[test]
    fn test_income_taxes_are_added() {
        let mut r = sample_record();
        r.income_taxes = -7_500.0;
        let s = derive(&r);
        assert_eq!(s.net_income, 22_500.0);

        r.income_taxes = 1_000.0;
        assert_eq!(derive(&r).net_income, 31_000.0);
    }

    #[test]
    fn test_other_income_includes_signed_interest_expense() {
        let mut r = sample_record();
        r.interest_income = 1_200.0;
        r.interest_expense = -200.0;
        r.gain_on_disposal_assets = 500.0;
        r.other_income = 300.0;
        let s = derive(&r);
        assert_eq!(s.total_other_income, 1_800.0);
        assert_eq!(s.income_before_taxes, 31_800.0);
    }

    #[test]
    fn test_zero_net_sales_marks_ratios_undefined() {
        let mut r = sample_record();
        r.revenue = 0.0;
        let s = derive(&r);
        assert!(s.gross_margin_percent.is_undefined());
        assert!(s.operating_expenses_percent.is_undefined());
        assert!(s.profit_from_operations_percent.is_undefined());
        assert!(s.total_other_income_percent.is_undefined());
        assert!(s.pre_tax_income_percent.is_undefined());
        assert!(s.net_income_percent.is_undefined());
        assert_eq!(s.gross_profit, -30_000.0);
    }

    #[test]
    fn test_balance_sheet_totals() {
        let r = FinancialYearRecord {
            year: 2024,
            cash: 10.0,
            accounts_receivable: 20.0,
            inventory: 30.0,
            ppe: 100.0,
            investment: 40.0,
            accounts_payable: 5.0,
            current_debt_service: 6.0,
            taxes_payable: 7.0,
            long_term_debt_service: 8.0,
            loans_payable: 9.0,
            equity_capital: 50.0,
            retained_earnings: 15.0,
            ..Default::default()
        };
        let s = derive(&r);
        assert_eq!(s.total_current_assets, 60.0);
        assert_eq!(s.total_long_term_assets, 140.0);
        assert_eq!(s.total_assets, 200.0);
        assert_eq!(s.total_current_liabilities, 18.0);
        assert_eq!(s.total_long_term_liabilities, 17.0);
        assert_eq!(s.total_liabilities, 35.0);
        assert_eq!(s.total_stockholders_equity, 65.0);
        assert_eq!(s.total_liabilities_and_equity, 100.0);
    }

    #[test]
    fn test_unbalanced_sheet_is_not_forced() {
        let r = FinancialYearRecord {
            year: 2024,
            cash: 1_000.0,
            equity_capital: 400.0,
            ..Default::default()
        };
        let s = derive(&r);
        assert_eq!(s.total_assets, 1_000.0);
        assert_eq!(s.total_liabilities_and_equity, 400.0);
        assert_eq!(s.balance_gap(), 600.0);
    }

    #[test]
    fn test_rederive_is_idempotent() {
        let first = derive(&sample_record());
        let second = derive(&first.record);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rows_cover_every_raw_item() {
        let s = derive(&sample_record());
        let rows = s.rows();
        for item in LineItem::ALL {
            if item == LineItem::Revenue {
                continue;
            }
            assert!(rows.iter().any(|row| row.label == item.label()), "{}", item.label());
        }
        assert_eq!(rows[0].label, "Net Sales");
        assert_eq!(rows[0].value, StatementValue::Amount(100_000.0));
    }

    #[test]
    fn test_derive_statements_warnings() {
        let mut zero_sales = sample_record();
        zero_sales.year = 2025;
        zero_sales.revenue = 0.0;
        zero_sales.cash = 10.0;
        let out = derive_statements(&[sample_record(), zero_sales]).unwrap();
        assert_eq!(out.result.len(), 2);
        assert!(out.warnings.iter().any(|w| w.contains("net sales is zero")));
        assert!(out.warnings.iter().any(|w| w.contains("differ")));
    }

    #[test]
    fn test_derive_statements_rejects_duplicates() {
        assert!(derive_statements(&[sample_record(), sample_record()]).is_err());
    }

    #[test]
    fn test_derive_statements_nan_propagates_only_from_computation() {
        let mut r = sample_record();
        r.revenue = f64::MAX;
        r.other_income = f64::MAX;
        let out = derive_statements(&[r]).unwrap();
        assert!(out.result[0].income_before_taxes.is_infinite());
    }
}
