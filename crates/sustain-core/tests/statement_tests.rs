use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sustain_core::statement::{derive, derive_statements, FinancialYearRecord, LineItem};
use sustain_core::types::Ratio;

// ===========================================================================
// Reference statement
// ===========================================================================

fn reference_record() -> FinancialYearRecord {
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
fn test_reference_statement() {
    let s = derive(&reference_record());
    assert_eq!(s.cost_of_goods_sold, 30_000.0);
    assert_eq!(s.gross_profit, 70_000.0);
    assert_eq!(s.total_operating_expenses, 40_000.0);
    assert_eq!(s.profit_from_operations, 30_000.0);
    assert_eq!(s.net_income, 30_000.0);
    assert_eq!(s.gross_margin_percent, Ratio::Fraction(0.70));
}

#[test]
fn test_full_year_with_every_field() {
    let r = FinancialYearRecord {
        year: 2023,
        revenue: 2_500_000.0,
        cost_contracting: 900_000.0,
        overhead: 250_000.0,
        salaries_and_benefits: 600_000.0,
        rent_and_overhead: 120_000.0,
        depreciation_and_amortization: 80_000.0,
        interest: 20_000.0,
        interest_income: 15_000.0,
        interest_expense: -12_000.0,
        gain_on_disposal_assets: 4_000.0,
        other_income: 1_000.0,
        income_taxes: -140_000.0,
        cash: 400_000.0,
        accounts_receivable: 300_000.0,
        inventory: 50_000.0,
        ppe: 1_200_000.0,
        investment: 600_000.0,
        accounts_payable: 180_000.0,
        current_debt_service: 60_000.0,
        taxes_payable: 40_000.0,
        long_term_debt_service: 500_000.0,
        loans_payable: 250_000.0,
        equity_capital: 1_000_000.0,
        retained_earnings: 520_000.0,
    };
    let s = derive(&r);
    assert_eq!(s.cost_of_goods_sold, 1_150_000.0);
    assert_eq!(s.gross_profit, 1_350_000.0);
    assert_eq!(s.total_operating_expenses, 820_000.0);
    assert_eq!(s.profit_from_operations, 530_000.0);
    assert_eq!(s.total_other_income, 8_000.0);
    assert_eq!(s.income_before_taxes, 538_000.0);
    assert_eq!(s.net_income, 398_000.0);
    assert_eq!(s.total_assets, 2_550_000.0);
    assert_eq!(s.total_liabilities, 1_030_000.0);
    assert_eq!(s.total_liabilities_and_equity, 2_550_000.0);
    assert_eq!(s.balance_gap(), 0.0);
}

#[test]
fn test_no_forced_balance() {
    let mut r = reference_record();
    r.cash = 10_000.0;
    r.loans_payable = 3_000.0;
    let s = derive(&r);
    assert!(s.total_assets != s.total_liabilities_and_equity);
}

#[test]
fn test_zero_sales_ratios_serialise_as_null() {
    let mut r = reference_record();
    r.revenue = 0.0;
    let value = serde_json::to_value(derive(&r)).unwrap();
    assert!(value["gross_margin_percent"].is_null());
    assert!(value["net_income_percent"].is_null());
    assert_eq!(value["revenue"], serde_json::json!(0.0));
}

#[test]
fn test_derive_statements_series() {
    let mut next = reference_record();
    next.year = 2025;
    next.revenue = 120_000.0;
    let out = derive_statements(&[reference_record(), next]).unwrap();
    assert_eq!(out.result.len(), 2);
    assert_eq!(out.result[1].gross_profit, 90_000.0);
    assert!(out.methodology.contains("derivation"));
}

// ===========================================================================
// Properties
// ===========================================================================

fn amount() -> impl Strategy<Value = f64> {
    -1.0e9..1.0e9_f64
}

prop_compose! {
    fn any_record()(year in 1990..2100_i32, values in proptest::collection::vec(amount(), 24)) -> FinancialYearRecord {
        let mut r = FinancialYearRecord::empty(year);
        for (item, v) in LineItem::ALL.into_iter().zip(values) {
            r.set(item, v);
        }
        r
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_derive_is_idempotent(record in any_record()) {
        let first = derive(&record);
        let second = derive(&first.record);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_totals_are_sums(record in any_record()) {
        let s = derive(&record);
        prop_assert_eq!(s.total_assets, s.total_current_assets + s.total_long_term_assets);
        prop_assert_eq!(s.net_income, s.income_before_taxes + record.income_taxes);
        prop_assert_eq!(s.gross_margin_percent.is_undefined(), record.revenue == 0.0);
    }
}
