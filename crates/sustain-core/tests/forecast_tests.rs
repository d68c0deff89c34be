use std::collections::BTreeMap;

use sustain_core::forecast::{build_forecast, forecast, ForecastInput, ForecastPolicy, PolicySet};
use sustain_core::statement::{derive, FinancialYearRecord, LineItem};
use sustain_core::SustainError;

fn audited(year: i32, revenue: f64, salaries: f64) -> FinancialYearRecord {
    FinancialYearRecord {
        year,
        revenue,
        cost_contracting: revenue * 0.2,
        overhead: 10_000.0,
        salaries_and_benefits: salaries,
        rent_and_overhead: 12_000.0,
        cash: 80_000.0,
        ppe: 150_000.0,
        loans_payable: 60_000.0,
        equity_capital: 100_000.0,
        retained_earnings: 70_000.0,
        ..Default::default()
    }
}

#[test]
fn test_zero_horizon_empty() {
    let base = derive(&audited(2024, 500_000.0, 200_000.0));
    assert!(forecast(&base, &PolicySet::uniform(ForecastPolicy::Average), 3.0, 0).is_empty());
}

#[test]
fn test_multiplier_zero_identical_to_base() {
    let base = derive(&audited(2024, 500_000.0, 200_000.0));
    let out = forecast(&base, &PolicySet::uniform(ForecastPolicy::Multiplier), 0.0, 10);
    assert_eq!(out.len(), 10);
    for s in &out {
        for item in LineItem::ALL {
            assert_eq!(s.record.get(item), base.record.get(item));
        }
        assert_eq!(s.total_assets, base.total_assets);
    }
}

#[test]
fn test_multiplier_matches_closed_form() {
    let base = derive(&audited(2024, 500_000.0, 200_000.0));
    let policies = PolicySet::uniform(ForecastPolicy::Multiplier);
    let out = forecast(&base, &policies, 4.0, 30);
    for (i, s) in out.iter().enumerate() {
        let closed = 500_000.0 * 1.04_f64.powi(i as i32 + 1);
        assert!((s.record.revenue - closed).abs() / closed < 1e-12);
    }
}

#[test]
fn test_mixed_policies_end_to_end() {
    let input = ForecastInput {
        history: vec![
            audited(2021, 400_000.0, 150_000.0),
            audited(2022, 450_000.0, 180_000.0),
            audited(2023, 500_000.0, 210_000.0),
        ],
        policies: BTreeMap::from([
            ("Revenue".to_string(), ForecastPolicy::Multiplier),
            ("Salaries and Benefits".to_string(), ForecastPolicy::Average),
        ]),
        multiplier_percent: 10.0,
        horizon_years: 2,
    };
    let out = build_forecast(&input).unwrap().result;
    let y1 = &out.forecast[0];
    assert_eq!(y1.year(), 2024);
    assert!((y1.record.revenue - 550_000.0).abs() < 1e-6);
    assert!((y1.record.salaries_and_benefits - 180_000.0).abs() < 1e-6);
    // Cost of contracting has no policy and carries forward from 2023
    assert!((y1.record.cost_contracting - 100_000.0).abs() < 1e-6);
    assert!((y1.net_sales - 550_000.0).abs() < 1e-6);

    let y2 = &out.forecast[1];
    // mean(180k, 210k, 180k)
    assert!((y2.record.salaries_and_benefits - 190_000.0).abs() < 1e-6);
    assert!((y2.record.revenue - 605_000.0).abs() < 1e-6);
}

#[test]
fn test_unknown_label_rejected() {
    let input = ForecastInput {
        history: vec![audited(2024, 1.0, 1.0)],
        policies: BTreeMap::from([("Widgets".to_string(), ForecastPolicy::Average)]),
        multiplier_percent: 0.0,
        horizon_years: 1,
    };
    match build_forecast(&input) {
        Err(SustainError::InvalidInput { field, .. }) => assert_eq!(field, "policies.Widgets"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_forecast_input_from_json() {
    let json = r#"{
        "history": [{
            "year": 2024, "revenue": 1000.0, "cost_contracting": 0.0, "overhead": 0.0,
            "salaries_and_benefits": 0.0, "rent_and_overhead": 0.0,
            "depreciation_and_amortization": 0.0, "interest": 0.0, "interest_income": 0.0,
            "interest_expense": 0.0, "gain_on_disposal_assets": 0.0, "other_income": 0.0,
            "income_taxes": 0.0, "cash": 0.0, "accounts_receivable": 0.0, "inventory": 0.0,
            "ppe": 0.0, "investment": 0.0, "accounts_payable": 0.0,
            "current_debt_service": 0.0, "taxes_payable": 0.0,
            "long_term_debt_service": 0.0, "loans_payable": 0.0, "equity_capital": 0.0,
            "retained_earnings": 0.0
        }],
        "policies": {"Revenue": "Multiplier"},
        "multiplier_percent": 50,
        "horizon_years": 2
    }"#;
    let input: ForecastInput = serde_json::from_str(json).unwrap();
    let out = build_forecast(&input).unwrap().result;
    assert_eq!(out.forecast[1].record.revenue, 2_250.0);
}
