use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};

use crate::ratio::RatioValue;

/// Inputs to a growth-projection DCF. Rates are fractions (0.08 = 8%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfInputs {
    pub free_cash_flow: f64,
    pub growth_rate: f64,
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub years: u32,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedCashFlow {
    pub year: u32,
    pub cash_flow: f64,
    pub present_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfValuation {
    pub projections: Vec<ProjectedCashFlow>,
    pub present_value_of_cash_flows: f64,
    /// Undefined when the discount rate equals the terminal growth rate
    pub terminal_value: RatioValue,
    pub discounted_terminal_value: RatioValue,
    pub intrinsic_value: RatioValue,
    /// Only when a positive share count was supplied
    pub intrinsic_value_per_share: Option<RatioValue>,
}

fn validate_rates(discount_rate: f64, terminal_growth: f64) -> Result<(), AnalysisError> {
    if !discount_rate.is_finite() || !terminal_growth.is_finite() {
        return Err(AnalysisError::InvalidData(
            "discount and terminal growth rates must be finite".to_string(),
        ));
    }
    if discount_rate <= -1.0 {
        return Err(AnalysisError::InvalidData(format!(
            "discount rate must be above -100%, got {}",
            discount_rate
        )));
    }
    Ok(())
}

/// Assemble a valuation from projected cash flows already discounted, with
/// the terminal value taken off the final projected cash flow.
fn assemble(
    projections: Vec<ProjectedCashFlow>,
    discount_rate: f64,
    terminal_growth: f64,
    shares_outstanding: Option<f64>,
) -> DcfValuation {
    let years = projections.len() as i32;
    let last_cash_flow = projections.last().map(|p| p.cash_flow).unwrap_or(0.0);
    let present_value_of_cash_flows: f64 = projections.iter().map(|p| p.present_value).sum();

    let terminal_value = RatioValue::divide(
        last_cash_flow * (1.0 + terminal_growth),
        discount_rate - terminal_growth,
    );
    let discounted_terminal_value =
        terminal_value.map(|tv| tv / (1.0 + discount_rate).powi(years));
    let intrinsic_value = discounted_terminal_value.map(|dtv| present_value_of_cash_flows + dtv);

    let intrinsic_value_per_share = shares_outstanding
        .filter(|shares| *shares > 0.0 && shares.is_finite())
        .map(|shares| intrinsic_value.map(|iv| iv / shares));

    DcfValuation {
        projections,
        present_value_of_cash_flows,
        terminal_value,
        discounted_terminal_value,
        intrinsic_value,
        intrinsic_value_per_share,
    }
}

/// Project `fcf * (1+g)^i` for `i = 1..=years`, discount each at `r`, and add
/// a Gordon-growth terminal value discounted `years` periods.
pub fn discounted_cash_flow(inputs: &DcfInputs) -> Result<DcfValuation, AnalysisError> {
    if !inputs.free_cash_flow.is_finite() || !inputs.growth_rate.is_finite() {
        return Err(AnalysisError::InvalidData(
            "free cash flow and growth rate must be finite".to_string(),
        ));
    }
    if inputs.years == 0 {
        return Err(AnalysisError::InvalidData(
            "projection horizon must be at least one year".to_string(),
        ));
    }
    validate_rates(inputs.discount_rate, inputs.terminal_growth)?;

    let projections = (1..=inputs.years)
        .map(|year| {
            let cash_flow = inputs.free_cash_flow * (1.0 + inputs.growth_rate).powi(year as i32);
            ProjectedCashFlow {
                year,
                cash_flow,
                present_value: cash_flow / (1.0 + inputs.discount_rate).powi(year as i32),
            }
        })
        .collect();

    Ok(assemble(
        projections,
        inputs.discount_rate,
        inputs.terminal_growth,
        inputs.shares_outstanding,
    ))
}

/// Discount an explicit list of forecast cash flows (year 1 first).
pub fn explicit_fcf_valuation(
    cash_flows: &[f64],
    discount_rate: f64,
    terminal_growth: f64,
    shares_outstanding: Option<f64>,
) -> Result<DcfValuation, AnalysisError> {
    if cash_flows.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "at least one forecast cash flow is required".to_string(),
        ));
    }
    if cash_flows.iter().any(|cf| !cf.is_finite()) {
        return Err(AnalysisError::InvalidData(
            "forecast cash flows must be finite".to_string(),
        ));
    }
    validate_rates(discount_rate, terminal_growth)?;

    let projections = cash_flows
        .iter()
        .enumerate()
        .map(|(i, cash_flow)| {
            let year = i as u32 + 1;
            ProjectedCashFlow {
                year,
                cash_flow: *cash_flow,
                present_value: cash_flow / (1.0 + discount_rate).powi(year as i32),
            }
        })
        .collect();

    Ok(assemble(projections, discount_rate, terminal_growth, shares_outstanding))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowOutlook {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeCashFlow {
    pub value: f64,
    pub outlook: CashFlowOutlook,
    pub interpretation: String,
}

/// `net income + depreciation - capex - change in working capital`
pub fn free_cash_flow(
    net_income: f64,
    depreciation: f64,
    capex: f64,
    working_capital_change: f64,
) -> Result<FreeCashFlow, AnalysisError> {
    let inputs = [net_income, depreciation, capex, working_capital_change];
    if inputs.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidData(
            "free cash flow inputs must be finite".to_string(),
        ));
    }

    let value = net_income + depreciation - capex - working_capital_change;
    let (outlook, interpretation) = if value > 0.0 {
        (
            CashFlowOutlook::Positive,
            "Positive FCF indicates strong liquidity and internal funding capacity.",
        )
    } else {
        (
            CashFlowOutlook::Negative,
            "Negative FCF may signal heavy investment or financial strain.",
        )
    };

    Ok(FreeCashFlow {
        value,
        outlook,
        interpretation: interpretation.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceVerdict {
    Undervalued,
    Overvalued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    pub upside_pct: f64,
    pub verdict: PriceVerdict,
}

/// Upside of an intrinsic value over the market price, in percent of price.
pub fn upside_to_price(intrinsic_value: f64, price: f64) -> Option<PriceComparison> {
    if price <= 0.0 || !price.is_finite() || !intrinsic_value.is_finite() {
        return None;
    }
    let upside_pct = (intrinsic_value - price) / price * 100.0;
    let verdict = if upside_pct > 0.0 {
        PriceVerdict::Undervalued
    } else {
        PriceVerdict::Overvalued
    };
    Some(PriceComparison { upside_pct, verdict })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> DcfInputs {
        DcfInputs {
            free_cash_flow: 100.0,
            growth_rate: 0.05,
            discount_rate: 0.10,
            terminal_growth: 0.02,
            years: 5,
            shares_outstanding: None,
        }
    }

    #[test]
    fn test_dcf_sums_projections_and_terminal() {
        let valuation = discounted_cash_flow(&base_inputs()).unwrap();
        assert_eq!(valuation.projections.len(), 5);

        let mut expected_pv = 0.0;
        for i in 1..=5 {
            expected_pv += 100.0 * 1.05f64.powi(i) / 1.10f64.powi(i);
        }
        assert!((valuation.present_value_of_cash_flows - expected_pv).abs() < 1e-9);

        let tv = 100.0 * 1.05f64.powi(5) * 1.02 / 0.08;
        let expected_iv = expected_pv + tv / 1.10f64.powi(5);
        let iv = valuation.intrinsic_value.value().unwrap();
        assert!((iv - expected_iv).abs() < 1e-6);
        assert!(valuation.intrinsic_value_per_share.is_none());
    }

    #[test]
    fn test_dcf_per_share() {
        let inputs = DcfInputs {
            shares_outstanding: Some(10.0),
            ..base_inputs()
        };
        let valuation = discounted_cash_flow(&inputs).unwrap();
        let total = valuation.intrinsic_value.value().unwrap();
        let per_share = valuation.intrinsic_value_per_share.unwrap().value().unwrap();
        assert!((per_share - total / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_dcf_equal_rates_make_terminal_undefined() {
        let inputs = DcfInputs {
            discount_rate: 0.03,
            terminal_growth: 0.03,
            ..base_inputs()
        };
        let valuation = discounted_cash_flow(&inputs).unwrap();
        assert!(valuation.terminal_value.is_undefined());
        assert!(valuation.intrinsic_value.is_undefined());
    }

    #[test]
    fn test_dcf_rejects_invalid_inputs() {
        let zero_years = DcfInputs { years: 0, ..base_inputs() };
        assert!(matches!(
            discounted_cash_flow(&zero_years),
            Err(AnalysisError::InvalidData(_))
        ));

        let nan_fcf = DcfInputs {
            free_cash_flow: f64::NAN,
            ..base_inputs()
        };
        assert!(discounted_cash_flow(&nan_fcf).is_err());
    }

    #[test]
    fn test_explicit_fcf_uses_last_flow_for_terminal() {
        let flows = [10.0, 12.0, 14.0, 16.0, 18.0];
        let valuation = explicit_fcf_valuation(&flows, 0.10, 0.02, Some(2.0)).unwrap();
        let tv = valuation.terminal_value.value().unwrap();
        assert!((tv - 18.0 * 1.02 / 0.08).abs() < 1e-9);
        assert!(valuation.intrinsic_value_per_share.is_some());

        assert!(matches!(
            explicit_fcf_valuation(&[], 0.1, 0.02, None),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_free_cash_flow_interpretation() {
        let positive = free_cash_flow(500.0, 100.0, 200.0, 50.0).unwrap();
        assert_eq!(positive.value, 350.0);
        assert_eq!(positive.outlook, CashFlowOutlook::Positive);

        let negative = free_cash_flow(100.0, 10.0, 300.0, 0.0).unwrap();
        assert_eq!(negative.outlook, CashFlowOutlook::Negative);
    }

    #[test]
    fn test_upside_to_price() {
        let cheap = upside_to_price(150.0, 100.0).unwrap();
        assert_eq!(cheap.upside_pct, 50.0);
        assert_eq!(cheap.verdict, PriceVerdict::Undervalued);

        let rich = upside_to_price(80.0, 100.0).unwrap();
        assert_eq!(rich.verdict, PriceVerdict::Overvalued);

        assert!(upside_to_price(80.0, 0.0).is_none());
    }
}
