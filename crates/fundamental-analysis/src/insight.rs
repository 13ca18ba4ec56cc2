//! Short qualitative commentary over formatted ratio lines.
//!
//! Input lines look like `"Current Ratio = 2.00"`. Lines that do not parse,
//! or that belong to another family, are ignored.

use crate::ratio::{Ratio, RatioFamily, RatioReport};

const LIQUIDITY_PLACEHOLDER: &str = "Results will appear after calculation.";
const PROFITABILITY_PLACEHOLDER: &str = "Results and insights will appear here.";
const LEVERAGE_PLACEHOLDER: &str = "Results and commentary will appear here.";
const EFFICIENCY_PLACEHOLDER: &str = "Results and efficiency commentary will appear here.";
const MARKET_VALUE_PLACEHOLDER: &str = "Valuation insights will appear here.";

/// Split `"Label = value"` into a known ratio and its display text.
fn parse_line(line: &str) -> Option<(Ratio, &str)> {
    let (label, value) = line.split_once('=')?;
    let ratio = Ratio::from_label(label)?;
    Some((ratio, value.trim()))
}

/// Leading number of a display value: `"1,234.50%"` → 1234.5
fn parse_value(text: &str) -> Option<f64> {
    let numeric: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | ','))
        .filter(|c| *c != ',')
        .collect();
    numeric.parse().ok()
}

pub fn placeholder(family: RatioFamily) -> &'static str {
    match family {
        RatioFamily::Liquidity => LIQUIDITY_PLACEHOLDER,
        RatioFamily::Profitability => PROFITABILITY_PLACEHOLDER,
        RatioFamily::Leverage => LEVERAGE_PLACEHOLDER,
        RatioFamily::Efficiency => EFFICIENCY_PLACEHOLDER,
        RatioFamily::MarketValue => MARKET_VALUE_PLACEHOLDER,
    }
}

/// One display line of commentary for `family`, or the family's placeholder
/// when none of `lines` contributes.
pub fn summarize_insight<S: AsRef<str>>(family: RatioFamily, lines: &[S]) -> String {
    let parsed: Vec<(Ratio, &str)> = lines
        .iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .filter(|(ratio, _)| ratio.family() == family)
        .collect();

    let find = |wanted: Ratio| {
        parsed
            .iter()
            .find(|(ratio, _)| *ratio == wanted)
            .map(|(_, text)| *text)
    };

    let mut messages: Vec<String> = Vec::new();
    let separator = match family {
        RatioFamily::Liquidity => {
            if let Some(current) = find(Ratio::CurrentRatio).and_then(parse_value) {
                messages.push(if current >= 2.0 {
                    "Current Ratio strong (≥ 2).".to_string()
                } else if current >= 1.0 {
                    "Current Ratio acceptable (≈1–2).".to_string()
                } else {
                    "Current Ratio weak (<1): liquidity risk.".to_string()
                });
            }
            if let Some(quick) = find(Ratio::QuickRatio).and_then(parse_value) {
                messages.push(if quick >= 1.0 {
                    "Quick Ratio healthy (≥1).".to_string()
                } else {
                    "Quick Ratio weak: inventory may be inflating current assets.".to_string()
                });
            }
            if let Some(cash) = find(Ratio::CashRatio).and_then(parse_value) {
                messages.push(if cash >= 0.5 {
                    "Cash Ratio decent (≥0.5).".to_string()
                } else {
                    "Low Cash Ratio: depends on receivables conversion.".to_string()
                });
            }
            " "
        }
        RatioFamily::Leverage => {
            if let Some(dte) = find(Ratio::DebtToEquity) {
                messages.push(dte.to_string());
            }
            if let Some(coverage) = find(Ratio::InterestCoverage).and_then(parse_value) {
                messages.push(if coverage < 2.0 {
                    "Interest coverage low (<2): watch solvency.".to_string()
                } else {
                    "Interest coverage adequate (≥2).".to_string()
                });
            }
            if let Some(dscr) = find(Ratio::DebtServiceCoverage).and_then(parse_value) {
                messages.push(if dscr < 1.5 {
                    "DSCR < 1.5: debt service risk.".to_string()
                } else {
                    "DSCR acceptable.".to_string()
                });
            }
            " "
        }
        RatioFamily::Profitability => {
            for (ratio, prefix) in [
                (Ratio::NetMargin, "Net margin"),
                (Ratio::ReturnOnAssets, "ROA"),
                (Ratio::ReturnOnEquity, "ROE"),
            ] {
                if let Some(text) = find(ratio) {
                    messages.push(format!("{}: {}", prefix, text));
                }
            }
            " • "
        }
        RatioFamily::Efficiency => {
            for ratio in [Ratio::DaysSalesOutstanding, Ratio::DaysInventoryOutstanding] {
                if let Some(text) = find(ratio) {
                    messages.push(format!("{}: {}", ratio.label(), text));
                }
            }
            " • "
        }
        RatioFamily::MarketValue => {
            for ratio in [Ratio::PriceToEarnings, Ratio::EarningsYield] {
                if let Some(text) = find(ratio) {
                    messages.push(text.to_string());
                }
            }
            " • "
        }
    };

    if messages.is_empty() {
        placeholder(family).to_string()
    } else {
        messages.join(separator)
    }
}

/// Insight line for every family, straight from a computed report.
pub fn summarize_report(report: &RatioReport) -> Vec<(RatioFamily, String)> {
    RatioFamily::ALL
        .iter()
        .map(|family| {
            let lines = report.family_lines(*family);
            (*family, summarize_insight(*family, &lines))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidity_thresholds() {
        let insight = summarize_insight(
            RatioFamily::Liquidity,
            &["Current Ratio = 2.00", "Quick Ratio = 0.80", "Cash Ratio = 0.50"],
        );
        assert!(insight.contains("strong"));
        assert!(insight.contains("Quick Ratio weak"));
        assert!(insight.contains("Cash Ratio decent"));

        let acceptable = summarize_insight(RatioFamily::Liquidity, &["Current Ratio = 1.25"]);
        assert!(acceptable.contains("acceptable"));
    }

    #[test]
    fn test_leverage_commentary() {
        let insight = summarize_insight(
            RatioFamily::Leverage,
            &["Debt-to-Equity = 1.50", "Interest Coverage = 1.20", "DSCR = 2.00"],
        );
        assert_eq!(
            insight,
            "1.50 Interest coverage low (<2): watch solvency. DSCR acceptable."
        );
    }

    #[test]
    fn test_echo_families_join_with_bullets() {
        let insight = summarize_insight(
            RatioFamily::Profitability,
            &["Net Profit Margin = 12.00%", "ROE = 18.50%", "Gross Margin = 40.00%"],
        );
        assert_eq!(insight, "Net margin: 12.00% • ROE: 18.50%");

        let efficiency = summarize_insight(
            RatioFamily::Efficiency,
            &["DIO = 30.00 days", "DSO = 45.00 days"],
        );
        assert_eq!(efficiency, "DSO: 45.00 days • DIO: 30.00 days");
    }

    #[test]
    fn test_placeholder_when_no_lines() {
        let empty: [&str; 0] = [];
        assert_eq!(
            summarize_insight(RatioFamily::MarketValue, &empty),
            "Valuation insights will appear here."
        );
        // Lines from another family do not count.
        assert_eq!(
            summarize_insight(RatioFamily::Liquidity, &["ROE = 10.00%"]),
            "Results will appear after calculation."
        );
    }

    #[test]
    fn test_undefined_value_is_skipped_for_thresholds() {
        let insight = summarize_insight(RatioFamily::Liquidity, &["Current Ratio = —"]);
        assert_eq!(insight, LIQUIDITY_PLACEHOLDER);
    }

    #[test]
    fn test_parse_value_handles_grouping() {
        assert_eq!(parse_value("1,234.50%"), Some(1234.5));
        assert_eq!(parse_value("-0.25"), Some(-0.25));
        assert_eq!(parse_value("—"), None);
    }
}
