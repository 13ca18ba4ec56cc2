use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Placeholder shown for a ratio whose denominator was zero.
pub const UNDEFINED_PLACEHOLDER: &str = "—";

/// Result of a single formula.
///
/// `Undefined` is the division-by-zero sentinel: the inputs were present but
/// the formula has no finite value. Serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatioValue {
    Value(f64),
    Undefined,
}

impl RatioValue {
    /// Divide, mapping a zero denominator or a non-finite quotient to `Undefined`.
    pub fn divide(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return RatioValue::Undefined;
        }
        Self::from_f64(numerator / denominator)
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            RatioValue::Value(value)
        } else {
            RatioValue::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            RatioValue::Value(v) => Some(*v),
            RatioValue::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RatioValue::Undefined)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            RatioValue::Value(v) => Self::from_f64(f(v)),
            RatioValue::Undefined => RatioValue::Undefined,
        }
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Value(v) => f.write_str(&format_number(*v)),
            RatioValue::Undefined => f.write_str(UNDEFINED_PLACEHOLDER),
        }
    }
}

/// Format with thousands separators and between two and four decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED_PLACEHOLDER.to_string();
    }

    let fixed = format!("{:.4}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" reads oddly; only sign values that survive rounding.
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac)
}

/// Ratio families, one per calculator page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatioFamily {
    Liquidity,
    Profitability,
    Leverage,
    Efficiency,
    MarketValue,
}

impl RatioFamily {
    pub const ALL: [RatioFamily; 5] = [
        RatioFamily::Liquidity,
        RatioFamily::Profitability,
        RatioFamily::Leverage,
        RatioFamily::Efficiency,
        RatioFamily::MarketValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RatioFamily::Liquidity => "liquidity",
            RatioFamily::Profitability => "profitability",
            RatioFamily::Leverage => "leverage",
            RatioFamily::Efficiency => "efficiency",
            RatioFamily::MarketValue => "market-value",
        }
    }
}

impl FromStr for RatioFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "liquidity" => Ok(RatioFamily::Liquidity),
            "profitability" => Ok(RatioFamily::Profitability),
            "leverage" | "solvency" => Ok(RatioFamily::Leverage),
            "efficiency" => Ok(RatioFamily::Efficiency),
            "market-value" | "market" | "valuation" => Ok(RatioFamily::MarketValue),
            other => Err(format!("unknown ratio family: {}", other)),
        }
    }
}

/// How a ratio value is rendered after the number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioUnit {
    Times,
    Percent,
    Days,
    Currency,
}

/// Every ratio the calculators produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ratio {
    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    OperatingCashFlowRatio,
    // Profitability
    GrossMargin,
    NetMargin,
    OperatingMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    DividendYield,
    // Leverage
    DebtToEquity,
    InterestCoverage,
    DebtServiceCoverage,
    DebtToAsset,
    EquityRatio,
    // Efficiency
    AssetTurnover,
    InventoryTurnover,
    DaysInventoryOutstanding,
    DaysSalesOutstanding,
    // Market value
    MarketCap,
    EarningsPerShare,
    PriceToEarnings,
    PriceToBook,
    PriceToSales,
    EarningsYield,
    MarginOfSafety,
}

impl Ratio {
    pub fn family(&self) -> RatioFamily {
        use Ratio::*;
        match self {
            CurrentRatio | QuickRatio | CashRatio | OperatingCashFlowRatio => RatioFamily::Liquidity,
            GrossMargin | NetMargin | OperatingMargin | ReturnOnAssets | ReturnOnEquity
            | DividendYield => RatioFamily::Profitability,
            DebtToEquity | InterestCoverage | DebtServiceCoverage | DebtToAsset | EquityRatio => {
                RatioFamily::Leverage
            }
            AssetTurnover | InventoryTurnover | DaysInventoryOutstanding | DaysSalesOutstanding => {
                RatioFamily::Efficiency
            }
            MarketCap | EarningsPerShare | PriceToEarnings | PriceToBook | PriceToSales
            | EarningsYield | MarginOfSafety => RatioFamily::MarketValue,
        }
    }

    /// Label used on the left of a formatted result line
    pub fn label(&self) -> &'static str {
        use Ratio::*;
        match self {
            CurrentRatio => "Current Ratio",
            QuickRatio => "Quick Ratio",
            CashRatio => "Cash Ratio",
            OperatingCashFlowRatio => "Operating Cash Flow Ratio",
            GrossMargin => "Gross Margin",
            NetMargin => "Net Profit Margin",
            OperatingMargin => "Operating Margin",
            ReturnOnAssets => "ROA",
            ReturnOnEquity => "ROE",
            DividendYield => "Dividend Yield",
            DebtToEquity => "Debt-to-Equity",
            InterestCoverage => "Interest Coverage",
            DebtServiceCoverage => "DSCR",
            DebtToAsset => "Debt-to-Asset",
            EquityRatio => "Equity Ratio",
            AssetTurnover => "Asset Turnover",
            InventoryTurnover => "Inventory Turnover",
            DaysInventoryOutstanding => "DIO",
            DaysSalesOutstanding => "DSO",
            MarketCap => "Market Cap",
            EarningsPerShare => "EPS",
            PriceToEarnings => "P/E",
            PriceToBook => "P/B",
            PriceToSales => "P/S",
            EarningsYield => "Earnings Yield",
            MarginOfSafety => "Margin of Safety",
        }
    }

    pub fn unit(&self) -> RatioUnit {
        use Ratio::*;
        match self {
            GrossMargin | NetMargin | OperatingMargin | ReturnOnAssets | ReturnOnEquity
            | DividendYield | EarningsYield | MarginOfSafety => RatioUnit::Percent,
            DaysInventoryOutstanding | DaysSalesOutstanding => RatioUnit::Days,
            MarketCap | EarningsPerShare => RatioUnit::Currency,
            _ => RatioUnit::Times,
        }
    }

    pub fn from_label(label: &str) -> Option<Ratio> {
        let label = label.trim();
        Self::all().into_iter().find(|r| r.label().eq_ignore_ascii_case(label))
    }

    pub fn all() -> Vec<Ratio> {
        use Ratio::*;
        vec![
            CurrentRatio,
            QuickRatio,
            CashRatio,
            OperatingCashFlowRatio,
            GrossMargin,
            NetMargin,
            OperatingMargin,
            ReturnOnAssets,
            ReturnOnEquity,
            DividendYield,
            DebtToEquity,
            InterestCoverage,
            DebtServiceCoverage,
            DebtToAsset,
            EquityRatio,
            AssetTurnover,
            InventoryTurnover,
            DaysInventoryOutstanding,
            DaysSalesOutstanding,
            MarketCap,
            EarningsPerShare,
            PriceToEarnings,
            PriceToBook,
            PriceToSales,
            EarningsYield,
            MarginOfSafety,
        ]
    }

    /// `"Current Ratio = 2.00"`, `"Gross Margin = 40.00%"`, `"DSO = 45.00 days"`
    pub fn format_line(&self, value: RatioValue) -> String {
        let suffix = match (self.unit(), value) {
            (_, RatioValue::Undefined) => "",
            (RatioUnit::Percent, _) => "%",
            (RatioUnit::Days, _) => " days",
            _ => "",
        };
        format!("{} = {}{}", self.label(), value, suffix)
    }
}

/// Ratio name to value for one financial record. Ratios whose inputs were
/// missing are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioReport {
    values: BTreeMap<Ratio, RatioValue>,
}

impl RatioReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ratio: Ratio, value: RatioValue) {
        self.values.insert(ratio, value);
    }

    /// Insert only when the formula had all of its inputs.
    pub fn insert_opt(&mut self, ratio: Ratio, value: Option<RatioValue>) {
        if let Some(v) = value {
            self.values.insert(ratio, v);
        }
    }

    pub fn get(&self, ratio: Ratio) -> Option<RatioValue> {
        self.values.get(&ratio).copied()
    }

    pub fn contains(&self, ratio: Ratio) -> bool {
        self.values.contains_key(&ratio)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ratio, RatioValue)> + '_ {
        self.values.iter().map(|(r, v)| (*r, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Formatted result lines for one family, in catalogue order.
    pub fn family_lines(&self, family: RatioFamily) -> Vec<String> {
        self.iter()
            .filter(|(ratio, _)| ratio.family() == family)
            .map(|(ratio, value)| ratio.format_line(value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_by_zero_is_undefined() {
        assert_eq!(RatioValue::divide(50.0, 0.0), RatioValue::Undefined);
        assert_eq!(RatioValue::divide(200.0, 100.0), RatioValue::Value(2.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2.00");
        assert_eq!(format_number(0.12345), "0.1235");
        assert_eq!(format_number(1234567.5), "1,234,567.50");
        assert_eq!(format_number(-3.1), "-3.10");
        assert_eq!(format_number(-0.00001), "0.00");
        assert_eq!(format_number(f64::NAN), UNDEFINED_PLACEHOLDER);
    }

    #[test]
    fn test_format_line_units() {
        assert_eq!(Ratio::CurrentRatio.format_line(RatioValue::Value(2.0)), "Current Ratio = 2.00");
        assert_eq!(Ratio::GrossMargin.format_line(RatioValue::Value(40.0)), "Gross Margin = 40.00%");
        assert_eq!(Ratio::DaysSalesOutstanding.format_line(RatioValue::Value(45.0)), "DSO = 45.00 days");
        assert_eq!(Ratio::CurrentRatio.format_line(RatioValue::Undefined), "Current Ratio = —");
    }

    #[test]
    fn test_label_round_trip() {
        for ratio in Ratio::all() {
            assert_eq!(Ratio::from_label(ratio.label()), Some(ratio));
        }
    }

    #[test]
    fn test_report_serializes_undefined_as_null() {
        let mut report = RatioReport::new();
        report.insert(Ratio::CurrentRatio, RatioValue::Undefined);
        report.insert(Ratio::QuickRatio, RatioValue::Value(1.5));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["currentRatio"].is_null());
        assert_eq!(json["quickRatio"], 1.5);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("market_value".parse::<RatioFamily>(), Ok(RatioFamily::MarketValue));
        assert_eq!("Liquidity".parse::<RatioFamily>(), Ok(RatioFamily::Liquidity));
        assert!("vibes".parse::<RatioFamily>().is_err());
    }
}
