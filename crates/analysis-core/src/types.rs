use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company financials as entered for a ratio calculation.
///
/// Every field is optional: a ratio whose inputs are missing is left out of
/// the report instead of being computed from a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialRecord {
    // Income statement
    pub revenue: Option<f64>,
    pub cost_of_goods_sold: Option<f64>,
    pub operating_income: Option<f64>,
    pub ebit: Option<f64>,
    pub net_income: Option<f64>,
    pub interest_expense: Option<f64>,

    // Balance sheet
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_debt: Option<f64>,
    #[serde(alias = "shareholdersEquity")]
    pub total_equity: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub inventory: Option<f64>,
    pub average_inventory: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub accounts_receivable: Option<f64>,

    // Cash flow / debt service
    pub operating_cash_flow: Option<f64>,
    pub net_operating_income: Option<f64>,
    pub total_debt_service: Option<f64>,

    // Market data
    pub shares_outstanding: Option<f64>,
    pub market_price: Option<f64>,
    pub eps: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub annual_dividend_per_share: Option<f64>,
    pub fair_value: Option<f64>,
}

/// One row of an exchange listing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Absolute price change since the previous close
    pub change: f64,
    pub change_pct: f64,
    pub volume: f64,
    pub market_cap: f64,
}

/// Raw per-sector figures as produced by a data source, before momentum is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSnapshot {
    pub name: String,
    pub market_cap: f64,
    pub change_pct: f64,
    pub volume: f64,
    #[serde(default)]
    pub previous_volume: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub previous_price: Option<f64>,
    #[serde(default)]
    pub stocks: Vec<StockQuote>,
}

/// News article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}

/// Five-level sentiment bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[serde(rename = "Very Negative")]
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    #[serde(rename = "Very Positive")]
    VeryPositive,
}

impl SentimentCategory {
    pub fn from_score(score: f64) -> Self {
        if score <= -0.5 {
            SentimentCategory::VeryNegative
        } else if score < 0.0 {
            SentimentCategory::Negative
        } else if score == 0.0 {
            SentimentCategory::Neutral
        } else if score <= 0.5 {
            SentimentCategory::Positive
        } else {
            SentimentCategory::VeryPositive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentCategory::VeryNegative => "Very Negative",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Positive => "Positive",
            SentimentCategory::VeryPositive => "Very Positive",
        }
    }
}

/// Output of the lexicon scorer for one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    #[serde(rename = "sentiment")]
    pub category: SentimentCategory,
    pub confidence: f64, // 0.5 to 0.95
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            category: SentimentCategory::Neutral,
            confidence: 0.5,
        }
    }
}

/// Which market-level signal a [`Signal`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    #[serde(rename = "Market Breadth")]
    MarketBreadth,
    #[serde(rename = "Sector Rotation")]
    SectorRotation,
    #[serde(rename = "Market Momentum")]
    MarketMomentum,
    #[serde(rename = "Sector Concentration")]
    SectorConcentration,
}

impl SignalType {
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::MarketBreadth => "Market Breadth",
            SignalType::SectorRotation => "Sector Rotation",
            SignalType::MarketMomentum => "Market Momentum",
            SignalType::SectorConcentration => "Sector Concentration",
        }
    }
}

/// Categorical reading of a market signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
    #[serde(rename = "Risk-On")]
    RiskOn,
    #[serde(rename = "Risk-Off")]
    RiskOff,
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    Uptrend,
    Downtrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
    #[serde(rename = "High Concentration")]
    HighConcentration,
    #[serde(rename = "Moderate Concentration")]
    ModerateConcentration,
    #[serde(rename = "Well Distributed")]
    WellDistributed,
}

/// Whether a signal reads bullish, bearish or neither
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalTone {
    Positive,
    Negative,
    Neutral,
}

impl SignalLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "Strong Buy",
            SignalLabel::Buy => "Buy",
            SignalLabel::Neutral => "Neutral",
            SignalLabel::Sell => "Sell",
            SignalLabel::StrongSell => "Strong Sell",
            SignalLabel::RiskOn => "Risk-On",
            SignalLabel::RiskOff => "Risk-Off",
            SignalLabel::StrongUptrend => "Strong Uptrend",
            SignalLabel::Uptrend => "Uptrend",
            SignalLabel::Downtrend => "Downtrend",
            SignalLabel::StrongDowntrend => "Strong Downtrend",
            SignalLabel::HighConcentration => "High Concentration",
            SignalLabel::ModerateConcentration => "Moderate Concentration",
            SignalLabel::WellDistributed => "Well Distributed",
        }
    }

    /// Buy labels and strong uptrends read positive, sell labels and strong
    /// downtrends negative. Everything else is neutral.
    pub fn tone(&self) -> SignalTone {
        match self {
            SignalLabel::StrongBuy | SignalLabel::Buy | SignalLabel::StrongUptrend => {
                SignalTone::Positive
            }
            SignalLabel::StrongSell | SignalLabel::Sell | SignalLabel::StrongDowntrend => {
                SignalTone::Negative
            }
            _ => SignalTone::Neutral,
        }
    }
}

/// Coarse bucket of a signal's strength for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthBand {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl StrengthBand {
    pub fn from_strength(strength: f64) -> Self {
        if strength >= 0.7 {
            StrengthBand::VeryStrong
        } else if strength >= 0.4 {
            StrengthBand::Strong
        } else if strength >= 0.2 {
            StrengthBand::Moderate
        } else {
            StrengthBand::Weak
        }
    }
}

/// A derived market-level signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub signal: SignalLabel,
    pub strength: f64,
    pub description: String,
}

impl Signal {
    pub fn strength_band(&self) -> StrengthBand {
        StrengthBand::from_strength(self.strength)
    }

    /// Number of filled bars out of `bars` for a strength meter
    pub fn filled_bars(&self, bars: u32) -> u32 {
        let filled = (self.strength * bars as f64).round();
        filled.clamp(0.0, bars as f64) as u32
    }
}
