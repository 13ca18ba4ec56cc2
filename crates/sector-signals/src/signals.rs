use analysis_core::{stats, Signal, SignalLabel, SignalType};
use tracing::debug;

use crate::momentum::SectorRecord;
use crate::rotation::SectorClassification;

/// Builds the four market signals from a sector set
#[derive(Debug, Clone, Default)]
pub struct SignalAggregator {
    classification: SectorClassification,
}

impl SignalAggregator {
    pub fn new(classification: SectorClassification) -> Self {
        Self { classification }
    }

    pub fn classification(&self) -> &SectorClassification {
        &self.classification
    }

    /// Breadth, rotation, momentum and concentration, always in that order.
    pub fn compute_signals(&self, sectors: &[SectorRecord]) -> Vec<Signal> {
        debug!("computing market signals over {} sectors", sectors.len());
        vec![
            self.market_breadth(sectors),
            self.sector_rotation(sectors),
            self.market_momentum(sectors),
            self.sector_concentration(sectors),
        ]
    }

    fn market_breadth(&self, sectors: &[SectorRecord]) -> Signal {
        let positive = sectors.iter().filter(|s| s.momentum() > 0.0).count();
        // No sectors reads as an even split
        let breadth = if sectors.is_empty() {
            0.5
        } else {
            positive as f64 / sectors.len() as f64
        };

        Signal {
            signal_type: SignalType::MarketBreadth,
            signal: breadth_label(breadth),
            strength: (breadth - 0.5).abs() * 2.0,
            description: format!(
                "{} out of {} sectors showing positive momentum",
                positive,
                sectors.len()
            ),
        }
    }

    fn sector_rotation(&self, sectors: &[SectorRecord]) -> Signal {
        let reading = self.classification.read_rotation(sectors);

        let summary = match reading.signal {
            SignalLabel::RiskOn => "Rotation into cyclical sectors indicating risk appetite",
            SignalLabel::RiskOff => "Rotation into defensive sectors indicating caution",
            _ => "No significant sector rotation detected",
        };

        Signal {
            signal_type: SignalType::SectorRotation,
            signal: reading.signal,
            strength: reading.strength,
            description: format!(
                "{} (defensive momentum {:.2}, cyclical momentum {:.2})",
                summary, reading.defensive_momentum, reading.cyclical_momentum
            ),
        }
    }

    fn market_momentum(&self, sectors: &[SectorRecord]) -> Signal {
        let momenta: Vec<f64> = sectors.iter().map(|s| s.momentum()).collect();
        let average = stats::mean(&momenta);

        let (signal, summary) = momentum_label(average);

        Signal {
            signal_type: SignalType::MarketMomentum,
            signal,
            strength: average.abs() / 5.0,
            description: format!("{} (average {:.2})", summary, average),
        }
    }

    fn sector_concentration(&self, sectors: &[SectorRecord]) -> Signal {
        let normalized = normalized_hhi(sectors);

        let (signal, summary) = if normalized > 0.7 {
            (SignalLabel::HighConcentration, "Market highly concentrated in few sectors")
        } else if normalized > 0.4 {
            (
                SignalLabel::ModerateConcentration,
                "Market showing moderate sector concentration",
            )
        } else {
            (SignalLabel::WellDistributed, "Market well distributed across sectors")
        };

        Signal {
            signal_type: SignalType::SectorConcentration,
            signal,
            strength: normalized,
            description: format!("{} (normalized HHI {:.2})", summary, normalized),
        }
    }
}

/// Breadth label; every cut-off is inclusive.
fn breadth_label(breadth: f64) -> SignalLabel {
    if breadth >= 0.7 {
        SignalLabel::StrongBuy
    } else if breadth >= 0.6 {
        SignalLabel::Buy
    } else if breadth <= 0.3 {
        SignalLabel::StrongSell
    } else if breadth <= 0.4 {
        SignalLabel::Sell
    } else {
        SignalLabel::Neutral
    }
}

fn momentum_label(average: f64) -> (SignalLabel, &'static str) {
    if average >= 2.0 {
        (SignalLabel::StrongUptrend, "Market showing strong positive momentum")
    } else if average >= 0.5 {
        (SignalLabel::Uptrend, "Market showing moderate positive momentum")
    } else if average <= -2.0 {
        (SignalLabel::StrongDowntrend, "Market showing strong negative momentum")
    } else if average <= -0.5 {
        (SignalLabel::Downtrend, "Market showing moderate negative momentum")
    } else {
        (SignalLabel::Neutral, "Market showing minimal momentum")
    }
}

/// Herfindahl-Hirschman index over market-cap shares, rescaled so an even
/// split is 0 and a single sector holding everything is 1.
///
/// Negative caps count as zero. No sectors or no cap at all is 0; one sector
/// is fully concentrated.
pub fn normalized_hhi(sectors: &[SectorRecord]) -> f64 {
    let caps: Vec<f64> = sectors.iter().map(|s| s.market_cap.max(0.0)).collect();
    let total: f64 = caps.iter().sum();
    let n = caps.len();

    if n == 0 || total <= 0.0 {
        return 0.0;
    }
    if n == 1 {
        return 1.0;
    }

    let hhi: f64 = caps.iter().map(|cap| (cap / total).powi(2)).sum();
    let floor = 1.0 / n as f64;
    ((hhi - floor) / (1.0 - floor)).max(0.0)
}

/// Signals with the default defensive/cyclical classification.
pub fn compute_signals(sectors: &[SectorRecord]) -> Vec<Signal> {
    SignalAggregator::default().compute_signals(sectors)
}
