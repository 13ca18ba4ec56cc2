//! Rotation Detection
//!
//! Compares mean momentum of defensive sectors against cyclical sectors.

use analysis_core::{stats, SignalLabel};
use serde::{Deserialize, Serialize};

use crate::momentum::SectorRecord;

/// Mean momentum gap a group must lead by before rotation is called
const ROTATION_THRESHOLD: f64 = 2.0;

/// Divisor mapping the momentum gap onto a strength; the result is not clamped
const STRENGTH_SCALE: f64 = 5.0;

/// Sector names that count as defensive or cyclical for rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorClassification {
    pub defensive_sectors: Vec<String>,
    pub cyclical_sectors: Vec<String>,
}

impl Default for SectorClassification {
    fn default() -> Self {
        Self {
            defensive_sectors: vec![
                "Commercial Banks".to_string(),
                "Power Generation".to_string(),
                "Oil & Gas".to_string(),
                "Banking".to_string(),
                "Energy".to_string(),
            ],
            cyclical_sectors: vec![
                "Technology".to_string(),
                "Automobile".to_string(),
                "Cement".to_string(),
                "Manufacturing".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationReading {
    pub defensive_momentum: f64,
    pub cyclical_momentum: f64,
    pub signal: SignalLabel,
    pub strength: f64,
}

impl SectorClassification {
    pub fn new(defensive_sectors: Vec<String>, cyclical_sectors: Vec<String>) -> Self {
        Self {
            defensive_sectors,
            cyclical_sectors,
        }
    }

    pub fn read_rotation(&self, sectors: &[SectorRecord]) -> RotationReading {
        let defensive = average_momentum(sectors, &self.defensive_sectors);
        let cyclical = average_momentum(sectors, &self.cyclical_sectors);

        let signal = if cyclical > defensive + ROTATION_THRESHOLD {
            SignalLabel::RiskOn
        } else if defensive > cyclical + ROTATION_THRESHOLD {
            SignalLabel::RiskOff
        } else {
            SignalLabel::Neutral
        };

        RotationReading {
            defensive_momentum: defensive,
            cyclical_momentum: cyclical,
            signal,
            strength: (defensive - cyclical).abs() / STRENGTH_SCALE,
        }
    }
}

/// Mean momentum over the sectors named in `names`, 0.0 when none are present
fn average_momentum(sectors: &[SectorRecord], names: &[String]) -> f64 {
    let relevant: Vec<f64> = sectors
        .iter()
        .filter(|s| names.contains(&s.name))
        .map(|s| s.momentum())
        .collect();

    stats::mean(&relevant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::sector;

    #[test]
    fn test_risk_off_when_defensive_leads() {
        let sectors = vec![
            sector("Commercial Banks", 3.0, 100.0),
            sector("Technology", 0.5, 100.0),
        ];
        let reading = SectorClassification::default().read_rotation(&sectors);
        assert_eq!(reading.signal, SignalLabel::RiskOff);
        assert!((reading.strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_risk_on_and_unclamped_strength() {
        let sectors = vec![sector("Oil & Gas", -4.0, 1.0), sector("Cement", 4.0, 1.0)];
        let reading = SectorClassification::default().read_rotation(&sectors);
        assert_eq!(reading.signal, SignalLabel::RiskOn);
        assert!((reading.strength - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_missing_groups_read_neutral() {
        let sectors = vec![sector("Others", 5.0, 1.0)];
        let reading = SectorClassification::default().read_rotation(&sectors);
        assert_eq!(reading.signal, SignalLabel::Neutral);
        assert_eq!(reading.strength, 0.0);
    }

    #[test]
    fn test_custom_classification() {
        let classification =
            SectorClassification::new(vec!["Utilities".to_string()], vec!["Tech".to_string()]);
        let sectors = vec![sector("Utilities", 0.0, 1.0), sector("Tech", 2.5, 1.0)];
        assert_eq!(classification.read_rotation(&sectors).signal, SignalLabel::RiskOn);
    }
}
