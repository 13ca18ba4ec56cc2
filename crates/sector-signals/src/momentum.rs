//! Per-sector momentum

use analysis_core::{stats, SectorSnapshot};
use serde::Serialize;

const VOLUME_WEIGHT: f64 = 0.3;
const PRICE_WEIGHT: f64 = 0.7;

/// A sector with its derived momentum.
///
/// Momentum can only come from [`SectorRecord::from_snapshot`]; the field is
/// private so no caller can hand one in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRecord {
    pub name: String,
    pub market_cap: f64,
    pub change_pct: f64,
    pub volume: f64,
    momentum: f64,
}

/// `(current - previous) / previous`, zero when either side is missing
fn relative_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(current), Some(previous)) => stats::change_ratio(current, previous),
        _ => 0.0,
    }
}

impl SectorRecord {
    pub fn from_snapshot(snapshot: &SectorSnapshot) -> Self {
        let volume_change = relative_change(Some(snapshot.volume), snapshot.previous_volume);
        let price_change = relative_change(snapshot.price, snapshot.previous_price);
        let momentum = VOLUME_WEIGHT * volume_change + PRICE_WEIGHT * price_change;

        Self {
            name: snapshot.name.clone(),
            market_cap: snapshot.market_cap,
            change_pct: snapshot.change_pct,
            volume: snapshot.volume,
            momentum: if momentum.is_finite() { momentum } else { 0.0 },
        }
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }
}

impl From<&SectorSnapshot> for SectorRecord {
    fn from(snapshot: &SectorSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
