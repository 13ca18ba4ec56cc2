//! Sector Signals
//!
//! Groups listed stocks into keyword sectors, derives per-sector momentum,
//! and synthesizes four market-level signals from the sector set:
//! breadth, rotation, momentum and concentration.

pub mod grouping;
pub mod momentum;
pub mod rotation;
pub mod signals;

pub use grouping::{group_by_sector, top_movers, SectorKeywords, TopMovers, OTHERS_SECTOR};
pub use momentum::SectorRecord;
pub use rotation::{RotationReading, SectorClassification};
pub use signals::{compute_signals, SignalAggregator};

#[cfg(test)]
pub(crate) mod tests_support {
    use analysis_core::SectorSnapshot;

    use crate::momentum::SectorRecord;

    /// A record whose derived momentum comes out at `momentum` (price change only).
    pub fn sector(name: &str, momentum: f64, market_cap: f64) -> SectorRecord {
        let previous_price = 100.0;
        SectorRecord::from_snapshot(&SectorSnapshot {
            name: name.to_string(),
            market_cap,
            price: Some(previous_price * (1.0 + momentum / 0.7)),
            previous_price: Some(previous_price),
            ..Default::default()
        })
    }
}
