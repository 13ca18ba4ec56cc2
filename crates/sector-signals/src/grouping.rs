//! Keyword sector grouping of a stock list

use analysis_core::{stats, SectorSnapshot, StockQuote};
use serde::{Deserialize, Serialize};

/// Sector holding every stock no keyword matched
pub const OTHERS_SECTOR: &str = "Others";

const MOVERS_PER_SIDE: usize = 3;

/// Sector name to name keywords, matched case-insensitively as substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorKeywords {
    sectors: Vec<(String, Vec<String>)>,
}

impl Default for SectorKeywords {
    fn default() -> Self {
        let table: [(&str, &[&str]); 4] = [
            ("Banking", &["bank"]),
            ("Energy", &["oil", "gas", "power"]),
            ("Technology", &["tech", "systems"]),
            ("Manufacturing", &["cement", "steel"]),
        ];
        Self {
            sectors: table
                .iter()
                .map(|(name, words)| {
                    (
                        name.to_string(),
                        words.iter().map(|w| w.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl SectorKeywords {
    pub fn new(sectors: Vec<(String, Vec<String>)>) -> Self {
        Self { sectors }
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.iter().map(|(name, _)| name.as_str())
    }

    fn matches(keywords: &[String], stock: &StockQuote) -> bool {
        let name = stock.name.to_lowercase();
        keywords.iter().any(|k| name.contains(k.as_str()))
    }

    /// Stocks in `sector`. A stock may belong to several keyword sectors;
    /// [`OTHERS_SECTOR`] gets the stocks that matched none. Unknown names are empty.
    pub fn members<'a>(&self, sector: &str, stocks: &'a [StockQuote]) -> Vec<&'a StockQuote> {
        if sector.eq_ignore_ascii_case(OTHERS_SECTOR) {
            return stocks
                .iter()
                .filter(|stock| {
                    !self
                        .sectors
                        .iter()
                        .any(|(_, keywords)| Self::matches(keywords, stock))
                })
                .collect();
        }

        match self
            .sectors
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(sector))
        {
            Some((_, keywords)) => stocks
                .iter()
                .filter(|stock| Self::matches(keywords, stock))
                .collect(),
            None => Vec::new(),
        }
    }
}

fn snapshot(name: &str, members: &[&StockQuote]) -> SectorSnapshot {
    let change_pcts: Vec<f64> = members.iter().map(|s| s.change_pct).collect();
    let price: f64 = members.iter().map(|s| s.price).sum();
    let previous_price: f64 = members.iter().map(|s| s.price - s.change).sum();

    SectorSnapshot {
        name: name.to_string(),
        market_cap: members.iter().map(|s| s.market_cap).sum(),
        change_pct: stats::mean(&change_pcts),
        volume: members.iter().map(|s| s.volume).sum(),
        previous_volume: None,
        price: Some(price),
        previous_price: Some(previous_price),
        stocks: members.iter().map(|s| (*s).clone()).collect(),
    }
}

/// One snapshot per non-empty keyword sector, then Others.
pub fn group_by_sector(keywords: &SectorKeywords, stocks: &[StockQuote]) -> Vec<SectorSnapshot> {
    keywords
        .sector_names()
        .chain(std::iter::once(OTHERS_SECTOR))
        .filter_map(|name| {
            let members = keywords.members(name, stocks);
            if members.is_empty() {
                None
            } else {
                Some(snapshot(name, &members))
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMovers {
    pub gainers: Vec<StockQuote>,
    pub losers: Vec<StockQuote>,
}

/// Three best and three worst stocks in `sector` by percent change.
pub fn top_movers(keywords: &SectorKeywords, sector: &str, stocks: &[StockQuote]) -> TopMovers {
    let mut members: Vec<StockQuote> = keywords
        .members(sector, stocks)
        .into_iter()
        .cloned()
        .collect();
    members.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));

    let gainers = members.iter().take(MOVERS_PER_SIDE).cloned().collect();
    let losers = members.iter().rev().take(MOVERS_PER_SIDE).cloned().collect();
    TopMovers { gainers, losers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str, name: &str, price: f64, change: f64, change_pct: f64) -> StockQuote {
        StockQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_pct,
            volume: 1_000.0,
            market_cap: price * 10.0,
        }
    }

    fn listing() -> Vec<StockQuote> {
        vec![
            stock("HBL", "Habib Bank Limited", 100.0, 2.0, 2.04),
            stock("UBL", "United Bank Limited", 200.0, -4.0, -1.96),
            stock("OGDC", "Oil & Gas Development Company Ltd", 150.0, 3.0, 2.04),
            stock("LUCK", "Lucky Cement Limited", 500.0, 10.0, 2.04),
            stock("NESTLE", "Nestle Pakistan", 7000.0, -70.0, -0.99),
        ]
    }

    #[test]
    fn test_grouping_omits_empty_sectors() {
        let snapshots = group_by_sector(&SectorKeywords::default(), &listing());
        let names: Vec<&str> = snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Banking", "Energy", "Manufacturing", "Others"]);
    }

    #[test]
    fn test_snapshot_aggregates() {
        let snapshots = group_by_sector(&SectorKeywords::default(), &listing());
        let banking = &snapshots[0];
        assert_eq!(banking.stocks.len(), 2);
        assert_eq!(banking.market_cap, 3_000.0);
        assert_eq!(banking.volume, 2_000.0);
        assert!((banking.change_pct - 0.04).abs() < 1e-9);
        assert_eq!(banking.price, Some(300.0));
        assert_eq!(banking.previous_price, Some(302.0));

        let others = &snapshots[3];
        assert_eq!(others.stocks[0].symbol, "NESTLE");
    }

    #[test]
    fn test_top_movers() {
        let mut stocks = listing();
        stocks.push(stock("MCB", "MCB Bank Limited", 50.0, 5.0, 11.1));
        stocks.push(stock("BAFL", "Bank Alfalah", 40.0, -4.0, -9.0));
        stocks.push(stock("MEBL", "Meezan Bank", 60.0, 0.0, 0.0));

        let movers = top_movers(&SectorKeywords::default(), "banking", &stocks);
        let gainers: Vec<&str> = movers.gainers.iter().map(|s| s.symbol.as_str()).collect();
        let losers: Vec<&str> = movers.losers.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(gainers, vec!["MCB", "HBL", "MEBL"]);
        assert_eq!(losers, vec!["BAFL", "UBL", "MEBL"]);
    }

    #[test]
    fn test_unknown_sector_has_no_movers() {
        let movers = top_movers(&SectorKeywords::default(), "Textiles", &listing());
        assert!(movers.gainers.is_empty());
        assert!(movers.losers.is_empty());
    }
}
