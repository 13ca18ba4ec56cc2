use analysis_core::{AnalysisError, StockListSource, StockQuote};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::fetch_text;

pub const DEFAULT_STOCK_LIST_URL: &str = "https://stockanalysis.com/list/pakistan-stock-exchange/";

/// Cells per listing row: symbol, name, price, change, change %, volume, market cap
const LISTING_COLUMNS: usize = 7;

/// Parse a display number such as `"1,234.5"`, `"-2.31%"`, `"+0.4"` or `"12.5B"`.
///
/// Returns `None` for blanks and placeholders like `"-"` or `"n/a"`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '+' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (digits, multiplier) = match cleaned.chars().last() {
        Some('K') | Some('k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') | Some('m') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') | Some('b') => (&cleaned[..cleaned.len() - 1], 1e9),
        Some('T') | Some('t') => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
}

fn selector(css: &str) -> Result<Selector, AnalysisError> {
    Selector::parse(css)
        .map_err(|e| AnalysisError::ParseError(format!("invalid selector {:?}: {:?}", css, e)))
}

/// Rows of the first listing table. Header rows (no `td` cells) and short rows
/// are skipped; unparseable numbers read as zero.
pub fn parse_stock_table(html: &str) -> Result<Vec<StockQuote>, AnalysisError> {
    let document = Html::parse_document(html);
    let row_selector = selector("table tr")?;
    let cell_selector = selector("td")?;

    let stocks: Vec<StockQuote> = document
        .select(&row_selector)
        .filter_map(|row| {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if cells.len() < LISTING_COLUMNS || cells[0].is_empty() {
                return None;
            }

            let number = |i: usize| parse_number(&cells[i]).unwrap_or(0.0);
            Some(StockQuote {
                symbol: cells[0].clone(),
                name: cells[1].clone(),
                price: number(2),
                change: number(3),
                change_pct: number(4),
                volume: number(5),
                market_cap: number(6),
            })
        })
        .collect();

    if stocks.is_empty() {
        return Err(AnalysisError::ParseError(
            "no stock rows found in listing table".to_string(),
        ));
    }
    Ok(stocks)
}

/// Listing-page scraper for an exchange stock list
#[derive(Clone)]
pub struct StockListClient {
    client: Client,
    url: String,
}

impl StockListClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StockListSource for StockListClient {
    fn cache_key(&self) -> &str {
        &self.url
    }

    async fn fetch_stock_list(&self) -> Result<Vec<StockQuote>, AnalysisError> {
        tracing::info!("Fetching stock list from {}", self.url);
        let html = fetch_text(&self.client, &self.url).await?;
        let stocks = parse_stock_table(&html)?;
        tracing::info!("Parsed {} stocks from listing", stocks.len());
        Ok(stocks)
    }
}

/// Ten large PSX constituents with zeroed figures, used when the listing
/// cannot be fetched.
pub fn fallback_stock_list() -> Vec<StockQuote> {
    [
        ("OGDC", "Oil & Gas Development Company Ltd"),
        ("PPL", "Pakistan Petroleum Limited"),
        ("UBL", "United Bank Limited"),
        ("ENGRO", "Engro Corporation Limited"),
        ("LUCK", "Lucky Cement Limited"),
        ("HBL", "Habib Bank Limited"),
        ("POL", "Pakistan Oilfields Limited"),
        ("MCB", "MCB Bank Limited"),
        ("PSO", "Pakistan State Oil Company Limited"),
        ("HUBC", "The Hub Power Company Limited"),
    ]
    .iter()
    .map(|(symbol, name)| StockQuote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: 0.0,
        change: 0.0,
        change_pct: 0.0,
        volume: 0.0,
        market_cap: 0.0,
    })
    .collect()
}
