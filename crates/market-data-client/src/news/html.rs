use analysis_core::{AnalysisError, NewsArticle, NewsSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::fetch_text;

/// How a scraped timestamp attribute is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    Rfc3339,
    UnixSeconds,
}

/// Where a timestamp lives inside an article card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampSelector {
    pub selector: &'static str,
    pub attribute: &'static str,
    pub format: TimestampFormat,
}

/// CSS selectors describing one site's article cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleSelectors {
    pub item: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    /// Prepended to relative links
    pub link_prefix: Option<&'static str>,
    /// Articles without one are stamped with the fetch time
    pub timestamp: Option<TimestampSelector>,
}

/// A news site scraped with CSS selectors
#[derive(Clone)]
pub struct HtmlNewsSource {
    name: String,
    url: String,
    selectors: ArticleSelectors,
    client: Client,
}

impl HtmlNewsSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        selectors: ArticleSelectors,
        client: Client,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            selectors,
            client,
        }
    }

    pub fn marketwatch(client: Client) -> Self {
        Self::new(
            "MarketWatch",
            "https://www.marketwatch.com/latest-news",
            ArticleSelectors {
                item: ".article__content",
                title: ".article__headline",
                description: ".article__summary",
                link: "a[href]",
                link_prefix: None,
                timestamp: None,
            },
            client,
        )
    }

    pub fn yahoo_finance(client: Client) -> Self {
        Self::new(
            "Yahoo Finance",
            "https://finance.yahoo.com/news",
            ArticleSelectors {
                item: "li.js-stream-content",
                title: "h3",
                description: "p",
                link: "a[href]",
                link_prefix: Some("https://finance.yahoo.com"),
                timestamp: None,
            },
            client,
        )
    }

    pub fn reuters(client: Client) -> Self {
        Self::new(
            "Reuters",
            "https://www.reuters.com/markets",
            ArticleSelectors {
                item: ".story-card",
                title: "h3.story-card__heading__2mwx3",
                description: "p.story-card__description__27vd8",
                link: "a[href]",
                link_prefix: Some("https://www.reuters.com"),
                timestamp: Some(TimestampSelector {
                    selector: "time[datetime]",
                    attribute: "datetime",
                    format: TimestampFormat::Rfc3339,
                }),
            },
            client,
        )
    }

    pub fn investing_com(client: Client) -> Self {
        Self::new(
            "Investing.com",
            "https://www.investing.com/news/stock-market-news",
            ArticleSelectors {
                item: ".articleItem",
                title: ".title",
                description: ".articleDetails",
                link: "a[href]",
                link_prefix: Some("https://www.investing.com"),
                timestamp: Some(TimestampSelector {
                    selector: ".date[data-timestamp]",
                    attribute: "data-timestamp",
                    format: TimestampFormat::UnixSeconds,
                }),
            },
            client,
        )
    }

    pub fn seeking_alpha(client: Client) -> Self {
        Self::new(
            "Seeking Alpha",
            "https://seekingalpha.com/market-news",
            ArticleSelectors {
                item: ".mc-article-card",
                title: ".mc-article-title",
                description: ".mc-article-description",
                link: "a[href]",
                link_prefix: Some("https://seekingalpha.com"),
                timestamp: Some(TimestampSelector {
                    selector: "time[datetime]",
                    attribute: "datetime",
                    format: TimestampFormat::Rfc3339,
                }),
            },
            client,
        )
    }

    /// Built-in site by display name, case-insensitive
    pub fn by_name(name: &str, client: Client) -> Option<Self> {
        let source = match name.trim().to_lowercase().as_str() {
            "marketwatch" => Self::marketwatch(client),
            "yahoo finance" | "yahoo" => Self::yahoo_finance(client),
            "reuters" => Self::reuters(client),
            "investing.com" | "investing" => Self::investing_com(client),
            "seeking alpha" | "seekingalpha" => Self::seeking_alpha(client),
            _ => return None,
        };
        Some(source)
    }

    /// Point the source at another page, keeping its selectors.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Article cards with both a title and a description.
    pub fn parse_articles(
        &self,
        html: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<NewsArticle>, AnalysisError> {
        let s = &self.selectors;
        let item_sel = parse_selector(s.item)?;
        let title_sel = parse_selector(s.title)?;
        let description_sel = parse_selector(s.description)?;
        let link_sel = parse_selector(s.link)?;
        let timestamp = match &s.timestamp {
            Some(ts) => Some((parse_selector(ts.selector)?, ts)),
            None => None,
        };

        let document = Html::parse_document(html);
        let articles = document
            .select(&item_sel)
            .filter_map(|card| {
                let title = first_text(card, &title_sel)?;
                let description = first_text(card, &description_sel)?;

                let url = card
                    .select(&link_sel)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| absolute_url(href, s.link_prefix))
                    .unwrap_or_default();

                let published_at = timestamp
                    .as_ref()
                    .and_then(|(sel, ts)| {
                        let raw = card.select(sel).next()?.value().attr(ts.attribute)?;
                        parse_timestamp(raw, ts.format)
                    })
                    .unwrap_or(fetched_at);

                Some(NewsArticle {
                    title,
                    description,
                    url,
                    published_at,
                    source: self.name.clone(),
                })
            })
            .collect();

        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for HtmlNewsSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_articles(&self) -> Result<Vec<NewsArticle>, AnalysisError> {
        let html = fetch_text(&self.client, &self.url).await?;
        self.parse_articles(&html, Utc::now())
    }
}

fn parse_selector(css: &str) -> Result<Selector, AnalysisError> {
    Selector::parse(css)
        .map_err(|e| AnalysisError::ParseError(format!("invalid selector {:?}: {:?}", css, e)))
}

/// Whitespace-normalised text of the first match, `None` when absent or blank
fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = card.select(selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn absolute_url(href: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !href.starts_with("http://") && !href.starts_with("https://") => {
            format!("{}{}", prefix, href)
        }
        _ => href.to_string(),
    }
}

fn parse_timestamp(raw: &str, format: TimestampFormat) -> Option<DateTime<Utc>> {
    match format {
        TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        TimestampFormat::UnixSeconds => raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    }
}
