use analysis_core::{AnalysisError, NewsArticle, NewsSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;

use crate::fetch_text;

/// A generic RSS 2.0 feed
#[derive(Clone)]
pub struct RssNewsSource {
    name: String,
    url: String,
    client: Client,
}

impl RssNewsSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }

    /// Feed items that carry a title. Descriptions are reduced to plain text.
    pub fn parse_feed(
        &self,
        xml: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<NewsArticle>, AnalysisError> {
        let channel = rss::Channel::read_from(xml.as_bytes())
            .map_err(|e| AnalysisError::ParseError(format!("{}: {}", self.name, e)))?;

        Ok(channel
            .items()
            .iter()
            .filter_map(|item| {
                let title = item.title().map(str::trim).filter(|t| !t.is_empty())?;
                let description = item.description().map(plain_text).unwrap_or_default();
                let published_at = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or(fetched_at);

                Some(NewsArticle {
                    title: title.to_string(),
                    description,
                    url: item.link().unwrap_or_default().to_string(),
                    published_at,
                    source: self.name.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for RssNewsSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_articles(&self) -> Result<Vec<NewsArticle>, AnalysisError> {
        let xml = fetch_text(&self.client, &self.url).await?;
        self.parse_feed(&xml, Utc::now())
    }
}

/// Text content of an HTML fragment with whitespace collapsed
fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0"?>
        <rss version="2.0"><channel>
          <title>Business</title><link>https://example.com</link><description>feed</description>
          <item>
            <title>Cement dispatches jump</title>
            <link>https://example.com/cement</link>
            <description>&lt;p&gt;Local sales &lt;b&gt;up 12%&lt;/b&gt;&lt;/p&gt;</description>
            <pubDate>Wed, 01 May 2024 10:00:00 +0500</pubDate>
          </item>
          <item>
            <description>untitled item</description>
          </item>
        </channel></rss>"#;

    #[test]
    fn test_parse_feed() {
        let source = RssNewsSource::new("Business Recorder", "https://example.com/rss", Client::new());
        let fetched_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let articles = source.parse_feed(FEED, fetched_at).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Cement dispatches jump");
        assert_eq!(articles[0].description, "Local sales up 12%");
        assert_eq!(articles[0].url, "https://example.com/cement");
        assert_eq!(
            articles[0].published_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_feed_is_parse_error() {
        let source = RssNewsSource::new("Broken", "https://example.com/rss", Client::new());
        assert!(matches!(
            source.parse_feed("<html>not a feed</html>", Utc::now()),
            Err(AnalysisError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_feed_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let source = RssNewsSource::new("Business Recorder", server.uri(), Client::new());
        let articles = source.fetch_articles().await.unwrap();
        assert_eq!(articles[0].source, "Business Recorder");
    }
}
