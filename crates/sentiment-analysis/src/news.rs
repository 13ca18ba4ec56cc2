use analysis_core::{stats, NewsArticle, SentimentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::extract_entities;
use crate::scorer::SentimentScorer;

/// Sentiment and company mentions for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInsight {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: SentimentResult,
    pub entities: Vec<String>,
    pub url: String,
}

/// Overall tone of a batch of articles, bucketed like sentiment categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketMood {
    #[serde(rename = "Very Bearish")]
    VeryBearish,
    Bearish,
    Neutral,
    Bullish,
    #[serde(rename = "Very Bullish")]
    VeryBullish,
}

impl MarketMood {
    pub fn from_score(score: f64) -> Self {
        if score <= -0.5 {
            MarketMood::VeryBearish
        } else if score < 0.0 {
            MarketMood::Bearish
        } else if score == 0.0 {
            MarketMood::Neutral
        } else if score <= 0.5 {
            MarketMood::Bullish
        } else {
            MarketMood::VeryBullish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketMood::VeryBearish => "Very Bearish",
            MarketMood::Bearish => "Bearish",
            MarketMood::Neutral => "Neutral",
            MarketMood::Bullish => "Bullish",
            MarketMood::VeryBullish => "Very Bullish",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub mood: MarketMood,
    pub average_score: f64,
    pub article_count: usize,
}

/// Score each article on `title + " " + description`.
pub fn analyze_news_impact(scorer: &SentimentScorer, articles: &[NewsArticle]) -> Vec<ArticleInsight> {
    articles
        .iter()
        .map(|article| {
            let text = format!("{} {}", article.title, article.description);
            ArticleInsight {
                title: article.title.clone(),
                published_at: article.published_at,
                sentiment: scorer.score(&text),
                entities: extract_entities(&text),
                url: article.url.clone(),
            }
        })
        .collect()
}

/// Mood from the mean article score. No articles reads as neutral.
pub fn market_mood(insights: &[ArticleInsight]) -> MoodSummary {
    let scores: Vec<f64> = insights.iter().map(|i| i.sentiment.score).collect();
    let average_score = stats::mean(&scores);
    MoodSummary {
        mood: MarketMood::from_score(average_score),
        average_score,
        article_count: insights.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, description: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: description.to_string(),
            url: "https://example.com/a".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            source: "Reuters".to_string(),
        }
    }

    #[test]
    fn test_news_impact_scores_title_and_description() {
        let scorer = SentimentScorer::new();
        let insights = analyze_news_impact(
            &scorer,
            &[article("Engro Corp profit surge", "record quarter for fertilizer sales")],
        );
        assert_eq!(insights.len(), 1);
        assert!(insights[0].sentiment.score > 0.0);
        assert_eq!(insights[0].entities, vec!["Engro Corp"]);
        assert_eq!(insights[0].url, "https://example.com/a");
    }

    #[test]
    fn test_market_mood() {
        let scorer = SentimentScorer::new();
        let insights = analyze_news_impact(
            &scorer,
            &[
                article("Stocks crash", "losses deepen"),
                article("Banks slump", "fears of default"),
            ],
        );
        let summary = market_mood(&insights);
        assert_eq!(summary.article_count, 2);
        assert_eq!(summary.mood, MarketMood::VeryBearish);

        assert_eq!(market_mood(&[]).mood, MarketMood::Neutral);
    }

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(MarketMood::from_score(-0.2), MarketMood::Bearish);
        assert_eq!(MarketMood::from_score(0.3), MarketMood::Bullish);
        assert_eq!(MarketMood::from_score(0.9).label(), "Very Bullish");
    }
}
