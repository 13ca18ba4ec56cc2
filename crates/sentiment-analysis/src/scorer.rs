use analysis_core::{SentimentCategory, SentimentResult};
use market_cache::TtlCache;
use std::sync::Arc;

use crate::lexicon::Lexicon;

/// Number of tokens before a lexicon hit that a negation word reaches
const NEGATION_WINDOW: usize = 3;

/// Characters of input text that make up the cache key
const CACHE_KEY_CHARS: usize = 50;

/// Split text into word tokens, keeping case and inner apostrophes.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '_'))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// `"sentiment-"` followed by the first 50 characters of the text
pub fn cache_key(text: &str) -> String {
    let prefix: String = text.chars().take(CACHE_KEY_CHARS).collect();
    format!("sentiment-{}", prefix)
}

pub fn confidence_for(token_count: usize) -> f64 {
    (0.5 + token_count as f64 / 100.0).min(0.95)
}

/// Lexicon scorer with an optional shared result cache.
pub struct SentimentScorer {
    lexicon: Lexicon,
    cache: Option<Arc<TtlCache<SentimentResult>>>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::financial(),
            cache: None,
        }
    }

    pub fn with_cache(cache: Arc<TtlCache<SentimentResult>>) -> Self {
        Self {
            lexicon: Lexicon::financial(),
            cache: Some(cache),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        let Some(cache) = &self.cache else {
            return self.score_uncached(text);
        };

        let key = cache_key(text);
        if let Some(hit) = cache.get(&key) {
            tracing::debug!("sentiment cache hit for {:?}", key);
            return hit;
        }

        let result = self.score_uncached(text);
        cache.set(&key, result.clone());
        result
    }

    fn score_uncached(&self, text: &str) -> SentimentResult {
        let words: Vec<String> = tokenize(text).iter().map(|t| t.to_lowercase()).collect();
        if words.is_empty() {
            return SentimentResult::neutral();
        }

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| self.lexicon.is_negation(w))
            .map(|(i, _)| i)
            .collect();

        let mut total: i32 = 0;
        for (i, word) in words.iter().enumerate() {
            let Some(polarity) = self.lexicon.polarity(word) else {
                continue;
            };

            let negated = negation_positions
                .iter()
                .any(|&neg_pos| neg_pos < i && (i - neg_pos) <= NEGATION_WINDOW);

            total += if negated { -polarity } else { polarity };
        }

        let score = total as f64 / words.len() as f64;
        SentimentResult {
            score,
            category: SentimentCategory::from_score(score),
            confidence: confidence_for(words.len()),
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score `text` with the built-in lexicon and no cache.
pub fn score_sentiment(text: &str) -> SentimentResult {
    SentimentScorer::new().score(text)
}
