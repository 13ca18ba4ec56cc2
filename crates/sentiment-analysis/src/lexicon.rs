use std::collections::{HashMap, HashSet};

/// Word polarities on the AFINN scale (-5 to 5), extended with market vocabulary.
const FINANCIAL_LEXICON: &[(&str, i32)] = &[
    // Strongly positive
    ("boom", 3),
    ("booming", 3),
    ("breakthrough", 3),
    ("excellent", 3),
    ("outstanding", 3),
    ("outperform", 3),
    ("outperformed", 3),
    ("record", 2),
    ("skyrocket", 3),
    ("skyrocketed", 3),
    ("soar", 3),
    ("soared", 3),
    ("soaring", 3),
    ("surge", 3),
    ("surged", 3),
    ("surging", 3),
    ("thrive", 3),
    ("thriving", 3),
    ("win", 3),
    ("winner", 3),
    // Positive
    ("accretive", 2),
    ("advance", 2),
    ("advanced", 2),
    ("beat", 2),
    ("beats", 2),
    ("benefit", 2),
    ("boost", 2),
    ("boosted", 2),
    ("bullish", 2),
    ("buy", 1),
    ("buyback", 2),
    ("confidence", 2),
    ("confident", 2),
    ("dividend", 1),
    ("exceed", 2),
    ("exceeded", 2),
    ("exceeds", 2),
    ("expand", 1),
    ("expansion", 2),
    ("favorable", 2),
    ("gain", 2),
    ("gained", 2),
    ("gains", 2),
    ("good", 3),
    ("great", 3),
    ("grew", 2),
    ("grow", 2),
    ("growing", 2),
    ("growth", 2),
    ("healthy", 2),
    ("improve", 2),
    ("improved", 2),
    ("improvement", 2),
    ("improving", 2),
    ("innovation", 1),
    ("momentum", 1),
    ("optimism", 2),
    ("optimistic", 2),
    ("outpacing", 2),
    ("overweight", 1),
    ("positive", 2),
    ("profit", 2),
    ("profitable", 2),
    ("profits", 2),
    ("rally", 2),
    ("rallied", 2),
    ("rallies", 2),
    ("rebound", 2),
    ("rebounded", 2),
    ("recover", 2),
    ("recovered", 2),
    ("recovery", 2),
    ("resilient", 2),
    ("rise", 1),
    ("rises", 1),
    ("rising", 1),
    ("robust", 2),
    ("rose", 1),
    ("stable", 1),
    ("strength", 2),
    ("strengthen", 2),
    ("strong", 2),
    ("stronger", 2),
    ("success", 2),
    ("successful", 3),
    ("support", 2),
    ("tailwind", 2),
    ("up", 1),
    ("upbeat", 2),
    ("upgrade", 2),
    ("upgraded", 2),
    ("upside", 2),
    ("upturn", 2),
    // Strongly negative
    ("bankrupt", -3),
    ("bankruptcy", -3),
    ("collapse", -3),
    ("collapsed", -3),
    ("crash", -3),
    ("crashed", -3),
    ("crisis", -3),
    ("disaster", -3),
    ("fraud", -4),
    ("panic", -3),
    ("plummet", -3),
    ("plummeted", -3),
    ("plunge", -3),
    ("plunged", -3),
    ("scandal", -3),
    ("tumble", -3),
    ("tumbled", -3),
    ("turmoil", -3),
    ("worst", -3),
    // Negative
    ("bad", -3),
    ("bearish", -2),
    ("bubble", -2),
    ("concern", -2),
    ("concerns", -2),
    ("cut", -1),
    ("cuts", -1),
    ("decline", -2),
    ("declined", -2),
    ("declines", -2),
    ("declining", -2),
    ("decrease", -2),
    ("decreased", -2),
    ("default", -2),
    ("deficit", -2),
    ("delay", -1),
    ("delayed", -1),
    ("dilution", -2),
    ("dilutive", -2),
    ("disappoint", -2),
    ("disappointed", -2),
    ("disappointing", -2),
    ("down", -1),
    ("downgrade", -2),
    ("downgraded", -2),
    ("downside", -2),
    ("downturn", -2),
    ("drop", -1),
    ("dropped", -1),
    ("drops", -1),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fall", -1),
    ("fallen", -1),
    ("falling", -1),
    ("falls", -1),
    ("fear", -2),
    ("fears", -2),
    ("fell", -1),
    ("headwind", -2),
    ("headwinds", -2),
    ("inflation", -1),
    ("investigation", -2),
    ("lawsuit", -2),
    ("layoff", -2),
    ("layoffs", -2),
    ("litigation", -2),
    ("lose", -3),
    ("loses", -3),
    ("losing", -3),
    ("loss", -3),
    ("losses", -3),
    ("lost", -3),
    ("miss", -2),
    ("missed", -2),
    ("misses", -2),
    ("negative", -2),
    ("overvalued", -2),
    ("pessimism", -2),
    ("pessimistic", -2),
    ("pressure", -1),
    ("probe", -2),
    ("recall", -2),
    ("recession", -2),
    ("retreat", -1),
    ("risk", -2),
    ("risks", -2),
    ("risky", -2),
    ("selloff", -2),
    ("sell", -1),
    ("shortfall", -2),
    ("slump", -2),
    ("slumped", -2),
    ("slowdown", -2),
    ("struggle", -2),
    ("struggling", -2),
    ("suspended", -2),
    ("threat", -2),
    ("trouble", -2),
    ("uncertain", -1),
    ("uncertainty", -1),
    ("underperform", -2),
    ("underweight", -1),
    ("volatile", -1),
    ("volatility", -1),
    ("warning", -3),
    ("weak", -2),
    ("weaker", -2),
    ("weakness", -2),
    ("worse", -3),
    ("worry", -3),
    ("worried", -3),
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't", "hardly",
    "barely", "neither", "nor", "without",
];

/// Lookup table from lowercase word to polarity, plus the negation words that
/// flip a nearby hit.
#[derive(Debug, Clone)]
pub struct Lexicon {
    polarities: HashMap<&'static str, i32>,
    negations: HashSet<&'static str>,
}

impl Lexicon {
    /// The built-in market lexicon.
    pub fn financial() -> Self {
        Self {
            polarities: FINANCIAL_LEXICON.iter().copied().collect(),
            negations: NEGATION_WORDS.iter().copied().collect(),
        }
    }

    /// Polarity of a lowercase token, `None` when the word is unknown.
    pub fn polarity(&self, word: &str) -> Option<i32> {
        self.polarities.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word)
    }

    pub fn len(&self) -> usize {
        self.polarities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarities.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::financial()
    }
}
