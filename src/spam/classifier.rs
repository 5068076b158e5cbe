use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ClassifierConfig;

use super::keywords::KeywordSet;

// ASCII digits and ASCII word boundaries only.
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}(?-u:\b)").expect("valid phone regex")
});
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid url regex"));

const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€', '¥', '₹'];
const UPPERCASE_RATIO: f64 = 0.3;
const EXCLAMATION_LIMIT: usize = 3;

/// Structural signals checked against the original, non-lowered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    ExcessiveCaps,
    ExcessiveExclamation,
    CurrencySymbol,
    PhoneNumber,
    Url,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::ExcessiveCaps,
        Heuristic::ExcessiveExclamation,
        Heuristic::CurrencySymbol,
        Heuristic::PhoneNumber,
        Heuristic::Url,
    ];

    pub fn weight(self) -> u32 {
        match self {
            Heuristic::ExcessiveCaps => 2,
            _ => 1,
        }
    }

    pub fn matches(self, text: &str) -> bool {
        match self {
            Heuristic::ExcessiveCaps => {
                let upper = text.chars().filter(char::is_ascii_uppercase).count();
                upper as f64 > text.chars().count() as f64 * UPPERCASE_RATIO
            }
            Heuristic::ExcessiveExclamation => {
                text.chars().filter(|ch| *ch == '!').count() > EXCLAMATION_LIMIT
            }
            Heuristic::CurrencySymbol => text.contains(CURRENCY_SYMBOLS),
            Heuristic::PhoneNumber => PHONE_REGEX.is_match(text),
            Heuristic::Url => URL_REGEX.is_match(text),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::ExcessiveCaps => "excessive_caps",
            Heuristic::ExcessiveExclamation => "excessive_exclamation",
            Heuristic::CurrencySymbol => "currency_symbol",
            Heuristic::PhoneNumber => "phone_number",
            Heuristic::Url => "url",
        }
    }
}

/// Tally for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpamScore {
    pub keywords: Vec<String>,
    pub heuristics: Vec<Heuristic>,
}

impl SpamScore {
    pub fn total(&self) -> u32 {
        self.keywords.len() as u32 + self.heuristics.iter().map(|h| h.weight()).sum::<u32>()
    }
}

/// Keyword and heuristic scorer. Holds no mutable state, so one instance is
/// shared by every request.
#[derive(Debug, Clone)]
pub struct SpamClassifier {
    keywords: KeywordSet,
    threshold: u32,
    heuristics: bool,
}

impl SpamClassifier {
    pub fn new(keywords: KeywordSet, threshold: u32, heuristics: bool) -> Self {
        Self {
            keywords,
            threshold,
            heuristics,
        }
    }

    pub fn from_config(config: &ClassifierConfig, extended_keywords: bool) -> Self {
        let keywords = KeywordSet::for_deployment(extended_keywords, &config.extra_keywords);
        Self::new(keywords, config.threshold, config.heuristics)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn score(&self, text: &str) -> SpamScore {
        let lowered = text.to_lowercase();
        let keywords = self
            .keywords
            .matches(&lowered)
            .map(str::to_string)
            .collect();

        let heuristics = if self.heuristics {
            Heuristic::ALL
                .into_iter()
                .filter(|h| h.matches(text))
                .collect()
        } else {
            Vec::new()
        };

        SpamScore {
            keywords,
            heuristics,
        }
    }

    /// Spam when the score is strictly above the threshold.
    pub fn classify(&self, text: &str) -> bool {
        let score = self.score(text);
        let total = score.total();
        tracing::debug!(
            target: "spam",
            total,
            threshold = self.threshold,
            keywords = ?score.keywords,
            heuristics = ?score.heuristics.iter().map(|h| h.name()).collect::<Vec<_>>(),
            "text scored"
        );
        total > self.threshold
    }
}
