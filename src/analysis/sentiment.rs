use crate::error::SentimentError;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

const POSITIVE_THRESHOLD: f64 = 0.2;
const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Polarity of a text in [-1, 1]
#[cfg_attr(test, mockall::automock)]
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError>;
}

/// Overall mood of the top tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    #[serde(rename = "Mostly Positive")]
    MostlyPositive,
    #[serde(rename = "Mostly Negative")]
    MostlyNegative,
    #[serde(rename = "Mixed/Neutral")]
    MixedNeutral,
}

impl SentimentLabel {
    /// Label for the mean of `scores`; no scores count as neutral
    pub fn from_scores(scores: &[f64]) -> Self {
        let mean = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        if mean > POSITIVE_THRESHOLD {
            SentimentLabel::MostlyPositive
        } else if mean < NEGATIVE_THRESHOLD {
            SentimentLabel::MostlyNegative
        } else {
            SentimentLabel::MixedNeutral
        }
    }
}

/// Score lyrics; missing lyrics and scorer failures are neutral (0)
pub fn score_lyrics(scorer: &dyn SentimentScorer, lyrics: Option<&str>) -> f64 {
    let Some(text) = lyrics else {
        return 0.0;
    };

    match scorer.polarity(text) {
        Ok(score) if score.is_finite() => score.clamp(-1.0, 1.0),
        Ok(score) => {
            warn!("Sentiment scorer returned {score}, using 0");
            0.0
        }
        Err(e) => {
            warn!("Error analyzing sentiment: {e}");
            0.0
        }
    }
}

/// Word-list polarity scorer.
///
/// Averages the polarity of every opinion word found in the text. A negation
/// within the previous two words flips and halves the word's polarity, an
/// intensifier right before it scales it.
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

const LEXICON: &[(&str, f64)] = &[
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("happy", 0.8),
    ("happiness", 0.8),
    ("joy", 0.8),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("beautiful", 0.85),
    ("sweet", 0.35),
    ("nice", 0.6),
    ("free", 0.4),
    ("bright", 0.7),
    ("shine", 0.5),
    ("sunshine", 0.6),
    ("smile", 0.6),
    ("laugh", 0.5),
    ("dance", 0.3),
    ("alive", 0.3),
    ("fun", 0.3),
    ("perfect", 1.0),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("heaven", 0.5),
    ("glad", 0.5),
    ("hope", 0.4),
    ("kind", 0.6),
    ("warm", 0.6),
    ("safe", 0.5),
    ("strong", 0.4),
    ("win", 0.8),
    ("gold", 0.3),
    ("baby", 0.1),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("sad", -0.5),
    ("cry", -0.5),
    ("crying", -0.5),
    ("tears", -0.4),
    ("pain", -0.6),
    ("hurt", -0.6),
    ("hate", -0.8),
    ("alone", -0.4),
    ("lonely", -0.5),
    ("broken", -0.4),
    ("dead", -0.2),
    ("die", -0.5),
    ("dying", -0.5),
    ("death", -0.5),
    ("dark", -0.15),
    ("cold", -0.6),
    ("lost", -0.4),
    ("wrong", -0.5),
    ("fear", -0.6),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("angry", -0.5),
    ("mad", -0.6),
    ("sick", -0.7),
    ("tired", -0.4),
    ("empty", -0.1),
    ("goodbye", -0.2),
    ("never", -0.1),
    ("lie", -0.4),
    ("lies", -0.4),
    ("evil", -1.0),
    ("hell", -0.6),
    ("war", -0.5),
    ("kill", -0.7),
    ("blue", -0.1),
    ("sorry", -0.5),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("cruel", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("too", 1.2),
    ("extremely", 1.5),
    ("truly", 1.3),
    ("totally", 1.3),
    ("quite", 1.1),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "dont", "don't", "cant", "can't", "wont", "won't", "aint", "ain't", "isnt",
    "isn't", "didnt", "didn't", "nothing", "nobody",
];

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|word| !word.is_empty())
            .map(|word| word.trim_matches('\'').to_lowercase())
            .filter(|word| !word.is_empty())
            .collect()
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        let words = Self::tokenize(text);
        let mut scores = Vec::new();

        for (i, word) in words.iter().enumerate() {
            let Some(&base) = self.lexicon.get(word.as_str()) else {
                continue;
            };

            let mut score = base;
            if let Some(prev) = i.checked_sub(1).map(|j| words[j].as_str()) {
                if let Some(&factor) = self.intensifiers.get(prev) {
                    score *= factor;
                }
            }

            let negated = words[i.saturating_sub(2)..i]
                .iter()
                .any(|w| NEGATIONS.contains(&w.as_str()));
            if negated {
                score *= -0.5;
            }

            scores.push(score.clamp(-1.0, 1.0));
        }

        if scores.is_empty() {
            return Ok(0.0);
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
