//! Sentiment classification of news headlines and the derived mood index.
//!
//! Classification is delegated to a pretrained AFINN wordlist model
//! (the `sentiment` crate). This crate only does batching, label mapping
//! and aggregation on top of it.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;

/// Three-way sentiment tag assigned to a single piece of text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in the fixed display order used for charts and summaries.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    /// Contribution of this label to the mood index.
    fn mood_weight(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Neutral => 0.0,
            SentimentLabel::Negative => -1.0,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("cannot classify an empty batch of texts")]
    EmptyBatch,

    #[error("text at index {index} is blank, classification requires non-empty strings")]
    BlankText { index: usize },
}

static LEXICON_WARMUP: OnceCell<()> = OnceCell::new();

/// Handle to the loaded sentiment model.
///
/// Loading parses the embedded AFINN wordlist, which is the expensive part,
/// so it happens at most once per process. The handle itself is read-only
/// and reusable across any number of [`classify`](SentimentModel::classify)
/// calls.
pub struct SentimentModel {
    _priv: (),
}

impl SentimentModel {
    pub fn load() -> SentimentModel {
        LEXICON_WARMUP.get_or_init(|| {
            let _t = stdx::debug_time_it("Loading the sentiment lexicon");
            sentiment::analyze("warm up the lexicon".to_owned());
        });
        SentimentModel { _priv: () }
    }

    /// Runs batched inference over `texts`, returning exactly one label per
    /// input text in input order. Blank inputs are expected to be filtered
    /// out by the caller beforehand.
    pub fn classify(&self, texts: &[String]) -> Result<Vec<SentimentLabel>, ClassificationError> {
        if texts.is_empty() {
            return Err(ClassificationError::EmptyBatch);
        }
        if let Some(index) = texts.iter().position(|text| text.trim().is_empty()) {
            return Err(ClassificationError::BlankText { index });
        }

        let _t = stdx::debug_time_it("Classifying a batch of texts");

        let labels = texts
            .iter()
            .map(|text| {
                let analysis = sentiment::analyze(text.clone());
                if analysis.score > 0.0 {
                    SentimentLabel::Positive
                } else if analysis.score < 0.0 {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Neutral
                }
            })
            .collect();

        Ok(labels)
    }
}

/// Mean of the per-label weights (`Positive -> +1`, `Neutral -> 0`,
/// `Negative -> -1`), always within `[-1.0, 1.0]`.
/// An empty batch has no mood to speak of and scores `0.0`.
pub fn mood_index(labels: &[SentimentLabel]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total: f64 = labels.iter().map(|label| label.mood_weight()).sum();
    total / labels.len() as f64
}
