// ============================================================
// Layer 3 — Emotion Report
// ============================================================
// Shapes a label → confidence mapping into the response sent
// back across the service boundary:
//
//   {
//     "emotions":         { "happy": 0.81, "sad": 0.07, ... },
//     "dominant_emotion": { "label": "happy", "score": 0.81 }
//   }
//
// Scores may come in as any numeric type (f32 softmax output
// from the model, f64 from elsewhere). They are always coerced
// to f64 here so the report serialises without surprises.
//
// Reference: Rust Book §8 (Hash Maps), §10 (Generics)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The highest-scoring entry of an emotion mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantEmotion {
    pub label: String,
    pub score: f64,
}

/// Full emotion scores plus the dominant one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReport {
    pub emotions:         BTreeMap<String, f64>,
    pub dominant_emotion: DominantEmotion,
}

impl EmotionReport {
    /// Build a report from (label, score) pairs.
    ///
    /// Ties go to the label that sorts first.
    /// Fails if no scores were supplied.
    pub fn from_scores<I, L, S>(scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: Into<f64>,
    {
        let emotions: BTreeMap<String, f64> = scores
            .into_iter()
            .map(|(label, score)| (label.into(), score.into()))
            .collect();

        let Some(dominant_emotion) = dominant(&emotions) else {
            bail!("Cannot pick a dominant emotion from an empty score map");
        };

        Ok(Self { emotions, dominant_emotion })
    }
}

/// Pick the entry with the highest score.
///
/// Iterates in key order and only replaces the current best on a
/// strictly greater score, so the first label wins a tie.
pub fn dominant(scores: &BTreeMap<String, f64>) -> Option<DominantEmotion> {
    let mut best: Option<(&String, f64)> = None;

    for (label, &score) in scores {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((label, score)),
        }
    }

    best.map(|(label, score)| DominantEmotion {
        label: label.clone(),
        score,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_highest_score() {
        let report = EmotionReport::from_scores([
            ("angry", 0.1f32),
            ("happy", 0.7f32),
            ("sad",   0.2f32),
        ])
        .unwrap();

        assert_eq!(report.dominant_emotion.label, "happy");
        assert!((report.dominant_emotion.score - 0.7).abs() < 1e-6);
        assert_eq!(report.emotions.len(), 3);
    }

    #[test]
    fn test_tie_goes_to_first_label() {
        let report = EmotionReport::from_scores([("sad", 0.5), ("happy", 0.5)]).unwrap();
        assert_eq!(report.dominant_emotion.label, "happy");
    }

    #[test]
    fn test_empty_scores_fail() {
        let empty: Vec<(String, f64)> = Vec::new();
        let err = EmotionReport::from_scores(empty).unwrap_err();
        assert!(err.to_string().contains("empty score map"));
    }

    #[test]
    fn test_report_serialises_plain_floats() {
        let report = EmotionReport::from_scores([("neutral", 1.0f32)]).unwrap();
        let json   = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"emotions":{"neutral":1.0},"dominant_emotion":{"label":"neutral","score":1.0}}"#
        );
    }
}
