// ============================================================
// Layer 4 — Label Encoder
// ============================================================
// Maps emotion names to one-hot target vectors.
//
// How the mapping is built:
//   1. Collect the distinct labels actually present
//   2. Sort them (BTreeSet gives sorted, de-duplicated order)
//   3. Index i ↔ i-th label in sorted order
//
// Example:
//   labels  = ["sad", "happy", "sad", "angry"]
//   classes = ["angry", "happy", "sad"]
//   "sad"   → 2 → [0.0, 0.0, 1.0]
//
// The width of the one-hot vector is the number of DISTINCT
// labels in the corpus, not any configured class count.
// The encoder is rebuilt from scratch whenever a corpus is
// loaded; nothing is shared between training and evaluation.
//
// Reference: Rust Book §8 (Collections)

use anyhow::{anyhow, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    /// Sorted distinct class names; position = class index
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Derive the class ordering from the labels present
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class index for a label, if the label was seen during fit
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// One-hot row for a class index
    pub fn one_hot(&self, index: usize) -> Vec<f32> {
        let mut row = vec![0.0; self.classes.len()];
        if let Some(slot) = row.get_mut(index) {
            *slot = 1.0;
        }
        row
    }

    /// Encode one label as a one-hot row
    pub fn encode(&self, label: &str) -> Result<Vec<f32>> {
        let index = self
            .index_of(label)
            .ok_or_else(|| anyhow!("Unknown label '{label}'"))?;
        Ok(self.one_hot(index))
    }

    /// Encode a whole label sequence into a one-hot matrix
    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<Vec<f32>>> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }
}
