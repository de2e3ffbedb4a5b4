//! C_V topic coherence.
//!
//! Word probabilities come from boolean sliding windows over the tokenized
//! texts. Every topic word is confirmed against the whole topic with the
//! cosine of their NPMI context vectors; the scores are averaged per topic and
//! then over topics.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::corpus::Dictionary;
use crate::lsi::LsiModel;

const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoherenceParams {
    /// Top words taken from each topic.
    pub topn: usize,
    /// Sliding window length in tokens.
    pub window_size: usize,
}

impl Default for CoherenceParams {
    fn default() -> Self {
        Self {
            topn: 20,
            window_size: 110,
        }
    }
}

/// Window counts for a fixed set of word indices.
#[derive(Debug, Default)]
struct WindowCounts {
    occurrences: HashMap<usize, u64>,
    co_occurrences: HashMap<(usize, usize), u64>,
    windows: u64,
}

impl WindowCounts {
    fn accumulate(
        texts: &[Vec<String>],
        dictionary: &Dictionary,
        relevant: &HashSet<usize>,
        window_size: usize,
    ) -> Self {
        let mut counts = Self::default();
        let window_size = window_size.max(1);

        for text in texts {
            // positions of irrelevant tokens stay in place as `None`
            let ids: Vec<Option<usize>> = text
                .iter()
                .map(|t| dictionary.id(t).filter(|id| relevant.contains(id)))
                .collect();

            if ids.len() <= window_size {
                counts.add_window(&ids);
            } else {
                for window in ids.windows(window_size) {
                    counts.add_window(window);
                }
            }
        }
        counts
    }

    fn add_window(&mut self, window: &[Option<usize>]) {
        self.windows += 1;
        let present: BTreeSet<usize> = window.iter().flatten().copied().collect();
        for &a in &present {
            *self.occurrences.entry(a).or_insert(0) += 1;
            for &b in present.range(a + 1..) {
                *self.co_occurrences.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    fn probability(&self, id: usize) -> f64 {
        self.occurrences.get(&id).copied().unwrap_or(0) as f64 / self.windows as f64
    }

    fn joint_probability(&self, a: usize, b: usize) -> f64 {
        if a == b {
            return self.probability(a);
        }
        let key = (a.min(b), a.max(b));
        self.co_occurrences.get(&key).copied().unwrap_or(0) as f64 / self.windows as f64
    }

    /// Normalized pointwise mutual information.
    fn npmi(&self, a: usize, b: usize) -> f64 {
        let marginal = self.probability(a) * self.probability(b);
        if marginal == 0.0 {
            return 0.0;
        }
        let joint = self.joint_probability(a, b) + EPSILON;
        let denominator = -joint.ln();
        if denominator == 0.0 {
            return 0.0;
        }
        (joint / marginal).ln() / denominator
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn confirm_topic(topic: &[usize], counts: &WindowCounts) -> f64 {
    if topic.is_empty() {
        return 0.0;
    }
    let vectors: Vec<Vec<f64>> = topic
        .iter()
        .map(|&w| topic.iter().map(|&t| counts.npmi(w, t)).collect())
        .collect();
    let mut topic_vector = vec![0.0; topic.len()];
    for v in &vectors {
        for (acc, x) in topic_vector.iter_mut().zip(v) {
            *acc += x;
        }
    }
    let total: f64 = vectors.iter().map(|v| cosine(v, &topic_vector)).sum();
    total / vectors.len() as f64
}

/// C_V score of each topic given as lists of word indices.
pub fn topic_coherences(
    topics: &[Vec<usize>],
    texts: &[Vec<String>],
    dictionary: &Dictionary,
    params: &CoherenceParams,
) -> Vec<f64> {
    let relevant: HashSet<usize> = topics.iter().flatten().copied().collect();
    let counts = WindowCounts::accumulate(texts, dictionary, &relevant, params.window_size);
    if counts.windows == 0 {
        return vec![0.0; topics.len()];
    }
    topics.iter().map(|t| confirm_topic(t, &counts)).collect()
}

/// Mean C_V coherence over every topic of the model.
pub fn cv_coherence(
    model: &LsiModel,
    texts: &[Vec<String>],
    dictionary: &Dictionary,
    params: &CoherenceParams,
) -> f64 {
    let topics: Vec<Vec<usize>> = (0..model.num_topics())
        .map(|t| model.top_term_ids(t, params.topn))
        .collect();
    let scores = topic_coherences(&topics, texts, dictionary, params);
    if scores.is_empty() {
        return f64::NAN;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
