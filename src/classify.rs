// src/classify.rs
//
// Vowel classification from coefficient vectors.

use std::collections::HashMap;

use crate::storage::{Snapshot, Vowel};

/// A label with the classifier's confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Vowel,
    pub confidence: f32,
}

/// Anything that can label a coefficient vector
pub trait Classifier {
    /// `None` when there is nothing to compare against
    fn classify(&self, coefficients: &[f32]) -> Option<Classification>;
}

/// k-nearest-neighbour vote over stored snapshots (Euclidean distance).
///
/// Ties between labels go to the label owning the closest neighbour.
/// Snapshots whose length differs from the query, or that contain
/// non-finite values, are ignored.
pub struct NearestNeighbors {
    k: usize,
    examples: Vec<(Vowel, Vec<f32>)>,
}

impl NearestNeighbors {
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            examples: Vec::new(),
        }
    }

    pub fn from_snapshots<'a, I>(k: usize, snapshots: I) -> Self
    where
        I: IntoIterator<Item = &'a Snapshot>,
    {
        let mut knn = Self::new(k);
        for snapshot in snapshots {
            knn.add(snapshot.vowel, snapshot.coefficients.clone());
        }
        knn
    }

    pub fn add(&mut self, label: Vowel, coefficients: Vec<f32>) {
        if coefficients.iter().all(|c| c.is_finite()) {
            self.examples.push((label, coefficients));
        } else {
            log::debug!("Ignoring non-finite example labeled '{}'", label);
        }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl Classifier for NearestNeighbors {
    fn classify(&self, coefficients: &[f32]) -> Option<Classification> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return None;
        }

        let mut neighbours: Vec<(f32, Vowel)> = self
            .examples
            .iter()
            .filter(|(_, example)| example.len() == coefficients.len())
            .map(|(label, example)| (squared_distance(example, coefficients), *label))
            .collect();
        if neighbours.is_empty() {
            return None;
        }

        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbours.truncate(self.k);

        // votes and rank of the closest member per label
        let mut votes: HashMap<Vowel, (usize, usize)> = HashMap::new();
        for (rank, (_, label)) in neighbours.iter().enumerate() {
            let entry = votes.entry(*label).or_insert((0, rank));
            entry.0 += 1;
        }

        let (label, (count, _)) = votes
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))?;

        Some(Classification {
            label,
            confidence: count as f32 / neighbours.len() as f32,
        })
    }
}
