// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label vocabularies used to spot animals

use std::collections::HashSet;
use std::sync::LazyLock;

/// Labels that mark an image as containing some animal
static GENERIC_ANIMAL_LABELS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["animal", "mammal", "wildlife", "fauna", "zoo", "pet"]
        .into_iter()
        .collect()
});

/// Species reported by name when a label matches exactly
static KNOWN_SPECIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "cow", "dog", "cat", "horse", "sheep", "goat", "pig", "bird", "elephant", "lion", "tiger",
        "bear", "deer", "rabbit", "fox",
    ]
    .into_iter()
    .collect()
});

/// Substrings that identify cattle in labels like "Dairy cattle"
const CATTLE_MARKERS: &[&str] = &["cattle", "bovine"];

const CATTLE_SPECIES: &str = "cow";

/// Animal evidence found in a label list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalSignal {
    /// Some label is a generic animal term
    pub is_animal: bool,
    /// Lowercase species from the first matching label
    pub species: Option<String>,
}

impl AnimalSignal {
    pub fn is_present(&self) -> bool {
        self.is_animal || self.species.is_some()
    }
}

/// Species named by a single label, if any
fn species_for_label(label: &str) -> Option<String> {
    let lower = label.to_lowercase();
    if KNOWN_SPECIES.contains(lower.as_str()) {
        return Some(lower);
    }
    if CATTLE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return Some(CATTLE_SPECIES.to_string());
    }
    None
}

/// Scan labels (in service order) for animal evidence
pub fn detect_animal(labels: &[String]) -> AnimalSignal {
    let is_animal = labels
        .iter()
        .any(|label| GENERIC_ANIMAL_LABELS.contains(label.to_lowercase().as_str()));

    let species = labels.iter().find_map(|label| species_for_label(label));

    AnimalSignal { is_animal, species }
}
