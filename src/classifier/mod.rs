// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotation classifier
//!
//! Turns raw vision annotations into a short, human-readable classification:
//! a category (Object, Human, Animal or a named species), a one-line
//! description, a face expression summary, the label list and the most
//! confident localized object.
//!
//! Classification is a pure function of its input and never fails.

pub mod face;
pub mod lexicon;

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::vision::types::{AnnotationResult, LocalizedObjectAnnotation};
use lexicon::{detect_animal, AnimalSignal};

/// Reported when no localized object was found
pub const UNKNOWN_OBJECT: &str = "Unknown";

const HUMAN_ENTITY: &str = "A person is detected.";
const UNDETERMINED_ENTITY: &str = "Could not determine specific entity.";

/// Labels quoted in the description of an object image
const OBJECT_LABELS_IN_DESCRIPTION: usize = 5;

/// Labels quoted in the description of an unnamed animal
const ANIMAL_LABELS_IN_DESCRIPTION: usize = 3;

/// Which signal wins when an image has both animal labels and faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPriority {
    /// Animal labels beat faces
    #[default]
    AnimalFirst,
    /// Faces beat animal labels
    FaceFirst,
}

impl FromStr for CategoryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "animal-first" | "animal_first" | "animal" => Ok(CategoryPriority::AnimalFirst),
            "face-first" | "face_first" | "face" => Ok(CategoryPriority::FaceFirst),
            other => Err(format!(
                "unknown category priority '{}', expected 'animal-first' or 'face-first'",
                other
            )),
        }
    }
}

impl fmt::Display for CategoryPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryPriority::AnimalFirst => write!(f, "animal-first"),
            CategoryPriority::FaceFirst => write!(f, "face-first"),
        }
    }
}

/// Classifier settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierConfig {
    pub priority: CategoryPriority,
}

/// Top-level category of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Object,
    Human,
    Animal,
    /// A named species, stored lowercase
    Species(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Object => write!(f, "Object"),
            Category::Human => write!(f, "Human"),
            Category::Animal => write!(f, "Animal"),
            Category::Species(name) => write!(f, "{}", capitalize(name)),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Simplified classification of one image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: Category,
    pub detected_entity: String,
    pub face_details: String,
    pub labels: Vec<String>,
    pub main_object: String,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_first(labels: &[String], count: usize) -> String {
    labels
        .iter()
        .take(count)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Objects ordered by descending score; ties keep service order
pub fn rank_objects(objects: &[LocalizedObjectAnnotation]) -> Vec<&LocalizedObjectAnnotation> {
    let mut ranked: Vec<_> = objects.iter().collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

/// Derives a `Classification` from vision annotations
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one annotation result
    pub fn classify(&self, result: &AnnotationResult) -> Classification {
        let labels: Vec<String> = result
            .label_annotations
            .iter()
            .map(|label| label.description.clone())
            .collect();

        let main_object = rank_objects(&result.localized_object_annotations)
            .first()
            .map(|object| object.name.clone())
            .unwrap_or_else(|| UNKNOWN_OBJECT.to_string());

        let animal = detect_animal(&labels);
        let category = self.resolve_category(&animal, !result.face_annotations.is_empty());
        let detected_entity = describe_entity(&category, &labels);
        let face_details = face::describe_faces(&result.face_annotations);

        Classification {
            category,
            detected_entity,
            face_details,
            labels,
            main_object,
        }
    }

    fn resolve_category(&self, animal: &AnimalSignal, has_face: bool) -> Category {
        let animal_category = || {
            animal.is_present().then(|| match &animal.species {
                Some(species) => Category::Species(species.clone()),
                None => Category::Animal,
            })
        };

        match self.config.priority {
            CategoryPriority::AnimalFirst => animal_category().unwrap_or(if has_face {
                Category::Human
            } else {
                Category::Object
            }),
            CategoryPriority::FaceFirst if has_face => Category::Human,
            CategoryPriority::FaceFirst => animal_category().unwrap_or(Category::Object),
        }
    }
}

fn describe_entity(category: &Category, labels: &[String]) -> String {
    match category {
        Category::Human => HUMAN_ENTITY.to_string(),
        Category::Object => format!(
            "This image contains objects: {}.",
            join_first(labels, OBJECT_LABELS_IN_DESCRIPTION)
        ),
        Category::Species(species) if !species.is_empty() => format!("This is a {}.", species),
        Category::Animal => format!(
            "This is an animal. Possibly: {}.",
            join_first(labels, ANIMAL_LABELS_IN_DESCRIPTION)
        ),
        Category::Species(_) => UNDETERMINED_ENTITY.to_string(),
    }
}
