// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Facial expression summary

use crate::vision::types::FaceAnnotation;

pub const NO_FACE_DETECTED: &str = "No face detected.";

const PERSON_DETECTED: &str = "Person detected.";

/// Expressions reported for a face, in output order
pub fn expressions(face: &FaceAnnotation) -> Vec<&'static str> {
    [
        (face.joy_likelihood, "smiling"),
        (face.sorrow_likelihood, "sad"),
        (face.surprise_likelihood, "surprised"),
    ]
    .into_iter()
    .filter(|(likelihood, _)| likelihood.is_likely())
    .map(|(_, expression)| expression)
    .collect()
}

/// Describe the first detected face only
pub fn describe_faces(faces: &[FaceAnnotation]) -> String {
    let Some(face) = faces.first() else {
        return NO_FACE_DETECTED.to_string();
    };

    let found = expressions(face);
    if found.is_empty() {
        PERSON_DETECTED.to_string()
    } else {
        format!("Person detected with expression: {}.", found.join(", "))
    }
}
