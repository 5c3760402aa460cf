//! Practice exercise generation for HarmonyHub
//!
//! This crate turns a loosely-typed parameter mapping (instrument, key, time
//! signature, bar count, focus, level) into a MusicXML practice exercise.
//!
//! # Examples
//!
//! ```
//! use harmony_core::ExerciseGenerator;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use serde_json::json;
//!
//! let params = json!({ "key": "G", "timeSignature": "3/4", "bars": 8, "focusType": "scales" });
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let exercise = ExerciseGenerator::default()
//!     .generate(params.as_object().unwrap(), &mut rng)
//!     .unwrap();
//!
//! assert_eq!(exercise.metadata.title, "Scales Exercise in G");
//! assert!(exercise.music_xml.contains("<fifths>1</fifths>"));
//! ```
//!
//! # Pipeline
//!
//! - **request**: Normalizes raw parameters into an [`ExerciseRequest`]
//! - **tables**: Key signature, interval and scale lookup tables
//! - **generator**: Per-beat note/rest generation driven by the focus pattern
//! - **composer**: Assembles measures into an [`ExerciseDocument`]
//! - **exercise**: Renders the document and wraps it in an [`ExerciseResponse`]
//!
//! Randomness is always supplied by the caller, so a seeded generator
//! reproduces an exercise exactly.

pub mod composer;
pub mod event;
pub mod exercise;
pub mod generator;
pub mod request;
pub mod tables;

pub use composer::{compose, ExerciseDocument, Measure};
pub use event::{Accidental, NoteEvent};
pub use exercise::{
    capitalize, exercise_id, ExerciseGenerator, ExerciseMetadata, ExerciseResponse,
    MIDI_PLACEHOLDER,
};
pub use generator::{next_event, FocusPattern};
pub use request::{normalize, ExerciseRequest, FocusType, TimeSignature};
pub use tables::key_fifths;

/// Re-export the notation types exercises are built from
pub use harmony_musicxml::{Step, XmlWriter};

/// Exercise generation errors
#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error("Invalid time signature '{0}': expected N/M with positive integers")]
    InvalidTimeSignature(String),

    #[error("Invalid bar count '{0}': expected a positive integer")]
    InvalidBars(String),

    #[error("Failed to render exercise: {0}")]
    Render(#[from] harmony_musicxml::XmlError),
}

pub type Result<T> = std::result::Result<T, ExerciseError>;
