//! MusicXML partwise documents for HarmonyHub exercises
//!
//! This crate provides a typed representation of the subset of MusicXML 3.1
//! (`score-partwise`) that practice exercises use and a thin document writer
//! ([`XmlWriter`], [`XmlDocument`]) over `quick-xml` that emits indented,
//! escaped XML text.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use harmony_musicxml::{
//!     Attributes, Identification, Measure, Note, Part, Pitch, ScorePartwise, Step, XmlWriter,
//! };
//!
//! let mut measure = Measure::new(1);
//! measure.attributes = Some(Attributes::new(0, 4, 4));
//! measure.notes.push(Note::quarter(Pitch::new(Step::C, 4)));
//! measure.notes.push(Note::quarter_rest());
//!
//! let date = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap();
//! let score = ScorePartwise::new("Scales Exercise in C", Identification::harmony_hub(date))
//!     .with_part(Part::new("P1", "Piano", vec![measure]));
//!
//! let xml = score.to_xml(&XmlWriter::default()).unwrap();
//! assert!(xml.contains("<work-title>Scales Exercise in C</work-title>"));
//! ```
//!
//! # Main Components
//!
//! - **XmlWriter**: Formatting options; starts documents with declaration and doctype
//! - **WriteXml**: Implemented by every node that serializes itself
//! - **ScorePartwise**: Typed score tree with validation

pub mod pitch;
pub mod score;
pub mod writer;

pub use pitch::{NoteType, Step};
pub use score::{
    Attributes, Clef, Creator, Encoding, Identification, Measure, Note, NoteContent, Part,
    Pitch, ScorePartwise, CREATOR_NAME, MUSICXML_VERSION, PARTWISE_DOCTYPE, SOFTWARE_NAME,
};
pub use writer::{WriteXml, XmlDocument, XmlWriter};

/// Errors raised while validating or serializing a document
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("Score has no parts")]
    NoParts,

    #[error("Duplicate part id: {0}")]
    DuplicatePartId(String),

    #[error("Part {0} has no measures")]
    EmptyPart(String),

    #[error("Measure {number} in part {part} has no notes")]
    EmptyMeasure { part: String, number: u32 },

    #[error("Measure {found} in part {part} is out of sequence (expected {expected})")]
    MeasureOutOfSequence { part: String, expected: u32, found: u32 },

    #[error("First measure of part {0} has no attributes")]
    MissingAttributes(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("Output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, XmlError>;
