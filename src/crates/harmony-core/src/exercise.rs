//! Generation responses
//!
//! Wraps a rendered exercise with its id, the MIDI placeholder and display
//! metadata, and renders the standalone metadata document.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use harmony_musicxml::{WriteXml, XmlDocument, XmlWriter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::composer::compose;
use crate::request::ExerciseRequest;
use crate::Result;

/// MIDI rendering is not implemented; responses carry this sentinel
pub const MIDI_PLACEHOLDER: &str = "MOCK_MIDI_DATA";

const ID_PREFIX: &str = "ex-";
const ID_LEN: usize = 8;
const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMetadata {
    pub title: String,
    pub instrument: String,
    pub key: String,
    pub time_signature: String,
    pub difficulty: String,
    pub focus: String,
    pub bars: u32,
    pub generated_at: DateTime<Utc>,
}

impl ExerciseMetadata {
    pub fn new(request: &ExerciseRequest, generated_at: DateTime<Utc>) -> Self {
        ExerciseMetadata {
            title: request.title(),
            instrument: capitalize(&request.instrument),
            key: request.key.clone(),
            time_signature: request.time_signature.to_string(),
            difficulty: capitalize(&request.level),
            focus: request.focus_description(),
            bars: request.bars,
            generated_at: generated_at.trunc_subsecs(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub exercise_id: String,
    pub midi_data: String,
    #[serde(rename = "musicXML")]
    pub music_xml: String,
    pub metadata: ExerciseMetadata,
}

impl ExerciseResponse {
    /// Standalone `harmonyHubExercise` document describing this exercise
    pub fn metadata_xml(&self, writer: &XmlWriter) -> Result<String> {
        let mut doc = writer.document(None)?;
        doc.write(self)?;
        Ok(doc.finish()?)
    }
}

impl WriteXml for ExerciseResponse {
    fn write_xml(&self, doc: &mut XmlDocument) -> harmony_musicxml::Result<()> {
        let meta = &self.metadata;
        doc.element("harmonyHubExercise", &[], |doc| {
            doc.element("exercise", &[("id", self.exercise_id.as_str())], |doc| {
                doc.element("metadata", &[], |doc| {
                    doc.leaf("title", &meta.title)?;
                    doc.leaf("instrument", &meta.instrument)?;
                    doc.leaf("key", &meta.key)?;
                    doc.leaf("timeSignature", &meta.time_signature)?;
                    doc.leaf("difficulty", &meta.difficulty)?;
                    doc.leaf("focus", &meta.focus)?;
                    doc.leaf("bars", meta.bars)?;
                    doc.leaf(
                        "generatedAt",
                        meta.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    )
                })
            })
        })
    }
}

/// Composes, renders and wraps exercises
#[derive(Debug, Clone, Default)]
pub struct ExerciseGenerator {
    writer: XmlWriter,
}

impl ExerciseGenerator {
    pub fn new(writer: XmlWriter) -> Self {
        Self { writer }
    }

    /// Normalize `params` and generate, stamped with the current time
    pub fn generate<R: Rng + ?Sized>(
        &self,
        params: &Map<String, Value>,
        rng: &mut R,
    ) -> Result<ExerciseResponse> {
        self.generate_at(params, rng, Utc::now())
    }

    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        params: &Map<String, Value>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<ExerciseResponse> {
        let request = ExerciseRequest::from_params(params)?;
        self.generate_request(&request, rng, now)
    }

    /// Generate from an already normalized request. `rng` drives the
    /// music only; ids always come from thread-local entropy so seeded runs
    /// still get distinct ids.
    pub fn generate_request<R: Rng + ?Sized>(
        &self,
        request: &ExerciseRequest,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<ExerciseResponse> {
        let exercise_id = exercise_id(&mut rand::thread_rng());
        let document = compose(request, rng);
        let music_xml = document.render(&self.writer, now.date_naive())?;

        info!(
            id = %exercise_id,
            title = %document.title,
            bars = request.bars,
            time_signature = %request.time_signature,
            "Generated exercise"
        );

        Ok(ExerciseResponse {
            exercise_id,
            midi_data: MIDI_PLACEHOLDER.to_string(),
            music_xml,
            metadata: ExerciseMetadata::new(request, now),
        })
    }
}

/// "ex-" followed by eight random lowercase letters or digits
pub fn exercise_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..ID_LEN)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("{}{}", ID_PREFIX, suffix)
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
