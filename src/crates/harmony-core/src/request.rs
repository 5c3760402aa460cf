//! Parameter normalization
//!
//! Callers hand over a loose JSON mapping. [`ExerciseRequest::from_params`]
//! is the only place defaults are applied and input is rejected; everything
//! downstream works on the typed request.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::exercise::capitalize;
use crate::tables::{key_fifths, DEFAULT_INTERVAL, DEFAULT_SCALE};
use crate::{ExerciseError, Result};

pub const DEFAULT_INSTRUMENT: &str = "Piano";
pub const DEFAULT_KEY: &str = "C";
pub const DEFAULT_BARS: u32 = 16;
pub const DEFAULT_LEVEL: &str = "beginner";

/// Largest accepted bar count
pub const MAX_BARS: u32 = 1000;
/// Largest accepted beats per measure
pub const MAX_BEATS: u32 = 32;
/// Largest accepted beat unit
pub const MAX_BEAT_TYPE: u32 = 64;

/// What an exercise concentrates on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FocusType {
    #[default]
    Intervals,
    Scales,
    Arpeggios,
    Rhythm,
    /// Any other focus, kept verbatim
    Other(String),
}

impl FocusType {
    /// Case-insensitive; unrecognized names become [`FocusType::Other`]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "intervals" => FocusType::Intervals,
            "scales" => FocusType::Scales,
            "arpeggios" => FocusType::Arpeggios,
            "rhythm" => FocusType::Rhythm,
            _ => FocusType::Other(name.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FocusType::Intervals => "intervals",
            FocusType::Scales => "scales",
            FocusType::Arpeggios => "arpeggios",
            FocusType::Rhythm => "rhythm",
            FocusType::Other(name) => name,
        }
    }

    /// Focus value used when the caller gives none
    pub fn default_value(&self) -> &'static str {
        match self {
            FocusType::Intervals => DEFAULT_INTERVAL,
            FocusType::Scales | FocusType::Arpeggios => DEFAULT_SCALE,
            FocusType::Rhythm => "quarters",
            FocusType::Other(_) => "general",
        }
    }
}

impl fmt::Display for FocusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meter as beats per measure over beat unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}

impl TimeSignature {
    pub fn new(beats: u32, beat_type: u32) -> Self {
        TimeSignature { beats, beat_type }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::new(4, 4)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

impl FromStr for TimeSignature {
    type Err = ExerciseError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ExerciseError::InvalidTimeSignature(s.to_string());

        let (beats, beat_type) = s.split_once('/').ok_or_else(invalid)?;
        let beats: u32 = beats.trim().parse().map_err(|_| invalid())?;
        let beat_type: u32 = beat_type.trim().parse().map_err(|_| invalid())?;

        if !(1..=MAX_BEATS).contains(&beats) || !(1..=MAX_BEAT_TYPE).contains(&beat_type) {
            return Err(invalid());
        }

        Ok(TimeSignature::new(beats, beat_type))
    }
}

/// Fully resolved generation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRequest {
    pub instrument: String,
    pub key: String,
    pub time_signature: TimeSignature,
    pub bars: u32,
    pub focus_type: FocusType,
    pub focus_value: String,
    /// Replaces the focus type in the title when present
    pub focus_label: Option<String>,
    pub level: String,
}

impl Default for ExerciseRequest {
    fn default() -> Self {
        let focus_type = FocusType::default();
        ExerciseRequest {
            instrument: DEFAULT_INSTRUMENT.to_string(),
            key: DEFAULT_KEY.to_string(),
            time_signature: TimeSignature::default(),
            bars: DEFAULT_BARS,
            focus_value: focus_type.default_value().to_string(),
            focus_type,
            focus_label: None,
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

impl ExerciseRequest {
    /// Resolve a raw parameter mapping; unknown fields are ignored
    pub fn from_params(params: &Map<String, Value>) -> Result<Self> {
        let focus_type = string_field(params, "focusType")
            .map(|s| FocusType::parse(&s))
            .unwrap_or_default();
        // Table lookups are lowercase
        let focus_value = string_field(params, "focusValue")
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| focus_type.default_value().to_string());

        Ok(ExerciseRequest {
            instrument: string_field(params, "instrument")
                .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string()),
            key: string_field(params, "key").unwrap_or_else(|| DEFAULT_KEY.to_string()),
            time_signature: time_signature_field(params)?,
            bars: bars_field(params.get("bars"))?,
            focus_type,
            focus_value,
            focus_label: string_field(params, "focusLabel"),
            level: string_field(params, "level").unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        })
    }

    /// The canonical parameter mapping for this request
    pub fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("instrument".into(), self.instrument.clone().into());
        params.insert("key".into(), self.key.clone().into());
        params.insert("timeSignature".into(), self.time_signature.to_string().into());
        params.insert("bars".into(), self.bars.into());
        params.insert("focusType".into(), self.focus_type.as_str().into());
        params.insert("focusValue".into(), self.focus_value.clone().into());
        if let Some(label) = &self.focus_label {
            params.insert("focusLabel".into(), label.clone().into());
        }
        params.insert("level".into(), self.level.clone().into());
        params
    }

    /// Key signature fifths for the requested key
    pub fn fifths(&self) -> i8 {
        key_fifths(&self.key)
    }

    /// "{Focus} Exercise in {key}"
    pub fn title(&self) -> String {
        let focus = match &self.focus_label {
            Some(label) => label.clone(),
            None => capitalize(self.focus_type.as_str()),
        };
        format!("{} Exercise in {}", focus, self.key)
    }

    /// "{focusType} - {focusValue}"
    pub fn focus_description(&self) -> String {
        format!("{} - {}", self.focus_type, self.focus_value)
    }
}

/// Shorthand for [`ExerciseRequest::from_params`]
pub fn normalize(params: &Map<String, Value>) -> Result<ExerciseRequest> {
    ExerciseRequest::from_params(params)
}

/// Strings pass through minus control characters, numbers and booleans
/// are stringified; blank, null and structured values count as absent
fn string_field(params: &Map<String, Value>, name: &str) -> Option<String> {
    let value = match params.get(name)? {
        Value::String(s) => s
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// `timeSignature`, else `meterNumerator`/`meterDenominator`, else 4/4
fn time_signature_field(params: &Map<String, Value>) -> Result<TimeSignature> {
    if let Some(ts) = string_field(params, "timeSignature") {
        return ts.parse();
    }

    let numerator = string_field(params, "meterNumerator");
    let denominator = string_field(params, "meterDenominator");
    if numerator.is_none() && denominator.is_none() {
        return Ok(TimeSignature::default());
    }

    format!(
        "{}/{}",
        numerator.as_deref().unwrap_or("4"),
        denominator.as_deref().unwrap_or("4")
    )
    .parse()
}

fn bars_field(value: Option<&Value>) -> Result<u32> {
    let invalid = |v: &Value| ExerciseError::InvalidBars(v.to_string());

    let bars = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_BARS),
        Some(v @ Value::Number(n)) => match n.as_u64() {
            Some(b) => b,
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64)
                .ok_or_else(|| invalid(v))?,
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| ExerciseError::InvalidBars(s.clone()))?,
        Some(other) => return Err(invalid(other)),
    };

    match u32::try_from(bars) {
        Ok(b) if (1..=MAX_BARS).contains(&b) => Ok(b),
        _ => Err(ExerciseError::InvalidBars(bars.to_string())),
    }
}
