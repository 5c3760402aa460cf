use anyhow::{Context, Result};
use harmony_core::{ExerciseGenerator, XmlWriter};
use rand::Rng;
use serde_json::{Map, Value};
use std::str::FromStr;

/// What the bridge should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Full JSON response
    Generate,
    /// The MusicXML score only
    MusicXml,
    /// The exercise metadata document
    Metadata,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "generate" => Ok(Action::Generate),
            "musicxml" => Ok(Action::MusicXml),
            "metadata" => Ok(Action::Metadata),
            other => anyhow::bail!(
                "Unknown action '{}' (expected generate, musicxml or metadata)",
                other
            ),
        }
    }
}

/// Decode the `--params` blob; absent means all defaults
pub fn parse_params(raw: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    let value: Value = serde_json::from_str(raw).context("Failed to parse --params as JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--params must be a JSON object, got {}", other),
    }
}

/// Run one action and return the text to emit
pub fn run<R: Rng + ?Sized>(
    action: Action,
    params: &Map<String, Value>,
    indent: usize,
    rng: &mut R,
) -> Result<String> {
    let writer = XmlWriter::new(indent);
    let response = ExerciseGenerator::new(writer.clone())
        .generate(params, rng)
        .context("Failed to generate exercise")?;

    match action {
        Action::Generate => {
            serde_json::to_string_pretty(&response).context("Failed to encode response")
        }
        Action::MusicXml => Ok(response.music_xml),
        Action::Metadata => Ok(response.metadata_xml(&writer)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_action_from_str() {
        assert_eq!("generate".parse::<Action>().unwrap(), Action::Generate);
        assert_eq!("musicxml".parse::<Action>().unwrap(), Action::MusicXml);
        assert_eq!("metadata".parse::<Action>().unwrap(), Action::Metadata);
        assert!("export".parse::<Action>().is_err());
    }

    #[test]
    fn test_parse_params() {
        assert!(parse_params(None).unwrap().is_empty());
        let params = parse_params(Some(r#"{"key": "D", "bars": "4"}"#)).unwrap();
        assert_eq!(params["key"], "D");
        assert!(parse_params(Some("{not json")).is_err());
        assert!(parse_params(Some("[1, 2]")).is_err());
    }

    #[test]
    fn test_generate_outputs_json() {
        let params = parse_params(Some(r#"{"instrument": "flute", "bars": 2}"#)).unwrap();
        let out = run(Action::Generate, &params, 2, &mut StdRng::seed_from_u64(1)).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["metadata"]["instrument"], "Flute");
        assert_eq!(json["midiData"], "MOCK_MIDI_DATA");
        assert!(json["musicXML"].as_str().unwrap().contains("<part-name>flute</part-name>"));
    }

    #[test]
    fn test_musicxml_respects_indent() {
        let out = run(Action::MusicXml, &Map::new(), 4, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("\n    <work>"));
    }

    #[test]
    fn test_metadata_action() {
        let out = run(Action::Metadata, &Map::new(), 2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(out.contains("<harmonyHubExercise>"));
        assert!(out.contains("<title>Intervals Exercise in C</title>"));
    }

    #[test]
    fn test_seeded_runs_get_distinct_ids() {
        let run_seeded = || {
            let out = run(Action::Generate, &Map::new(), 2, &mut StdRng::seed_from_u64(7)).unwrap();
            serde_json::from_str::<Value>(&out).unwrap()
        };
        let (a, b) = (run_seeded(), run_seeded());
        assert_ne!(a["exerciseId"], b["exerciseId"]);
        assert_eq!(a["musicXML"], b["musicXML"]);
    }

    #[test]
    fn test_invalid_params_fail() {
        let params = parse_params(Some(r#"{"bars": 0}"#)).unwrap();
        assert!(run(Action::Generate, &params, 2, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
