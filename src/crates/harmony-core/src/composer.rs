use chrono::NaiveDate;
use harmony_musicxml::{self as mx, Attributes, Identification, Part, ScorePartwise, XmlWriter};
use rand::Rng;
use tracing::debug;

use crate::event::NoteEvent;
use crate::generator::FocusPattern;
use crate::request::ExerciseRequest;
use crate::Result;

/// Exercises are single-part scores
pub const PART_ID: &str = "P1";

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub number: u32,
    /// Present on the first measure only
    pub attributes: Option<Attributes>,
    pub events: Vec<NoteEvent>,
}

impl Measure {
    fn to_score_measure(&self) -> mx::Measure {
        mx::Measure {
            number: self.number,
            attributes: self.attributes,
            notes: self.events.iter().map(NoteEvent::to_note).collect(),
        }
    }
}

/// A composed exercise, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDocument {
    pub title: String,
    pub instrument: String,
    pub measures: Vec<Measure>,
}

impl ExerciseDocument {
    /// Build the single-part score tree
    pub fn to_score(&self, encoding_date: NaiveDate) -> ScorePartwise {
        let measures = self.measures.iter().map(Measure::to_score_measure).collect();
        ScorePartwise::new(&self.title, Identification::harmony_hub(encoding_date))
            .with_part(Part::new(PART_ID, &self.instrument, measures))
    }

    /// Serialize as a MusicXML document
    pub fn render(&self, writer: &XmlWriter, encoding_date: NaiveDate) -> Result<String> {
        Ok(self.to_score(encoding_date).to_xml(writer)?)
    }
}

/// Compose `request.bars` measures of `beats` one-beat events each
pub fn compose<R: Rng + ?Sized>(request: &ExerciseRequest, rng: &mut R) -> ExerciseDocument {
    let ts = request.time_signature;
    let pattern = FocusPattern::resolve(&request.focus_type, &request.focus_value);

    let measures = (1..=request.bars)
        .map(|number| {
            let attributes =
                (number == 1).then(|| Attributes::new(request.fifths(), ts.beats, ts.beat_type));
            let events = (0..ts.beats).map(|_| pattern.next_event(rng)).collect();
            Measure {
                number,
                attributes,
                events,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        bars = measures.len(),
        beats = ts.beats,
        focus = %request.focus_type,
        "Composed exercise"
    );

    ExerciseDocument {
        title: request.title(),
        instrument: request.instrument.clone(),
        measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TimeSignature;
    use crate::tables::KEY_SIGNATURES;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 16).unwrap()
    }

    fn request(bars: u32, beats: u32) -> ExerciseRequest {
        ExerciseRequest {
            bars,
            time_signature: TimeSignature::new(beats, 4),
            ..Default::default()
        }
    }

    #[test]
    fn test_attributes_only_on_first_measure() {
        let mut rng = StdRng::seed_from_u64(0);
        let doc = compose(&request(5, 4), &mut rng);

        assert_eq!(doc.measures.len(), 5);
        assert!(doc.measures[0].attributes.is_some());
        assert!(doc.measures[1..].iter().all(|m| m.attributes.is_none()));

        let attributes = doc.measures[0].attributes.unwrap();
        assert_eq!(attributes.divisions, 1);
        assert_eq!(attributes.clef, mx::Clef::treble());
        assert_eq!((attributes.beats, attributes.beat_type), (4, 4));
    }

    #[test]
    fn test_measure_numbers_sequential() {
        let mut rng = StdRng::seed_from_u64(3);
        let doc = compose(&request(7, 2), &mut rng);
        let numbers: Vec<u32> = doc.measures.iter().map(|m| m.number).collect();
        assert_eq!(numbers, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_fifths_follow_key_table() {
        let mut rng = StdRng::seed_from_u64(0);
        for &(key, fifths) in KEY_SIGNATURES {
            let req = ExerciseRequest {
                key: key.to_string(),
                bars: 1,
                ..Default::default()
            };
            let doc = compose(&req, &mut rng);
            assert_eq!(doc.measures[0].attributes.unwrap().fifths, fifths, "key {}", key);
        }

        let unknown = ExerciseRequest {
            key: "Z".into(),
            bars: 1,
            ..Default::default()
        };
        assert_eq!(compose(&unknown, &mut rng).measures[0].attributes.unwrap().fifths, 0);
    }

    #[test]
    fn test_render_single_measure() {
        let mut rng = StdRng::seed_from_u64(8);
        let doc = compose(&request(1, 1), &mut rng);
        let xml = doc.render(&XmlWriter::default(), date()).unwrap();
        assert!(xml.contains("<work-title>Intervals Exercise in C</work-title>"));
        assert!(xml.contains("<part-name>Piano</part-name>"));
        assert_eq!(xml.matches("<note>").count(), 1);
    }

    #[test]
    fn test_same_seed_same_document() {
        let req = request(4, 3);
        let a = compose(&req, &mut StdRng::seed_from_u64(99));
        let b = compose(&req, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_measure_and_beat_counts(bars in 1u32..24, beats in 1u32..12, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let doc = compose(&request(bars, beats), &mut rng);

            prop_assert_eq!(doc.measures.len(), bars as usize);
            for measure in &doc.measures {
                prop_assert_eq!(measure.events.len(), beats as usize);
            }
            prop_assert_eq!(doc.measures.iter().filter(|m| m.attributes.is_some()).count(), 1);
            prop_assert!(doc.measures[0].attributes.is_some());

            let xml = doc.render(&XmlWriter::default(), date()).unwrap();
            prop_assert_eq!(xml.matches("<measure ").count(), bars as usize);
            prop_assert_eq!(xml.matches("<note>").count(), (bars * beats) as usize);
            prop_assert_eq!(xml.matches("<attributes>").count(), 1);
        }
    }
}
