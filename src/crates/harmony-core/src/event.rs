use harmony_musicxml::{Note, Pitch, Step};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    /// Chromatic alteration in semitones
    pub fn alter(self) -> i8 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            '#' => Some(Accidental::Sharp),
            'b' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// One beat slot of a measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteEvent {
    Rest,
    Note {
        step: Step,
        octave: u8,
        accidental: Option<Accidental>,
    },
}

impl NoteEvent {
    pub fn note(step: Step, octave: u8) -> Self {
        NoteEvent::Note {
            step,
            octave,
            accidental: None,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, NoteEvent::Rest)
    }

    /// Alteration in {-1, 0, 1}; 0 for rests and naturals
    pub fn alter(&self) -> i8 {
        match self {
            NoteEvent::Note {
                accidental: Some(acc),
                ..
            } => acc.alter(),
            _ => 0,
        }
    }

    /// One-beat quarter note (or rest) for the score
    pub fn to_note(&self) -> Note {
        match *self {
            NoteEvent::Rest => Note::quarter_rest(),
            NoteEvent::Note {
                step,
                octave,
                accidental,
            } => {
                let pitch = Pitch::new(step, octave);
                let pitch = match accidental {
                    Some(acc) => pitch.with_alter(acc.alter()),
                    None => pitch,
                };
                Note::quarter(pitch)
            }
        }
    }
}

/// Split a note name like "F#" or "Bb" into letter and accidental
pub fn parse_note_name(name: &str) -> Option<(Step, Option<Accidental>)> {
    let mut chars = name.chars();
    let step = Step::from_char(chars.next()?)?;
    let accidental = match chars.next() {
        None => None,
        Some(c) => Some(Accidental::from_suffix(c)?),
    };
    if chars.next().is_some() {
        return None;
    }
    Some((step, accidental))
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmony_musicxml::NoteContent;

    #[test]
    fn test_parse_note_name() {
        assert_eq!(parse_note_name("C"), Some((Step::C, None)));
        assert_eq!(parse_note_name("F#"), Some((Step::F, Some(Accidental::Sharp))));
        assert_eq!(parse_note_name("Bb"), Some((Step::B, Some(Accidental::Flat))));
        assert_eq!(parse_note_name("H"), None);
        assert_eq!(parse_note_name("C##"), None);
        assert_eq!(parse_note_name("Cx"), None);
        assert_eq!(parse_note_name(""), None);
    }

    #[test]
    fn test_alter() {
        assert_eq!(NoteEvent::Rest.alter(), 0);
        assert_eq!(NoteEvent::note(Step::E, 4).alter(), 0);
        let sharp = NoteEvent::Note {
            step: Step::G,
            octave: 3,
            accidental: Some(Accidental::Sharp),
        };
        assert_eq!(sharp.alter(), 1);
    }

    #[test]
    fn test_to_note() {
        let rest = NoteEvent::Rest.to_note();
        assert!(rest.is_rest());
        assert_eq!(rest.duration, 1);

        let flat = NoteEvent::Note {
            step: Step::B,
            octave: 4,
            accidental: Some(Accidental::Flat),
        }
        .to_note();
        match flat.content {
            NoteContent::Pitch(pitch) => {
                assert_eq!(pitch.step, Step::B);
                assert_eq!(pitch.alter, Some(-1));
                assert_eq!(pitch.octave, 4);
            }
            NoteContent::Rest => panic!("expected a pitch"),
        }

        match NoteEvent::note(Step::D, 5).to_note().content {
            NoteContent::Pitch(pitch) => assert_eq!(pitch.alter, None),
            NoteContent::Rest => panic!("expected a pitch"),
        }
    }

    #[test]
    fn test_serialize_deserialize() {
        let event = NoteEvent::Note {
            step: Step::C,
            octave: 4,
            accidental: Some(Accidental::Sharp),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Sharp"));
        let back: NoteEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
