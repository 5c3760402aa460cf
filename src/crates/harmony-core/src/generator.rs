//! Per-beat note generation
//!
//! Each beat slot is a rest with fixed probability, otherwise a note drawn
//! according to the exercise's focus pattern.

use harmony_musicxml::Step;
use rand::Rng;
use tracing::warn;

use crate::event::{parse_note_name, Accidental, NoteEvent};
use crate::request::FocusType;
use crate::tables::{find_interval, find_scale, interval_pattern, scale_pattern};

pub const REST_PROBABILITY: f64 = 0.2;
pub const ACCIDENTAL_PROBABILITY: f64 = 0.3;

/// Octaves for interval exercises
pub const INTERVAL_OCTAVES: [u8; 2] = [3, 4];
/// Octaves for everything else
pub const OCTAVES: [u8; 3] = [3, 4, 5];

pub const MIN_OCTAVE: u8 = 3;
pub const MAX_OCTAVE: u8 = 5;

/// Focus type and value resolved against the pattern tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusPattern {
    /// Offsets of the interval's two notes. Only one note is emitted per
    /// slot; the offsets are not applied yet.
    Interval([u8; 2]),
    Scale(&'static [&'static str]),
    /// Arpeggios, rhythm and unrecognized focus types
    Free,
}

impl FocusPattern {
    /// Look up the pattern; unknown values fall back to thirds / major
    pub fn resolve(focus_type: &FocusType, focus_value: &str) -> Self {
        match focus_type {
            FocusType::Intervals => {
                if find_interval(focus_value).is_none() {
                    warn!(focus_value, "Unknown interval, using thirds");
                }
                FocusPattern::Interval(interval_pattern(focus_value))
            }
            FocusType::Scales => {
                if find_scale(focus_value).is_none() {
                    warn!(focus_value, "Unknown scale, using major");
                }
                FocusPattern::Scale(scale_pattern(focus_value))
            }
            _ => FocusPattern::Free,
        }
    }

    /// Draw the event for one beat slot
    pub fn next_event<R: Rng + ?Sized>(&self, rng: &mut R) -> NoteEvent {
        if rng.gen::<f64>() < REST_PROBABILITY {
            return NoteEvent::Rest;
        }

        match self {
            FocusPattern::Interval(_) => {
                let step = random_step(rng);
                let octave = pick(rng, &INTERVAL_OCTAVES);
                let accidental = if rng.gen::<f64>() < ACCIDENTAL_PROBABILITY {
                    Some(if rng.gen::<bool>() {
                        Accidental::Sharp
                    } else {
                        Accidental::Flat
                    })
                } else {
                    None
                };
                NoteEvent::Note {
                    step,
                    octave,
                    accidental,
                }
            }
            FocusPattern::Scale(notes) => {
                let name = pick(rng, notes);
                // Table entries are all valid note names
                let (step, accidental) = parse_note_name(name).unwrap_or((Step::C, None));
                NoteEvent::Note {
                    step,
                    octave: pick(rng, &OCTAVES),
                    accidental,
                }
            }
            FocusPattern::Free => NoteEvent::note(random_step(rng), pick(rng, &OCTAVES)),
        }
    }
}

/// Resolve the focus and draw one event
pub fn next_event<R: Rng + ?Sized>(
    focus_type: &FocusType,
    focus_value: &str,
    rng: &mut R,
) -> NoteEvent {
    FocusPattern::resolve(focus_type, focus_value).next_event(rng)
}

fn random_step<R: Rng + ?Sized>(rng: &mut R) -> Step {
    pick(rng, &Step::ALL)
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 10_000;

    fn sample(pattern: &FocusPattern, seed: u64) -> Vec<NoteEvent> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..SAMPLES).map(|_| pattern.next_event(&mut rng)).collect()
    }

    fn rest_rate(events: &[NoteEvent]) -> f64 {
        events.iter().filter(|e| e.is_rest()).count() as f64 / events.len() as f64
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            FocusPattern::resolve(&FocusType::Intervals, "fifths"),
            FocusPattern::Interval([0, 7])
        );
        assert_eq!(
            FocusPattern::resolve(&FocusType::Intervals, "ninths"),
            FocusPattern::Interval([0, 4])
        );
        assert_eq!(
            FocusPattern::resolve(&FocusType::Scales, "whole-tone"),
            FocusPattern::resolve(&FocusType::Scales, "major")
        );
        assert_eq!(FocusPattern::resolve(&FocusType::Arpeggios, "major"), FocusPattern::Free);
        assert_eq!(
            FocusPattern::resolve(&FocusType::Other("tone".into()), "x"),
            FocusPattern::Free
        );
    }

    #[test]
    fn test_rest_rate_converges() {
        for (seed, pattern) in [
            FocusPattern::resolve(&FocusType::Intervals, "thirds"),
            FocusPattern::resolve(&FocusType::Scales, "chromatic"),
            FocusPattern::Free,
        ]
        .iter()
        .enumerate()
        {
            let rate = rest_rate(&sample(pattern, seed as u64));
            assert!((rate - REST_PROBABILITY).abs() < 0.02, "rest rate {}", rate);
        }
    }

    #[test]
    fn test_interval_notes_in_bounds() {
        let events = sample(&FocusPattern::Interval([0, 4]), 11);
        let notes: Vec<_> = events.iter().filter(|e| !e.is_rest()).collect();

        for event in &notes {
            match event {
                NoteEvent::Note { octave, .. } => assert!(INTERVAL_OCTAVES.contains(octave)),
                NoteEvent::Rest => unreachable!(),
            }
            assert!((-1..=1).contains(&event.alter()));
        }

        // Roughly 30% of notes carry an accidental, split between sharps and flats
        let altered = notes.iter().filter(|e| e.alter() != 0).count() as f64 / notes.len() as f64;
        assert!((altered - ACCIDENTAL_PROBABILITY).abs() < 0.03, "altered {}", altered);
        assert!(notes.iter().any(|e| e.alter() == 1));
        assert!(notes.iter().any(|e| e.alter() == -1));
    }

    #[test]
    fn test_scale_notes_come_from_scale() {
        let minor = scale_pattern("minor");
        for event in sample(&FocusPattern::Scale(minor), 5) {
            if let NoteEvent::Note {
                step,
                octave,
                accidental,
            } = event
            {
                assert!(minor.contains(&step.as_str()));
                assert_eq!(accidental, None);
                assert!((MIN_OCTAVE..=MAX_OCTAVE).contains(&octave));
            }
        }
    }

    #[test]
    fn test_chromatic_scale_produces_sharps_only() {
        let events = sample(&FocusPattern::Scale(scale_pattern("chromatic")), 3);
        assert!(events.iter().any(|e| e.alter() == 1));
        assert!(events.iter().all(|e| e.alter() >= 0));
    }

    #[test]
    fn test_free_notes_are_natural() {
        let events = sample(&FocusPattern::Free, 9);
        for event in &events {
            if let NoteEvent::Note {
                octave, accidental, ..
            } = event
            {
                assert!(OCTAVES.contains(octave));
                assert_eq!(*accidental, None);
            }
        }
        // Every step and octave shows up over a large sample
        for step in Step::ALL {
            assert!(events
                .iter()
                .any(|e| matches!(e, NoteEvent::Note { step: s, .. } if *s == step)));
        }
        for octave in OCTAVES {
            assert!(events
                .iter()
                .any(|e| matches!(e, NoteEvent::Note { octave: o, .. } if *o == octave)));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = sample(&FocusPattern::Free, 42);
        let b = sample(&FocusPattern::Free, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_next_event_wrapper() {
        let mut rng = StdRng::seed_from_u64(1);
        let events: Vec<_> = (0..200)
            .map(|_| next_event(&FocusType::Scales, "major", &mut rng))
            .collect();
        assert!(events.iter().all(|e| e.alter() == 0));
    }
}
