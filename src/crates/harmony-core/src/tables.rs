//! Static lookup tables: key signatures, interval patterns, scale patterns
//!
//! Lookups that miss fall back to documented defaults instead of failing.

/// Key name to signed fifths (sharps positive, flats negative)
pub const KEY_SIGNATURES: &[(&str, i8)] = &[
    // Major keys
    ("C", 0),
    ("G", 1),
    ("D", 2),
    ("A", 3),
    ("E", 4),
    ("B", 5),
    ("F#", 6),
    ("Gb", -6),
    ("Db", -5),
    ("Ab", -4),
    ("Eb", -3),
    ("Bb", -2),
    ("F", -1),
    // Minor keys
    ("Am", 0),
    ("Em", 1),
    ("Bm", 2),
    ("F#m", 3),
    ("C#m", 4),
    ("G#m", 5),
    ("D#m", 6),
    ("Ebm", -6),
    ("Bbm", -5),
    ("Fm", -4),
    ("Cm", -3),
    ("Gm", -2),
    ("Dm", -1),
];

/// Interval name to the step offsets of its two notes
pub const INTERVAL_PATTERNS: &[(&str, [u8; 2])] = &[
    ("seconds", [0, 2]),
    ("thirds", [0, 4]),
    ("fourths", [0, 5]),
    ("fifths", [0, 7]),
];

pub const DEFAULT_INTERVAL: &str = "thirds";

/// Scale name to its ordered note names
pub const SCALE_PATTERNS: &[(&str, &[&str])] = &[
    ("major", &["C", "D", "E", "F", "G", "A", "B"]),
    ("minor", &["A", "B", "C", "D", "E", "F", "G"]),
    (
        "chromatic",
        &["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"],
    ),
];

pub const DEFAULT_SCALE: &str = "major";

pub fn find_key_fifths(key: &str) -> Option<i8> {
    KEY_SIGNATURES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, fifths)| fifths)
}

/// Fifths for a key name, 0 (C major / A minor) when unknown
pub fn key_fifths(key: &str) -> i8 {
    find_key_fifths(key).unwrap_or(0)
}

pub fn find_interval(name: &str) -> Option<[u8; 2]> {
    INTERVAL_PATTERNS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, offsets)| offsets)
}

/// Interval offsets, thirds when unknown
pub fn interval_pattern(name: &str) -> [u8; 2] {
    find_interval(name).unwrap_or([0, 4])
}

pub fn find_scale(name: &str) -> Option<&'static [&'static str]> {
    SCALE_PATTERNS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, notes)| notes)
}

/// Scale note names, major when unknown
pub fn scale_pattern(name: &str) -> &'static [&'static str] {
    find_scale(name).unwrap_or(SCALE_PATTERNS[0].1)
}
