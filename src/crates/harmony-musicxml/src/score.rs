//! Typed `score-partwise` document
//!
//! The tree mirrors the MusicXML elements an exercise uses. Each node writes
//! itself in schema order through [`WriteXml`], and [`ScorePartwise::to_xml`]
//! validates and serializes it in one step.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::pitch::{NoteType, Step};
use crate::writer::{WriteXml, XmlDocument, XmlWriter};
use crate::{Result, XmlError};

pub const MUSICXML_VERSION: &str = "3.1";

/// Body of the partwise `<!DOCTYPE ...>` declaration
pub const PARTWISE_DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

pub const CREATOR_NAME: &str = "HarmonyHub AI";
pub const SOFTWARE_NAME: &str = "HarmonyHub";

/// A pitched sound: step, optional chromatic alteration, octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub step: Step,
    pub alter: Option<i8>,
    pub octave: u8,
}

impl Pitch {
    pub fn new(step: Step, octave: u8) -> Self {
        Pitch {
            step,
            alter: None,
            octave,
        }
    }

    pub fn with_alter(mut self, alter: i8) -> Self {
        self.alter = Some(alter);
        self
    }
}

impl WriteXml for Pitch {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        // Schema order is step, alter, octave
        doc.element("pitch", &[], |doc| {
            doc.leaf("step", self.step)?;
            if let Some(alter) = self.alter {
                doc.leaf("alter", alter)?;
            }
            doc.leaf("octave", self.octave)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteContent {
    Pitch(Pitch),
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub content: NoteContent,
    /// Duration in divisions
    pub duration: u32,
    pub note_type: NoteType,
}

impl Note {
    /// One-division quarter note
    pub fn quarter(pitch: Pitch) -> Self {
        Note {
            content: NoteContent::Pitch(pitch),
            duration: 1,
            note_type: NoteType::Quarter,
        }
    }

    /// One-division quarter rest
    pub fn quarter_rest() -> Self {
        Note {
            content: NoteContent::Rest,
            duration: 1,
            note_type: NoteType::Quarter,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.content, NoteContent::Rest)
    }
}

impl WriteXml for Note {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        doc.element("note", &[], |doc| {
            match &self.content {
                NoteContent::Pitch(pitch) => doc.write(pitch)?,
                NoteContent::Rest => doc.empty("rest")?,
            }
            doc.leaf("duration", self.duration)?;
            doc.leaf("type", self.note_type)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clef {
    /// MusicXML clef sign: "G", "F", "C", "percussion", "TAB"
    pub sign: &'static str,
    pub line: u8,
}

impl Clef {
    /// G clef on the second line
    pub fn treble() -> Self {
        Clef { sign: "G", line: 2 }
    }
}

/// Measure attributes: divisions, key, time and clef
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub divisions: u32,
    /// Signed count of sharps (positive) or flats (negative)
    pub fifths: i8,
    pub beats: u32,
    pub beat_type: u32,
    pub clef: Clef,
}

impl Attributes {
    /// One division per quarter, treble clef
    pub fn new(fifths: i8, beats: u32, beat_type: u32) -> Self {
        Attributes {
            divisions: 1,
            fifths,
            beats,
            beat_type,
            clef: Clef::treble(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.divisions == 0 {
            return Err(XmlError::OutOfRange("divisions must be positive".into()));
        }
        if !(-7..=7).contains(&self.fifths) {
            return Err(XmlError::OutOfRange(format!("fifths {}", self.fifths)));
        }
        if self.beats == 0 || self.beat_type == 0 {
            return Err(XmlError::OutOfRange(format!(
                "time signature {}/{}",
                self.beats, self.beat_type
            )));
        }
        Ok(())
    }

}

impl WriteXml for Attributes {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        doc.element("attributes", &[], |doc| {
            doc.leaf("divisions", self.divisions)?;
            doc.element("key", &[], |doc| doc.leaf("fifths", self.fifths))?;
            doc.element("time", &[], |doc| {
                doc.leaf("beats", self.beats)?;
                doc.leaf("beat-type", self.beat_type)
            })?;
            doc.element("clef", &[], |doc| {
                doc.leaf("sign", self.clef.sign)?;
                doc.leaf("line", self.clef.line)
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub number: u32,
    pub attributes: Option<Attributes>,
    pub notes: Vec<Note>,
}

impl Measure {
    pub fn new(number: u32) -> Self {
        Measure {
            number,
            attributes: None,
            notes: Vec::new(),
        }
    }
}

impl WriteXml for Measure {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        let number = self.number.to_string();
        doc.element("measure", &[("number", number.as_str())], |doc| {
            if let Some(attributes) = &self.attributes {
                doc.write(attributes)?;
            }
            for note in &self.notes {
                doc.write(note)?;
            }
            Ok(())
        })
    }
}

/// A part: its `score-part` entry (id, name) and its measures
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: impl Into<String>, measures: Vec<Measure>) -> Self {
        Part {
            id: id.into(),
            name: name.into(),
            measures,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.measures.is_empty() {
            return Err(XmlError::EmptyPart(self.id.clone()));
        }

        for (idx, measure) in self.measures.iter().enumerate() {
            let expected = idx as u32 + 1;
            if measure.number != expected {
                return Err(XmlError::MeasureOutOfSequence {
                    part: self.id.clone(),
                    expected,
                    found: measure.number,
                });
            }
            if measure.notes.is_empty() {
                return Err(XmlError::EmptyMeasure {
                    part: self.id.clone(),
                    number: measure.number,
                });
            }
            if let Some(attributes) = &measure.attributes {
                attributes.validate()?;
            }
            for note in &measure.notes {
                if note.duration == 0 {
                    return Err(XmlError::OutOfRange(format!(
                        "zero duration in measure {}",
                        measure.number
                    )));
                }
                if let NoteContent::Pitch(pitch) = note.content {
                    if pitch.octave > 9 {
                        return Err(XmlError::OutOfRange(format!("octave {}", pitch.octave)));
                    }
                    if let Some(alter) = pitch.alter {
                        if !(-2..=2).contains(&alter) {
                            return Err(XmlError::OutOfRange(format!("alter {}", alter)));
                        }
                    }
                }
            }
        }

        if self.measures[0].attributes.is_none() {
            return Err(XmlError::MissingAttributes(self.id.clone()));
        }

        Ok(())
    }
}

impl WriteXml for Part {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        doc.element("part", &[("id", self.id.as_str())], |doc| {
            for measure in &self.measures {
                doc.write(measure)?;
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creator {
    /// Value of the `type` attribute, e.g. "composer"
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub software: String,
    pub encoding_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub creator: Creator,
    pub encoding: Encoding,
}

impl Identification {
    /// HarmonyHub creator and software, encoded on `date`
    pub fn harmony_hub(date: NaiveDate) -> Self {
        Identification {
            creator: Creator {
                kind: "composer".to_string(),
                name: CREATOR_NAME.to_string(),
            },
            encoding: Encoding {
                software: SOFTWARE_NAME.to_string(),
                encoding_date: date,
            },
        }
    }

}

impl WriteXml for Identification {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        doc.element("identification", &[], |doc| {
            doc.element("creator", &[("type", self.creator.kind.as_str())], |doc| {
                doc.text(&self.creator.name)
            })?;
            doc.element("encoding", &[], |doc| {
                doc.leaf("software", &self.encoding.software)?;
                doc.leaf("encoding-date", self.encoding.encoding_date.format("%Y-%m-%d"))
            })
        })
    }
}

/// Root of a partwise score
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePartwise {
    pub work_title: String,
    pub identification: Identification,
    pub parts: Vec<Part>,
}

impl ScorePartwise {
    pub fn new(work_title: impl Into<String>, identification: Identification) -> Self {
        ScorePartwise {
            work_title: work_title.into(),
            identification,
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Check the structural rules a renderer relies on
    pub fn validate(&self) -> Result<()> {
        if self.parts.is_empty() {
            return Err(XmlError::NoParts);
        }

        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.id.as_str()) {
                return Err(XmlError::DuplicatePartId(part.id.clone()));
            }
            part.validate()?;
        }

        Ok(())
    }

    /// Validate, then serialize with declaration and partwise doctype
    pub fn to_xml(&self, writer: &XmlWriter) -> Result<String> {
        self.validate()?;
        let mut doc = writer.document(Some(PARTWISE_DOCTYPE))?;
        doc.write(self)?;
        doc.finish()
    }
}

impl WriteXml for ScorePartwise {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()> {
        doc.element("score-partwise", &[("version", MUSICXML_VERSION)], |doc| {
            doc.element("work", &[], |doc| doc.leaf("work-title", &self.work_title))?;
            doc.write(&self.identification)?;
            doc.element("part-list", &[], |doc| {
                for part in &self.parts {
                    doc.element("score-part", &[("id", part.id.as_str())], |doc| {
                        doc.leaf("part-name", &part.name)
                    })?;
                }
                Ok(())
            })?;
            for part in &self.parts {
                doc.write(part)?;
            }
            Ok(())
        })
    }
}
