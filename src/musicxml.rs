//! Minimal MusicXML reader for monophonic scores.
//!
//! Only what the pipeline consumes is extracted: a flattened stream of
//! notes and rests with exact quarter-length durations, plus the first key
//! signature. Layout, lyrics, ties and dynamics are ignored.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::PreprocessError;
use crate::model::{Event, KeySignature, Mode, Quarters, Score};

/// File extensions treated as MusicXML when walking a dataset.
pub const EXTENSIONS: [&str; 2] = ["musicxml", "xml"];

pub fn load(path: &Path) -> Result<Score, PreprocessError> {
    let text = fs::read_to_string(path).map_err(|e| PreprocessError::io("reading score", e))?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Score, PreprocessError> {
    let doc =
        Document::parse(text).map_err(|e| PreprocessError::score_parse(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "score-partwise" {
        return Err(PreprocessError::score_parse(format!(
            "unsupported root element <{}>",
            root.tag_name().name()
        )));
    }
    let part = root
        .children()
        .find(|n| n.has_tag_name("part"))
        .ok_or_else(|| PreprocessError::score_parse("no <part> element"))?;

    let mut divisions: Option<i32> = None;
    let mut key_signature: Option<KeySignature> = None;
    let mut events = Vec::new();

    for measure in part.children().filter(|n| n.has_tag_name("measure")) {
        for node in measure.children().filter(Node::is_element) {
            match node.tag_name().name() {
                "attributes" => {
                    if let Some(value) = child_text(node, "divisions") {
                        divisions = Some(parse_number(value, "divisions")?);
                    }
                    // Only the opening key matters; mid-piece changes are rare
                    // in this repertoire and the normalizer works from one key.
                    if key_signature.is_none() {
                        if let Some(key) = node.children().find(|n| n.has_tag_name("key")) {
                            key_signature = Some(parse_key(key)?);
                        }
                    }
                }
                "note" => {
                    let is_grace = node.children().any(|n| n.has_tag_name("grace"));
                    let follows_chord = node.children().any(|n| n.has_tag_name("chord"));
                    if is_grace || follows_chord {
                        // Grace notes have no duration; chord tails collapse
                        // into the single-stream view.
                        continue;
                    }
                    events.push(parse_note(node, divisions)?);
                }
                // backup/forward/direction and friends carry nothing we keep
                _ => {}
            }
        }
    }

    Ok(Score::new(events, key_signature))
}

fn parse_note(node: Node, divisions: Option<i32>) -> Result<Event, PreprocessError> {
    let divisions = divisions
        .ok_or_else(|| PreprocessError::score_parse("<note> before any <divisions>"))?;
    let raw: i32 = child_text(node, "duration")
        .ok_or_else(|| PreprocessError::score_parse("<note> without <duration>"))
        .and_then(|v| parse_number(v, "duration"))?;
    if raw <= 0 || divisions <= 0 {
        return Err(PreprocessError::score_parse(format!(
            "non-positive duration {raw}/{divisions}"
        )));
    }
    let duration = Quarters::new(raw, divisions);

    if node.children().any(|n| n.has_tag_name("rest")) {
        return Ok(Event::Rest { duration });
    }

    let pitch = node
        .children()
        .find(|n| n.has_tag_name("pitch"))
        .ok_or_else(|| PreprocessError::score_parse("<note> without <pitch> or <rest>"))?;
    let step = child_text(pitch, "step")
        .ok_or_else(|| PreprocessError::score_parse("<pitch> without <step>"))?;
    let octave: i32 = child_text(pitch, "octave")
        .ok_or_else(|| PreprocessError::score_parse("<pitch> without <octave>"))
        .and_then(|v| parse_number(v, "octave"))?;
    let alter: i32 = match child_text(pitch, "alter") {
        Some(v) => parse_number(v, "alter")?,
        None => 0,
    };
    let semitone = match step.trim() {
        "C" => 0,
        "D" => 2,
        "E" => 4,
        "F" => 5,
        "G" => 7,
        "A" => 9,
        "B" => 11,
        other => {
            return Err(PreprocessError::score_parse(format!(
                "unknown step {other:?}"
            )))
        }
    };
    let midi = (octave + 1) * 12 + semitone + alter;
    if !(0..=127).contains(&midi) {
        return Err(PreprocessError::score_parse(format!(
            "pitch {step}{octave} (alter {alter}) outside the MIDI range"
        )));
    }
    Ok(Event::Note {
        pitch: midi as u8,
        duration,
    })
}

fn parse_key(key: Node) -> Result<KeySignature, PreprocessError> {
    let fifths: i8 = child_text(key, "fifths")
        .ok_or_else(|| PreprocessError::score_parse("<key> without <fifths>"))
        .and_then(|v| parse_number(v, "fifths"))?;
    let mode = child_text(key, "mode").and_then(Mode::parse);
    Ok(KeySignature { fifths, mode })
}

fn child_text<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    element: &str,
) -> Result<T, PreprocessError> {
    value
        .trim()
        .parse()
        .map_err(|_| PreprocessError::score_parse(format!("bad <{element}> value {value:?}")))
}
