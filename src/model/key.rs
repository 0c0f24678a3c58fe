//! Key signatures, resolved keys and statistical key estimation.

use std::fmt;

use crate::model::score::{Event, Score};

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Mode as declared by a score. Only major and minor can be normalized to a
/// canonical tonic; the church modes are carried so the pipeline can reject
/// them explicitly instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// Parses a MusicXML `<mode>` value. `ionian` is plain major; anything
    /// unrecognized (e.g. `none`) reads as "no mode declared".
    pub fn parse(value: &str) -> Option<Mode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "major" | "ionian" => Some(Mode::Major),
            "minor" => Some(Mode::Minor),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" => Some(Mode::Aeolian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        };
        f.write_str(name)
    }
}

/// The key declaration as it appears in a score: a position on the circle
/// of fifths, with the mode only sometimes spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    pub fifths: i8,
    pub mode: Option<Mode>,
}

/// A fully resolved key: tonic pitch class (C = 0) and a tonal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub tonic: u8,
    pub mode: Mode,
}

impl Key {
    /// Tonic from a circle-of-fifths position: each sharp moves the major
    /// tonic up a fifth; the relative minor sits three semitones below.
    pub fn from_fifths(fifths: i8, mode: Mode) -> Key {
        let major_tonic = (i32::from(fifths) * 7).rem_euclid(12) as u8;
        let tonic = match mode {
            Mode::Minor => (major_tonic + 9) % 12,
            _ => major_tonic,
        };
        Key { tonic, mode }
    }

    /// Signed semitone shift taking this key to C major / A minor, centered
    /// to [-6, +5] so melodies stay near their original register.
    pub fn shift_to_canonical(&self) -> i8 {
        let target: i16 = match self.mode {
            Mode::Minor => 9,
            _ => 0,
        };
        let up = (target - i16::from(self.tonic)).rem_euclid(12);
        (if up > 6 { up - 12 } else { up }) as i8
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", PITCH_NAMES[usize::from(self.tonic % 12)], self.mode)
    }
}

// Krumhansl-Schmuckler tonal hierarchy profiles, indexed from the tonic.
const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];
const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Krumhansl-Schmuckler key estimation: correlate the duration-weighted
/// pitch-class histogram against both profiles at every transposition and
/// keep the best match. Candidate order is fixed, so ties resolve the same
/// way on every run.
pub fn estimate_key(score: &Score) -> Key {
    let mut weights = [0f64; 12];
    for event in &score.events {
        if let Event::Note { pitch, duration } = *event {
            weights[usize::from(pitch % 12)] += duration.as_f64();
        }
    }
    if weights.iter().all(|w| *w == 0.0) {
        // No pitched material to weigh; the choice is moot for an all-rest
        // score since transposition only touches notes.
        return Key {
            tonic: 0,
            mode: Mode::Major,
        };
    }

    let mut best_r = f64::NEG_INFINITY;
    let mut best = Key {
        tonic: 0,
        mode: Mode::Major,
    };
    for (mode, profile) in [(Mode::Major, &MAJOR_PROFILE), (Mode::Minor, &MINOR_PROFILE)] {
        for tonic in 0u8..12 {
            let mut rotated = [0f64; 12];
            for (pc, slot) in rotated.iter_mut().enumerate() {
                *slot = profile[(pc + 12 - usize::from(tonic)) % 12];
            }
            let r = correlation(&weights, &rotated);
            if r > best_r {
                best_r = r;
                best = Key { tonic, mode };
            }
        }
    }
    log::debug!("estimated key {best} (r = {best_r:.3})");
    best
}

fn correlation(x: &[f64; 12], y: &[f64; 12]) -> f64 {
    let mean_x = x.iter().sum::<f64>() / 12.0;
    let mean_y = y.iter().sum::<f64>() / 12.0;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..12 {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        0.0
    } else {
        cov / (var_x * var_y).sqrt()
    }
}
