//! Key normalization: every accepted score is transposed to C major or
//! A minor so the model sees one tonal frame of reference.

use crate::error::PreprocessError;
use crate::model::{estimate_key, Key, KeySignature, Mode, Score};

pub fn normalize(score: &Score) -> Result<Score, PreprocessError> {
    let key = resolve_key(score)?;
    let shift = key.shift_to_canonical();
    log::debug!("resolved key {key}, transposing by {shift} semitones");
    let mut normalized = score.transposed(shift)?;
    // The declared signature is stale after transposition; both canonical
    // targets sit at zero on the circle of fifths.
    normalized.key_signature = Some(KeySignature {
        fifths: 0,
        mode: Some(key.mode),
    });
    Ok(normalized)
}

/// A declared major/minor signature wins; a bare sharps/flats count or a
/// missing signature falls back to statistical estimation; a declared
/// church mode has no canonical tonic and fails the score.
fn resolve_key(score: &Score) -> Result<Key, PreprocessError> {
    match score.key_signature {
        Some(KeySignature {
            fifths,
            mode: Some(mode @ (Mode::Major | Mode::Minor)),
        }) => Ok(Key::from_fifths(fifths, mode)),
        Some(KeySignature {
            mode: Some(mode), ..
        }) => Err(PreprocessError::UnsupportedMode { mode }),
        _ => Ok(estimate_key(score)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, Quarters};

    fn note(pitch: u8) -> Event {
        Event::Note {
            pitch,
            duration: Quarters::from_quarters(1),
        }
    }

    fn keyed(fifths: i8, mode: Option<Mode>, events: Vec<Event>) -> Score {
        Score::new(events, Some(KeySignature { fifths, mode }))
    }

    #[test]
    fn declared_major_lands_on_c() {
        // G major melody: G A B.
        let score = keyed(1, Some(Mode::Major), vec![note(67), note(69), note(71)]);
        let normalized = normalize(&score).expect("tonal");
        let pitches: Vec<u8> = normalized
            .events
            .iter()
            .map(|e| match e {
                Event::Note { pitch, .. } => *pitch,
                Event::Rest { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(pitches, vec![72, 74, 76]); // C D E
    }

    #[test]
    fn declared_minor_lands_on_a() {
        // E minor tonic, up a fourth to A.
        let score = keyed(1, Some(Mode::Minor), vec![note(64)]);
        let normalized = normalize(&score).expect("tonal");
        assert_eq!(normalized.events, vec![note(69)]);
    }

    #[test]
    fn modal_scores_are_rejected() {
        let score = keyed(0, Some(Mode::Dorian), vec![note(62)]);
        assert!(matches!(
            normalize(&score),
            Err(PreprocessError::UnsupportedMode { mode: Mode::Dorian })
        ));
    }

    #[test]
    fn fifths_only_signature_falls_back_to_estimation() {
        // Tonic-heavy A minor material under a bare one-sharp signature;
        // estimation should override the written key, not assume E.
        let events = vec![
            Event::Note {
                pitch: 57,
                duration: Quarters::from_quarters(4),
            },
            note(60),
            note(64),
        ];
        let score = keyed(1, None, events.clone());
        let normalized = normalize(&score).expect("estimable");
        // Already on A: estimation found A minor, shift is zero.
        assert_eq!(normalized.events, events);
    }

    #[test]
    fn structure_survives_normalization() {
        let score = keyed(
            2,
            Some(Mode::Major),
            vec![
                note(62),
                Event::Rest {
                    duration: Quarters::new(1, 2),
                },
                note(66),
            ],
        );
        let normalized = normalize(&score).expect("tonal");
        assert_eq!(normalized.events.len(), score.events.len());
        for (before, after) in score.events.iter().zip(&normalized.events) {
            assert_eq!(before.duration(), after.duration());
        }
        assert!(matches!(normalized.events[1], Event::Rest { .. }));
    }
}
