use crate::error::PreprocessError;
use crate::model::duration::Quarters;
use crate::model::key::KeySignature;

/// One note or rest in a flattened, monophonic event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Note { pitch: u8, duration: Quarters },
    Rest { duration: Quarters },
}

impl Event {
    pub fn duration(&self) -> Quarters {
        match *self {
            Event::Note { duration, .. } | Event::Rest { duration } => duration,
        }
    }
}

/// A parsed score: time-ordered events plus whatever key the source
/// declared. Scores are never mutated; normalization returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub events: Vec<Event>,
    pub key_signature: Option<KeySignature>,
}

impl Score {
    pub fn new(events: Vec<Event>, key_signature: Option<KeySignature>) -> Self {
        Self {
            events,
            key_signature,
        }
    }

    pub fn total_quarters(&self) -> Quarters {
        self.events
            .iter()
            .fold(Quarters::zero(), |acc, e| acc + e.duration())
    }

    /// Shifts every pitched event by `semitones`, leaving rests and all
    /// durations untouched.
    pub fn transposed(&self, semitones: i8) -> Result<Score, PreprocessError> {
        let mut events = Vec::with_capacity(self.events.len());
        for event in &self.events {
            events.push(match *event {
                Event::Note { pitch, duration } => {
                    let moved = i16::from(pitch) + i16::from(semitones);
                    if !(0..=127).contains(&moved) {
                        return Err(PreprocessError::PitchOutOfRange {
                            pitch,
                            shift: semitones,
                        });
                    }
                    Event::Note {
                        pitch: moved as u8,
                        duration,
                    }
                }
                rest @ Event::Rest { .. } => rest,
            });
        }
        Ok(Score {
            events,
            key_signature: self.key_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarters(n: i32) -> Quarters {
        Quarters::from_quarters(n)
    }

    #[test]
    fn transposition_moves_notes_and_skips_rests() {
        let score = Score::new(
            vec![
                Event::Note {
                    pitch: 62,
                    duration: quarters(1),
                },
                Event::Rest {
                    duration: quarters(2),
                },
            ],
            None,
        );
        let up = score.transposed(-2).expect("in range");
        assert_eq!(
            up.events,
            vec![
                Event::Note {
                    pitch: 60,
                    duration: quarters(1)
                },
                Event::Rest {
                    duration: quarters(2)
                },
            ]
        );
    }

    #[test]
    fn transposition_out_of_midi_range_fails() {
        let score = Score::new(
            vec![Event::Note {
                pitch: 2,
                duration: quarters(1),
            }],
            None,
        );
        assert!(matches!(
            score.transposed(-5),
            Err(PreprocessError::PitchOutOfRange { pitch: 2, shift: -5 })
        ));
    }

    #[test]
    fn total_duration_sums_all_events() {
        let score = Score::new(
            vec![
                Event::Note {
                    pitch: 60,
                    duration: Quarters::new(3, 2),
                },
                Event::Rest {
                    duration: Quarters::new(1, 2),
                },
            ],
            None,
        );
        assert_eq!(score.total_quarters(), quarters(2));
    }
}
