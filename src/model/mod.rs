pub mod duration;
pub mod key;
pub mod score;

pub use duration::{acceptable_durations, Quarters};
pub use key::{estimate_key, Key, KeySignature, Mode};
pub use score::{Event, Score};
