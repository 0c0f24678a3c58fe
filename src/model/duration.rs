use std::fmt;
use std::ops::Add;

use num_rational::Rational32;

/// A duration in quarter-note lengths, kept as an exact rational so the
/// duration filter and the time-step encoder can never disagree on
/// precision the way float comparisons do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarters(Rational32);

impl Quarters {
    pub fn new(numer: i32, denom: i32) -> Self {
        Self(Rational32::new(numer, denom))
    }

    pub fn from_quarters(quarters: i32) -> Self {
        Self(Rational32::from_integer(quarters))
    }

    pub fn zero() -> Self {
        Self::from_quarters(0)
    }

    /// A 16th note, the quantization unit of the whole pipeline.
    pub fn sixteenth() -> Self {
        Self::new(1, 4)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Rational32::from_integer(0)
    }

    /// How many whole `step`s this duration spans, if it divides exactly.
    pub fn exact_steps(self, step: Quarters) -> Option<u32> {
        let quotient = self.0 / step.0;
        if quotient.is_integer() && quotient >= Rational32::from_integer(0) {
            Some(quotient.to_integer() as u32)
        } else {
            None
        }
    }

    pub fn as_f64(self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }
}

impl Add for Quarters {
    type Output = Quarters;

    fn add(self, rhs: Quarters) -> Quarters {
        Quarters(self.0 + rhs.0)
    }
}

impl fmt::Display for Quarters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

/// The durations a score may use and still enter the corpus: 16th through
/// whole notes plus their common dotted forms. Every value is a whole
/// multiple of [`Quarters::sixteenth`].
pub fn acceptable_durations() -> Vec<Quarters> {
    vec![
        Quarters::new(1, 4),
        Quarters::new(1, 2),
        Quarters::new(3, 4),
        Quarters::from_quarters(1),
        Quarters::new(3, 2),
        Quarters::from_quarters(2),
        Quarters::from_quarters(3),
        Quarters::from_quarters(4),
    ]
}
