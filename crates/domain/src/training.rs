use derive_more::{Display, Into};

/// Number of repetitions of a set.
///
/// Any input is accepted. Values that are not a finite non-negative number are stored as zero,
/// fractions are truncated.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn coerce(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Self(value.trunc() as u32)
        } else {
            Self(0)
        }
    }

    #[must_use]
    pub fn from_input(value: &str) -> Self {
        parse_number(value).map_or(Self(0), Self::coerce)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Reps {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Weight of a set.
///
/// Any input is accepted. Values that are not a finite non-negative number are stored as zero.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self::coerce(f64::from(value))
    }

    #[must_use]
    pub fn coerce(value: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let value = value as f32;
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self(0.0)
        }
    }

    #[must_use]
    pub fn from_input(value: &str) -> Self {
        parse_number(value).map_or(Self(0.0), Self::coerce)
    }
}

impl From<f32> for Weight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let value = value.replace(',', ".");
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}
