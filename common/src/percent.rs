//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;

/// Percentage between `0` and `100` inclusive.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred percent.
    pub const FULL: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a new [`Percent`] if the provided value is within `0..=100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Calculates which [`Percent`] the `part` is of the `whole`, rounded to
    /// two decimal places and saturated at `100`.
    ///
    /// An empty `whole` is [`Percent::ZERO`].
    #[must_use]
    pub fn of(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let ratio = Decimal::from(part.min(whole)) * Decimal::ONE_HUNDRED
            / Decimal::from(whole);
        Self(ratio.round_dp(2).normalize())
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim_end_matches('%'))
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use super::Percent;

    #[test]
    fn of_ratio() {
        assert_eq!(Percent::of(1, 4).to_string(), "25");
        assert_eq!(Percent::of(1, 3).to_string(), "33.33");
        assert_eq!(Percent::of(0, 0), Percent::ZERO);
        assert_eq!(Percent::of(5, 4), Percent::FULL);
    }

    #[test]
    fn from_str() {
        assert_eq!("50%".parse::<Percent>().unwrap().to_string(), "50");
        assert!("101".parse::<Percent>().is_err());
        assert!("-1".parse::<Percent>().is_err());
    }
}
