//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::define_kind;

/// Amount of money in some [`Currency`].
///
/// Travels over the wire as `<amount><CURRENCY>`, e.g. `1500.50NGN`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        let code = currency.to_string().to_uppercase();
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(whole) => write!(f, "{whole}{code}"),
            None => write!(f, "{amount}{code}"),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency = Currency::from_str(&currency.to_lowercase())
            .map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Pound Sterling."]
        Gbp = 3,

        #[doc = "Nigerian Naira."]
        Ngn = 4,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("1500.50NGN").unwrap(),
            Money {
                amount: decimal("1500.50"),
                currency: Currency::Ngn,
            },
        );
        assert_eq!(
            Money::from_str("99GBP").unwrap(),
            Money {
                amount: decimal("99"),
                currency: Currency::Gbp,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());
        assert!(Money::from_str("abcUSD").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("1500.50"),
                currency: Currency::Ngn,
            }
            .to_string(),
            "1500.50NGN",
        );
        assert_eq!(
            Money {
                amount: decimal("200.00"),
                currency: Currency::Usd,
            }
            .to_string(),
            "200USD",
        );
    }

    #[test]
    fn travels_as_string() {
        let price: Money = serde_json::from_str(r#""750.25EUR""#).unwrap();

        assert_eq!(price.currency, Currency::Eur);
        assert_eq!(serde_json::to_string(&price).unwrap(), r#""750.25EUR""#);
        assert!(serde_json::from_str::<Money>("750").is_err());
    }
}
