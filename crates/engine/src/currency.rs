use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO currency code accepted for expenses and income.
///
/// The set is closed: the backend only stores these three codes. Which of
/// them a user is offered, and which one is the reporting currency, is a
/// configuration decision (see `ExchangeRates::reporting`).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Mxn,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Currency; 3] = [Currency::Eur, Currency::Usd, Currency::Mxn];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Mxn => "MXN",
        }
    }

    /// Symbol appended to rounded amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "US$",
            Currency::Mxn => "MX$",
        }
    }

    /// Returns the currency following `self` in `options`, wrapping around.
    ///
    /// Used by forms that cycle through the configured currencies. When
    /// `self` is not part of `options` the first option is returned.
    #[must_use]
    pub fn cycle(self, options: &[Currency]) -> Currency {
        match options.iter().position(|c| *c == self) {
            Some(idx) => options[(idx + 1) % options.len()],
            None => options.first().copied().unwrap_or(self),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "MXN" => Ok(Currency::Mxn),
            other => Err(EngineError::UnsupportedCurrency(other.to_string())),
        }
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from(" mxn ").unwrap(), Currency::Mxn);
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(
            Currency::try_from("GBP"),
            Err(EngineError::UnsupportedCurrency("GBP".to_string()))
        );
    }

    #[test]
    fn cycle_wraps_and_recovers() {
        let options = [Currency::Eur, Currency::Mxn];
        assert_eq!(Currency::Eur.cycle(&options), Currency::Mxn);
        assert_eq!(Currency::Mxn.cycle(&options), Currency::Eur);
        assert_eq!(Currency::Usd.cycle(&options), Currency::Eur);
        assert_eq!(Currency::Usd.cycle(&[]), Currency::Usd);
    }

    #[test]
    fn serializes_as_uppercase_code() {
        assert_eq!(serde_json::to_string(&Currency::Mxn).unwrap(), "\"MXN\"");
    }
}
