//! Monthly periods and the month names users type or read.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Display language for month names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    It,
}

const MONTHS_EN: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];
const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];
const MONTHS_IT: [&str; 12] = [
    "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio", "agosto",
    "settembre", "ottobre", "novembre", "dicembre",
];

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::It];

    fn months(self) -> &'static [&'static str; 12] {
        match self {
            Self::En => &MONTHS_EN,
            Self::Es => &MONTHS_ES,
            Self::It => &MONTHS_IT,
        }
    }

    /// Capitalized month name, `month` in `1..=12`.
    #[must_use]
    pub fn month_name(self, month: u32) -> String {
        let Some(name) = month
            .checked_sub(1)
            .and_then(|idx| self.months().get(idx as usize))
        else {
            return month.to_string();
        };
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl TryFrom<&str> for Language {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "it" => Ok(Self::It),
            other => Err(EngineError::InvalidPeriod(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}

/// Parses a month typed as a number (`3`, `03`) or a name in any supported
/// language (`march`, `Marzo`).
pub fn parse_month(input: &str) -> Result<u32, EngineError> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        if (1..=12).contains(&number) {
            return Ok(number);
        }
        return Err(EngineError::InvalidPeriod(format!(
            "month out of range: {number}"
        )));
    }

    let lowered = trimmed.to_lowercase();
    Language::ALL
        .iter()
        .find_map(|lang| lang.months().iter().position(|name| *name == lowered))
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| EngineError::InvalidPeriod(format!("unknown month: {trimmed}")))
}

/// A calendar month of a year. Every finance resource is scoped to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month out of range: {month}"
            )));
        }
        if !(1900..=9999).contains(&year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year out of range: {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parses month (number or name) and year.
    pub fn parse(month: &str, year: i32) -> Result<Self, EngineError> {
        Self::new(parse_month(month)?, year)
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period of today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Two-digit month used in resource paths, e.g. `03`.
    #[must_use]
    pub fn month_segment(self) -> String {
        format!("{:02}", self.month)
    }

    /// Human label, e.g. `Marzo 2025`.
    #[must_use]
    pub fn label(self, language: Language) -> String {
        format!("{} {}", language.month_name(self.month), self.year)
    }
}

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_parse_in_every_language() {
        assert_eq!(parse_month("March").unwrap(), 3);
        assert_eq!(parse_month("marzo").unwrap(), 3);
        assert_eq!(parse_month("Diciembre").unwrap(), 12);
        assert_eq!(parse_month("settembre").unwrap(), 9);
        assert_eq!(parse_month("07").unwrap(), 7);
        assert!(parse_month("13").is_err());
        assert!(parse_month("brumaire").is_err());
    }

    #[test]
    fn navigation_wraps_years() {
        let dec = Period::new(12, 2024).unwrap();
        assert_eq!(dec.next(), Period::new(1, 2025).unwrap());
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(Period::new(1, 2025).unwrap().prev(), dec);
    }

    #[test]
    fn segments_and_labels() {
        let period = Period::new(3, 2025).unwrap();
        assert_eq!(period.month_segment(), "03");
        assert_eq!(period.label(Language::It), "Marzo 2025");
        assert_eq!(period.label(Language::En), "March 2025");
        assert_eq!(period.to_string(), "03/2025");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Period::new(0, 2025).is_err());
        assert!(Period::new(5, 12).is_err());
    }
}
