use clap::Parser;
use engine::{Currency, Language};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/bilancio.toml";

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Alimentazione",
    "Affitto",
    "Prestiti",
    "Formazione",
    "Trasporto",
    "Intrattenimento",
    "Salute",
    "Altro",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token for writes. Without it the tracker is read-only.
    pub token: Option<String>,
    pub reporting_currency: Currency,
    /// Currencies offered in forms, in cycling order.
    pub currencies: Vec<Currency>,
    pub categories: Vec<String>,
    pub language: Language,
    pub log_level: String,
    pub log_file: String,
    pub state_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            reporting_currency: Currency::Eur,
            currencies: Currency::ALL.to_vec(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            language: Language::En,
            log_level: "info".to_string(),
            log_file: "config/bilancio_tui.log".to_string(),
            state_path: "config/bilancio_state.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Fills lists left empty by the config file with the defaults.
    fn normalized(mut self) -> Self {
        if self.currencies.is_empty() {
            self.currencies = Currency::ALL.to_vec();
        }
        if !self.currencies.contains(&self.reporting_currency) {
            self.currencies.insert(0, self.reporting_currency);
        }
        self.categories.retain(|category| !category.trim().is_empty());
        if self.categories.is_empty() {
            self.categories = DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect();
        }
        self
    }
}

#[derive(Debug, Parser)]
#[command(name = "bilancio-tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override reporting currency (EUR, USD, MXN).
    #[arg(long)]
    reporting_currency: Option<Currency>,
    /// Override display language (en, es, it).
    #[arg(long)]
    language: Option<String>,
    /// Override log level filter.
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BILANCIO_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(currency) = args.reporting_currency {
        settings.reporting_currency = currency;
    }
    if let Some(language) = args.language {
        settings.language = Language::try_from(language.as_str())
            .map_err(|err| config::ConfigError::Message(err.to_string()))?;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    Ok(settings.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                base_url = "http://finance.local"
                reporting_currency = "MXN"
                currencies = ["USD"]
                language = "es"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let settings = settings.normalized();

        assert_eq!(settings.base_url, "http://finance.local");
        assert_eq!(settings.reporting_currency, Currency::Mxn);
        assert_eq!(settings.currencies, [Currency::Mxn, Currency::Usd]);
        assert_eq!(settings.language, Language::Es);
        assert_eq!(settings.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(settings.token.is_none());
    }

    #[test]
    fn empty_lists_fall_back() {
        let settings = AppConfig {
            currencies: Vec::new(),
            categories: vec!["  ".to_string()],
            ..AppConfig::default()
        }
        .normalized();
        assert_eq!(settings.currencies, Currency::ALL);
        assert_eq!(settings.categories[0], "Alimentazione");
    }
}
