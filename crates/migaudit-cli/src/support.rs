use crate::cli::LogFormatArg;
use migaudit_kernel::{Dataset, RecordType, Vocabularies, VocabularyId};
use migaudit_table::{LoadOptions, read_dataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV_VAR: &str = "MIGAUDIT_LOG";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    #[serde(default = "default_true")]
    pub empty_as_missing: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            empty_as_missing: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub language: BTreeMap<String, String>,
    #[serde(default)]
    pub resource_type: BTreeMap<String, String>,
    #[serde(default)]
    pub access_rights: BTreeMap<String, String>,
}

/// Shared state every command runs with.
pub struct Context {
    pub vocab: Vocabularies,
    pub load: LoadOptions,
}

pub fn parse_config(text: &str) -> Result<Config, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

pub fn load_config_or_exit(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read config {}: {e}", path.display());
        std::process::exit(1);
    });
    parse_config(&text).unwrap_or_else(|e| {
        eprintln!("error: invalid config {}: {e}", path.display());
        std::process::exit(1);
    })
}

/// Built-in vocabularies plus the config's additive entries.
pub fn build_vocabularies(config: &VocabularyConfig) -> Result<Vocabularies, String> {
    let mut vocab = Vocabularies::standard();
    for (id, entries) in [
        (VocabularyId::Language, &config.language),
        (VocabularyId::ResourceType, &config.resource_type),
        (VocabularyId::AccessRights, &config.access_rights),
    ] {
        if entries.is_empty() {
            continue;
        }
        vocab = vocab
            .extend(id, entries.iter().map(|(k, v)| (k.clone(), v.clone())))
            .map_err(|e| e.to_string())?;
    }
    Ok(vocab)
}

pub fn build_context_or_exit(config: &Config) -> Context {
    let vocab = build_vocabularies(&config.vocabulary).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    Context {
        vocab,
        load: LoadOptions {
            empty_as_missing: config.load.empty_as_missing,
        },
    }
}

/// Install the global subscriber. Filter precedence: `MIGAUDIT_LOG`, then
/// `--log-level`, then config, then `info`. Logs go to stderr.
pub fn init_logging_or_exit(
    cli_level: Option<&str>,
    cli_format: Option<LogFormatArg>,
    config: &LoggingConfig,
) {
    let level = cli_level
        .or(config.level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(env_level) if !env_level.trim().is_empty() => EnvFilter::try_new(env_level),
        _ => EnvFilter::try_new(level),
    }
    .unwrap_or_else(|e| {
        eprintln!("error: invalid log filter: {e}");
        std::process::exit(1);
    });

    let json = match cli_format {
        Some(LogFormatArg::Json) => true,
        Some(LogFormatArg::Text) => false,
        None => config.format == Some(LogFormat::Json),
    };
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

pub fn parse_record_type_or_exit(raw: &str) -> RecordType {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn read_dataset_or_exit(path: &Path, options: LoadOptions) -> Dataset {
    read_dataset(path, options).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    })
}

pub fn print_json<T: Serialize>(value: &T) {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("error: failed to render JSON output: {e}");
        std::process::exit(1);
    });
    println!("{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").expect("empty config is valid");
        assert_eq!(config, Config::default());
        assert!(config.load.empty_as_missing);
    }

    #[test]
    fn full_config_parses() {
        let config = parse_config(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [load]
            empty_as_missing = false

            [vocabulary.language]
            "http://id.loc.gov/vocabulary/iso639-2/kor" = "ko"
            "#,
        )
        .expect("config");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert!(!config.load.empty_as_missing);

        let vocab = build_vocabularies(&config.vocabulary).expect("vocabularies");
        assert_eq!(
            vocab
                .get(VocabularyId::Language)
                .lookup("http://id.loc.gov/vocabulary/iso639-2/kor"),
            Some("ko")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[load]\nempty_is_missing = true\n").expect_err("typo");
        assert!(err.contains("empty_is_missing"));
    }

    #[test]
    fn access_rights_extension_is_refused() {
        let config = parse_config(
            "[vocabulary.access_rights]\n\"http://terms.library.ualberta.ca/private\" = \"restricted\"\n",
        )
        .expect("config parses");
        let err = build_vocabularies(&config.vocabulary).expect_err("fixed table");
        assert!(err.contains("access_rights"));
    }
}
