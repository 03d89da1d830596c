//! `latin-vocab.toml` settings. Every field has a default, so a missing file
//! or a partial one both work.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::theme::ThemeKind;

pub const CONFIG_FILE: &str = "latin-vocab.toml";
pub const API_ENV: &str = "LATIN_VOCAB_API";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub theme: ThemeKind,
    pub http: HttpConfig,
    pub quiz: QuizConfig,
    pub vocab: VocabConfig,
    pub log: LogConfig,
    /// Single character -> action name, see `keys::action_from_str`.
    pub keys: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:5000/api".into(),
            theme: ThemeKind::Dark,
            http: HttpConfig::default(),
            quiz: QuizConfig::default(),
            vocab: VocabConfig::default(),
            log: LogConfig::default(),
            keys: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Drop targets of the verb quiz, sent back verbatim as `category`.
    pub verb_categories: Vec<String>,
    /// Drop targets of the noun quiz.
    pub noun_categories: Vec<String>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            verb_categories: [
                "a-Konjugation",
                "e-Konjugation",
                "i-Konjugation",
                "konsonantische Konjugation",
                "gemischte Konjugation",
            ]
            .map(String::from)
            .to_vec(),
            noun_categories: [
                "a-Deklination",
                "o-Deklination",
                "konsonantische Deklination",
                "e-Deklination",
                "u-Deklination",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VocabConfig {
    /// Filter options besides "all", compared case-insensitively to `word_type`.
    pub word_types: Vec<String>,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            word_types: ["verb", "nomen", "adjektiv", "unbekannt"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads `path`, or the first `latin-vocab.toml` found from the working
    /// directory upwards. Falls back to defaults when nothing is found.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(find_config) else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Command line beats environment, environment beats the file.
    pub fn apply_api_override(&mut self, cli: Option<String>, env: Option<String>) {
        if let Some(base) = cli.or(env).filter(|s| !s.trim().is_empty()) {
            self.api_base = base;
        }
    }
}

fn find_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = AppConfig::parse(
            r#"
api_base = "https://latin.example.org/api"
theme = "light"

[http]
timeout_secs = 20

[quiz]
noun_categories = ["a-Deklination", "o-Deklination"]

[keys]
x = "show_cards"
"#,
        )
        .unwrap();
        assert_eq!(cfg.api_base, "https://latin.example.org/api");
        assert_eq!(cfg.theme, ThemeKind::Light);
        assert_eq!(cfg.http.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(cfg.quiz.noun_categories.len(), 2);
        assert_eq!(cfg.quiz.verb_categories, QuizConfig::default().verb_categories);
        assert_eq!(cfg.keys.get("x").map(String::as_str), Some("show_cards"));
        assert_eq!(cfg.log, LogConfig::default());
    }

    #[test]
    fn api_override_precedence() {
        let mut cfg = AppConfig::default();
        cfg.apply_api_override(None, Some("http://env/api".into()));
        assert_eq!(cfg.api_base, "http://env/api");

        cfg.apply_api_override(Some("http://cli/api".into()), Some("http://env/api".into()));
        assert_eq!(cfg.api_base, "http://cli/api");

        cfg.apply_api_override(None, Some("  ".into()));
        assert_eq!(cfg.api_base, "http://cli/api");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/latin-vocab.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
