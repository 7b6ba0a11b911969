use crate::app_dirs::AppDirs;
use crate::error::{Result, TypetestError};
use crate::language::{Difficulty, DifficultyProfile, Language};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Startup configuration. Built once and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub database_path: Option<PathBuf>,
    pub corpora: BTreeMap<Language, PathBuf>,
    pub allowed_origins: Vec<String>,
    /// Directory holding `html/`, `css/` and `js/` of the web client
    pub frontend_dir: Option<PathBuf>,
    pub profiles: BTreeMap<Difficulty, DifficultyProfile>,
}

impl Default for Config {
    fn default() -> Self {
        let corpora = BTreeMap::from([
            (Language::Ru, PathBuf::from("words_data/singular_and_plural.txt")),
            (Language::En, PathBuf::from("words_data/words_alpha.txt")),
        ]);
        let profiles = Difficulty::ALL
            .into_iter()
            .map(|d| (d, DifficultyProfile::builtin(d)))
            .collect();

        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api".to_string(),
            database_path: None,
            corpora,
            allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
            frontend_dir: None,
            profiles,
        }
    }
}

impl Config {
    /// Reject tables that would leave a difficulty or language unresolvable.
    pub fn validate(&self) -> Result<()> {
        for difficulty in Difficulty::ALL {
            let profile = self.profile(difficulty)?;
            if profile.punctuation_marks.is_empty() {
                return Err(TypetestError::Config(format!(
                    "profile '{difficulty}' has no punctuation marks"
                )));
            }
            if profile.punctuation_probability >= 1.0 {
                return Err(TypetestError::Config(format!(
                    "profile '{difficulty}' punctuation probability must be below 1"
                )));
            }
            if let (Some(min), Some(max)) = (profile.min_word_length, profile.max_word_length) {
                if min > max {
                    return Err(TypetestError::Config(format!(
                        "profile '{difficulty}' has min word length {min} above max {max}"
                    )));
                }
            }
        }
        for language in Language::ALL {
            self.corpus_path(language)?;
        }
        if !self.api_prefix.starts_with('/') {
            return Err(TypetestError::Config(format!(
                "api prefix '{}' must start with '/'",
                self.api_prefix
            )));
        }
        Ok(())
    }

    pub fn profile(&self, difficulty: Difficulty) -> Result<&DifficultyProfile> {
        self.profiles
            .get(&difficulty)
            .ok_or(TypetestError::MissingProfile(difficulty))
    }

    pub fn corpus_path(&self, language: Language) -> Result<&Path> {
        self.corpora
            .get(&language)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                TypetestError::Config(format!("no word list configured for '{language}'"))
            })
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("typing_test.db"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::info!(path = %self.path.display(), "no config file, using defaults");
                return Config::default();
            }
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unreadable config file, using defaults"
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "port": 9100, "corpora": { "en": "/srv/words/en.txt" } }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.corpus_path(Language::En).unwrap(), Path::new("/srv/words/en.txt"));
        // corpora was replaced wholesale, so ru is now missing
        assert_matches!(cfg.corpus_path(Language::Ru), Err(TypetestError::Config(_)));
        assert_eq!(cfg.profiles.len(), 4);
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_profile() {
        let mut cfg = Config::default();
        cfg.profiles.remove(&Difficulty::Medium);
        assert_matches!(cfg.validate(), Err(TypetestError::MissingProfile(Difficulty::Medium)));
    }

    #[test]
    fn validate_rejects_empty_marks() {
        let mut cfg = Config::default();
        if let Some(profile) = cfg.profiles.get_mut(&Difficulty::Hard) {
            profile.punctuation_marks.clear();
        }
        assert_matches!(cfg.validate(), Err(TypetestError::Config(msg)) if msg.contains("hard"));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let mut cfg = Config::default();
        if let Some(profile) = cfg.profiles.get_mut(&Difficulty::Medium) {
            profile.min_word_length = Some(12);
        }
        assert_matches!(cfg.validate(), Err(TypetestError::Config(_)));
    }

    #[test]
    fn easy_profile_survives_json_roundtrip() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        let easy = back.profile(Difficulty::Easy).unwrap();
        assert_eq!(easy.punctuation_probability, crate::language::NEVER_PUNCTUATE);
        assert_eq!(easy.max_word_length, Some(6));
        assert_eq!(easy.min_word_length, None);
    }
}
