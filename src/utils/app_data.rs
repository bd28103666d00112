use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use twox_hash::XxHash64;

const APP_NAME: &str = "ransom";
const CONFIG_FILE: &str = "config.json";

/// Overrides the app data directory (used by tests and sandboxed runs)
pub const HOME_ENV: &str = "RANSOM_HOME";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record fields to index, in field-id order
    ///
    /// Changing this list invalidates every cached index.
    #[serde(default = "default_field_names")]
    pub field_names: Vec<String>,

    /// Languages to keep when loading a corpus (empty keeps everything)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Distinct keys consulted per fragment when resolving locations
    #[serde(default = "default_match_limit")]
    pub match_limit: usize,

    /// Decompose the words of a target in parallel
    #[serde(default = "default_parallel_decompose")]
    pub parallel_decompose: bool,
}

fn default_field_names() -> Vec<String> {
    vec![
        "name".to_string(),
        "oracle_text".to_string(),
        "flavor_text".to_string(),
    ]
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_match_limit() -> usize {
    20
}

fn default_parallel_decompose() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            field_names: default_field_names(),
            languages: default_languages(),
            match_limit: default_match_limit(),
            parallel_decompose: default_parallel_decompose(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory for storing indexes
pub fn get_app_data_dir() -> Result<PathBuf> {
    let app_dir = match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home),
        None => {
            let base = if cfg!(target_os = "macos") {
                dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
            } else if cfg!(target_os = "windows") {
                dirs::data_local_dir()
            } else {
                // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
                dirs::data_dir()
            };
            base.context("Could not determine app data directory")?
                .join(APP_NAME)
        }
    };

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Get the cache directory for the index of a specific corpus file
pub fn get_index_dir(corpus_path: &Path) -> Result<PathBuf> {
    let app_data = get_app_data_dir()?;
    let indexes_dir = app_data.join("indexes");
    fs::create_dir_all(&indexes_dir)?;

    Ok(indexes_dir.join(hash_path(corpus_path)))
}

/// Folder name for a corpus path: readable file stem + stable hash
fn hash_path(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let stem = canonical
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("corpus");

    // Sanitize stem (remove special chars, truncate)
    let sanitized: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(16)
        .collect();

    let mut hasher = XxHash64::with_seed(0);
    hasher.write(path_str.as_bytes());

    format!("{}-{:016x}", sanitized, hasher.finish())
}

/// List all cached corpus indexes
pub fn list_indexed_corpora() -> Result<Vec<IndexLocation>> {
    let app_data = get_app_data_dir()?;
    let indexes_dir = app_data.join("indexes");

    if !indexes_dir.exists() {
        return Ok(Vec::new());
    }

    let mut corpora = Vec::new();

    for entry in fs::read_dir(&indexes_dir)? {
        let path = entry?.path();
        let meta_path = path.join("meta.json");
        if !path.is_dir() || !meta_path.exists() {
            continue;
        }

        // Read the meta.json to get the corpus path
        let Ok(file) = fs::File::open(&meta_path) else {
            continue;
        };
        let Ok(meta) = serde_json::from_reader::<_, serde_json::Value>(file) else {
            continue;
        };
        if let Some(corpus) = meta.get("corpus_path").and_then(|v| v.as_str()) {
            corpora.push(IndexLocation {
                corpus_path: PathBuf::from(corpus),
                index_dir: path,
            });
        }
    }

    corpora.sort_by(|a, b| a.corpus_path.cmp(&b.corpus_path));
    Ok(corpora)
}

/// Remove the cached index for a corpus
pub fn remove_index(corpus_path: &Path) -> Result<bool> {
    let index_dir = get_index_dir(corpus_path)?;
    if index_dir.exists() {
        fs::remove_dir_all(&index_dir)?;
        return Ok(true);
    }
    Ok(false)
}

/// Information about a cached corpus index
#[derive(Debug, Clone)]
pub struct IndexLocation {
    pub corpus_path: PathBuf,
    pub index_dir: PathBuf,
}
