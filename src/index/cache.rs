//! On-disk index cache
//!
//! Each corpus file gets a directory under the app data dir holding the
//! persisted blob (`index.bin`) and a `meta.json` describing what it was
//! built from. A cached index is reused while the corpus file and language
//! filter are unchanged; a blob built for other field names is rejected on
//! open and rebuilt.

use super::reader::CorpusIndex;
use crate::corpus::load_records;
use crate::error::Error;
use crate::utils::progress::{finish, spinner};
use crate::utils::{get_index_dir, AppConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub const INDEX_FILE: &str = "index.bin";
pub const META_FILE: &str = "meta.json";

/// Version of the cache layout, bumped when meta.json changes shape
const CACHE_VERSION: u32 = 1;

/// What a cached index was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub version: u32,
    pub corpus_path: PathBuf,
    pub corpus_size: u64,
    pub corpus_mtime: u64,
    pub languages: Vec<String>,
    pub field_names: Vec<String>,
    pub record_count: u32,
    pub created_at: u64,
}

impl CacheMeta {
    /// Read meta.json from an index directory, `None` if absent or unreadable
    pub fn read(index_dir: &Path) -> Option<Self> {
        let file = fs::File::open(index_dir.join(META_FILE)).ok()?;
        serde_json::from_reader(file).ok()
    }

    fn write(&self, index_dir: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize meta.json")?;
        fs::write(index_dir.join(META_FILE), content).context("Failed to write meta.json")?;
        Ok(())
    }

    /// Whether this cache still describes `corpus` under `config`
    fn matches(&self, corpus: &Path, config: &AppConfig) -> Result<bool> {
        let (size, mtime) = file_stamp(corpus)?;
        Ok(self.version == CACHE_VERSION
            && self.corpus_path == corpus
            && self.corpus_size == size
            && self.corpus_mtime == mtime
            && self.languages == config.languages)
    }
}

/// Open the cached index for `corpus_path`, building it when missing or stale
pub fn load_or_build(
    corpus_path: &Path,
    config: &AppConfig,
    force: bool,
    silent: bool,
) -> Result<CorpusIndex> {
    let corpus = corpus_path.canonicalize().context("Invalid corpus path")?;
    let index_dir = get_index_dir(&corpus)?;

    if !force {
        if let Some(index) = open_cached(&corpus, &index_dir, config)? {
            return Ok(index);
        }
    }

    build_index(&corpus, config, silent)
}

/// Open a fresh cached index, `None` when it must be rebuilt
fn open_cached(corpus: &Path, index_dir: &Path, config: &AppConfig) -> Result<Option<CorpusIndex>> {
    let Some(meta) = CacheMeta::read(index_dir) else {
        return Ok(None);
    };
    if !meta.matches(corpus, config)? {
        info!(corpus = %corpus.display(), "cached index is stale");
        return Ok(None);
    }

    match CorpusIndex::open(&index_dir.join(INDEX_FILE), &config.field_names) {
        Ok(index) => Ok(Some(index)),
        Err(err @ (Error::IndexMismatch { .. } | Error::CorruptIndex(_))) => {
            warn!(error = %err, "discarding cached index");
            Ok(None)
        }
        Err(Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::Error::new(err).context("Failed to open cached index")),
    }
}

/// Load the corpus, build its index and store it in the cache
pub fn build_index(corpus_path: &Path, config: &AppConfig, silent: bool) -> Result<CorpusIndex> {
    let corpus = corpus_path.canonicalize().context("Invalid corpus path")?;
    let index_dir = get_index_dir(&corpus)?;

    if !silent {
        println!("Indexing: {}", corpus.display());
    }

    let loading = spinner("Loading corpus...", silent)?;
    let records = load_records(&corpus, &config.languages)
        .with_context(|| format!("Failed to load corpus {}", corpus.display()))?;
    finish(loading, format!("Loaded {} records", records.len()));

    let building = spinner("Building index...", silent)?;
    let index = CorpusIndex::build(&records, &config.field_names)
        .map_err(Error::from)
        .context("Failed to build index")?;
    let stats = index.stats();
    finish(
        building,
        format!("Indexed {} fields ({} suffixes)", stats.field_count, stats.suffix_count),
    );

    fs::create_dir_all(&index_dir)?;
    index.save(&index_dir.join(INDEX_FILE))?;

    let (corpus_size, corpus_mtime) = file_stamp(&corpus)?;
    let meta = CacheMeta {
        version: CACHE_VERSION,
        corpus_path: corpus.clone(),
        corpus_size,
        corpus_mtime,
        languages: config.languages.clone(),
        field_names: config.field_names.clone(),
        record_count: stats.record_count,
        created_at: now_secs(),
    };
    meta.write(&index_dir)?;

    if !silent {
        println!("Index stored at: {}", index_dir.display());
    }

    Ok(index)
}

/// Size and modification time (nanoseconds) of a file
fn file_stamp(path: &Path) -> Result<(u64, u64)> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let mtime = metadata
        .modified()
        .map(|t| t.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos() as u64)
        .unwrap_or(0);
    Ok((metadata.len(), mtime))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
