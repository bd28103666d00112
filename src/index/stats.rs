use super::cache::{CacheMeta, INDEX_FILE};
use super::reader::CorpusIndex;
use crate::utils::{get_index_dir, list_indexed_corpora, AppConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Display statistics for the cached index of a corpus
pub fn show_stats(corpus_path: &Path, config: &AppConfig) -> Result<()> {
    let corpus = corpus_path.canonicalize().context("Invalid corpus path")?;
    let index_dir = get_index_dir(&corpus)?;
    let index_path = index_dir.join(INDEX_FILE);

    if !index_path.exists() {
        anyhow::bail!("No index found. Run 'ransom index {}' first.", corpus_path.display());
    }

    let index = CorpusIndex::open(&index_path, &config.field_names)
        .context("Failed to open cached index")?;
    let stats = index.stats();

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Corpus:           {}", corpus.display());
    println!("Index location:   {}", index_dir.display());
    println!("Records:          {}", stats.record_count);
    println!("Indexed fields:   {}", stats.field_count);
    println!("Text size:        {}", format_size(stats.text_size as u64));
    println!("Suffixes:         {}", stats.suffix_count);

    println!();
    println!("Field names:");
    for (field_id, name) in stats.field_names.iter().enumerate() {
        println!("  {:3} {}", field_id, name);
    }

    if let Ok(metadata) = std::fs::metadata(&index_path) {
        println!();
        println!("Index size:       {}", format_size(metadata.len()));
    }

    if let Some(meta) = CacheMeta::read(&index_dir) {
        println!("Languages:        {}", meta.languages.join(", "));
        println!("Created:          {}", format_timestamp(meta.created_at));
    }

    Ok(())
}

/// List all cached corpus indexes
pub fn list_indexes() -> Result<()> {
    let corpora = list_indexed_corpora()?;

    if corpora.is_empty() {
        println!("No indexed corpora found.");
        return Ok(());
    }

    println!("Indexed Corpora");
    println!("===============");
    println!();

    for location in corpora {
        let status = if location.corpus_path.exists() { "" } else { " [missing]" };
        println!("  {}{}", location.corpus_path.display(), status);
        println!("    Index: {}", location.index_dir.display());
        println!();
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format unix timestamp
fn format_timestamp(ts: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};
    let datetime = UNIX_EPOCH + Duration::from_secs(ts);
    format!("{:?}", datetime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
