//! Output formatting for decomposition results

use crate::decompose::Fragment;
use crate::index::CorpusIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Decomposition of one word of the target
#[derive(Debug, Clone, Serialize)]
pub struct WordResult {
    pub word: String,
    pub fragments: Vec<Fragment>,
}

/// Shuffle each fragment's locations so repeated runs pick different sources
pub fn shuffle_locations<R: Rng + ?Sized>(results: &mut [WordResult], rng: &mut R) {
    for fragment in results.iter_mut().flat_map(|r| r.fragments.iter_mut()) {
        fragment.locations.shuffle(rng);
    }
}

/// Print fragments as an annotated list
///
/// Each fragment is shown quoted, followed by up to `max_locations` of its
/// sources as `record #id field: text`.
pub fn print_fragments(
    results: &[WordResult],
    index: &CorpusIndex,
    color: bool,
    max_locations: usize,
) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_fragments(&mut stdout, results, index, max_locations)
}

fn write_fragments<W: WriteColor>(
    out: &mut W,
    results: &[WordResult],
    index: &CorpusIndex,
    max_locations: usize,
) -> io::Result<()> {
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        writeln!(out, "{}", result.word)?;
        out.reset()?;

        for fragment in &result.fragments {
            write!(out, "  ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "{:?}", fragment.text)?;
            out.reset()?;
            writeln!(
                out,
                " ({} locations, {} records)",
                fragment.locations.len(),
                fragment.source_count()
            )?;

            for location in fragment.locations.iter().take(max_locations) {
                let field = index.field_name(location.field_id).unwrap_or("?");
                let text = index.field_text(*location).unwrap_or("");

                out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(out, "    #{} {}", location.record_id, field)?;
                out.reset()?;
                writeln!(out, ": {}", text)?;
            }

            let hidden = fragment.locations.len().saturating_sub(max_locations);
            if hidden > 0 {
                writeln!(out, "    ... and {} more", hidden)?;
            }
        }
    }

    Ok(())
}

/// Print results as pretty JSON
pub fn print_json(results: &[WordResult]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, results)?;
    writeln!(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SourceRecord;
    use crate::decompose::decompose;
    use termcolor::NoColor;

    #[test]
    fn test_write_fragments_plain() {
        let records = vec![
            SourceRecord::new().with_field("text", "ratchet bomb"),
            SourceRecord::new().with_field("text", "please wait"),
        ];
        let index = CorpusIndex::build(&records, &["text"]).unwrap();
        let results = vec![WordResult {
            word: "chet".to_string(),
            fragments: decompose("chet", &index, 5).unwrap(),
        }];

        let mut out = NoColor::new(Vec::new());
        write_fragments(&mut out, &results, &index, 3).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.starts_with("chet\n"));
        assert!(text.contains("  \"chet\" (1 locations, 1 records)"));
        assert!(text.contains("    #0 text: ratchet bomb"));
    }

    #[test]
    fn test_shuffle_locations_is_seeded_permutation() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let records: Vec<SourceRecord> = (0..20)
            .map(|_| SourceRecord::new().with_field("text", "wait"))
            .collect();
        let index = CorpusIndex::build(&records, &["text"]).unwrap();
        let original = vec![WordResult {
            word: "wait".to_string(),
            fragments: decompose("wait", &index, 5).unwrap(),
        }];

        let mut first = original.clone();
        shuffle_locations(&mut first, &mut StdRng::seed_from_u64(7));
        let mut second = original.clone();
        shuffle_locations(&mut second, &mut StdRng::seed_from_u64(7));

        assert_eq!(first[0].fragments, second[0].fragments);

        let mut sorted = first[0].fragments[0].locations.clone();
        sorted.sort();
        assert_eq!(sorted, original[0].fragments[0].locations);
        assert_ne!(first[0].fragments[0].locations, original[0].fragments[0].locations);
    }

    #[test]
    fn test_write_fragments_truncates_locations() {
        let records: Vec<SourceRecord> = (0..5)
            .map(|_| SourceRecord::new().with_field("text", "wait"))
            .collect();
        let index = CorpusIndex::build(&records, &["text"]).unwrap();
        let results = vec![WordResult {
            word: "wait".to_string(),
            fragments: decompose("wait", &index, 5).unwrap(),
        }];

        let mut out = NoColor::new(Vec::new());
        write_fragments(&mut out, &results, &index, 2).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.contains("... and 3 more"));
    }
}
