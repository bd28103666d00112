//! Greedy split of a string into corpus-present pieces
//!
//! Each step takes the longest substring of the current span that the index
//! contains, then handles what is left on either side. Spans are processed
//! from an explicit stack so very fragmented inputs cannot overflow the call
//! stack; output order matches the left, middle, right recursion.

use crate::error::{Error, Result};
use crate::index::CorpusIndex;
use tracing::trace;

enum Work<'s> {
    /// Span still to be split
    Split(&'s str),
    /// Piece already matched, emitted once everything left of it is done
    Emit(&'s str),
}

/// Split `s` into pieces that each occur in the corpus
///
/// Pieces are returned left to right and concatenate back to `s`. Fails with
/// [`Error::Unsourceable`] naming the first span with no match at all.
pub fn greedy_split<'s>(s: &'s str, index: &CorpusIndex) -> Result<Vec<&'s str>> {
    let mut pieces = Vec::new();
    if s.is_empty() {
        return Ok(pieces);
    }

    let mut stack = vec![Work::Split(s)];

    while let Some(work) = stack.pop() {
        match work {
            Work::Emit(piece) => pieces.push(piece),
            Work::Split(span) => {
                let (start, end) = longest_match(span, index)?;
                trace!(text = span, start, end, "longest match");

                // Pushed in reverse so the left side is handled first
                if end < span.len() {
                    stack.push(Work::Split(&span[end..]));
                }
                stack.push(Work::Emit(&span[start..end]));
                if start > 0 {
                    stack.push(Work::Split(&span[..start]));
                }
            }
        }
    }

    Ok(pieces)
}

/// Byte range of the longest substring of `span` present in the index
///
/// Lengths are counted in chars. Start offsets are scanned left to right and
/// end offsets grow from each start; a longer candidate must strictly beat
/// the best so far, so ties keep the earliest start, then the earliest end.
/// Once `span[i..j]` is absent, no longer candidate from `i` can be present.
pub fn longest_match(span: &str, index: &CorpusIndex) -> Result<(usize, usize)> {
    let bounds: Vec<usize> = span
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(span.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut best: Option<(usize, usize)> = None;
    let mut best_len = 0;

    for i in 0..char_count {
        // Nothing starting here can be longer than the current best
        if char_count - i <= best_len {
            break;
        }

        for j in (i + best_len + 1)..=char_count {
            if index.contains(&span[bounds[i]..bounds[j]]) {
                best = Some((i, j));
                best_len = j - i;
            } else {
                break;
            }
        }
    }

    match best {
        Some((i, j)) => Ok((bounds[i], bounds[j])),
        None => Err(Error::Unsourceable {
            text: span.to_string(),
        }),
    }
}
