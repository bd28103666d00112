//! Location lookup for fragments.

use crate::error::{Error, Result};
use crate::index::{CorpusIndex, FieldRef};

/// Collect locations for `fragment` from at most `limit` distinct keys
///
/// Every location of each consumed key is kept, so the result can be longer
/// than `limit`; the limit bounds index traversal, not fan-out.
pub fn resolve_locations(
    fragment: &str,
    index: &CorpusIndex,
    limit: usize,
) -> Result<Vec<FieldRef>> {
    let locations: Vec<FieldRef> = index
        .iter_keys_with_prefix(fragment)
        .take(limit)
        .flat_map(|(_, refs)| refs)
        .collect();

    if locations.is_empty() {
        return Err(Error::Inconsistent {
            fragment: fragment.to_string(),
        });
    }

    Ok(locations)
}
