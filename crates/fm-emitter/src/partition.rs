//! Blocklist partitioning
//!
//! Large blocklists are split into consecutive parts so every output file
//! stays under the size limits of the consumers that load them.

/// File name of the merged whitelist.
pub const WHITELIST_FILE_NAME: &str = "whitelist.txt";

/// Error type for output unit construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("Part size must be at least 1 rule")]
    InvalidPartSize,
}

/// Number of parts needed for `total` rules. Never less than one.
pub fn part_count(total: usize, max_per_part: usize) -> Result<usize, EmitError> {
    if max_per_part == 0 {
        return Err(EmitError::InvalidPartSize);
    }
    Ok(total.div_ceil(max_per_part).max(1))
}

/// Split `rules` into consecutive chunks of at most `max_per_part` rules.
///
/// An empty input still yields one (empty) chunk.
pub fn partition<T>(rules: &[T], max_per_part: usize) -> Result<Vec<&[T]>, EmitError> {
    let count = part_count(rules.len(), max_per_part)?;
    if rules.is_empty() {
        return Ok(vec![rules]);
    }

    let chunks: Vec<&[T]> = rules.chunks(max_per_part).collect();
    debug_assert_eq!(chunks.len(), count);
    Ok(chunks)
}

/// File name of a 1-based blocklist part (`filter_001.txt`).
pub fn part_file_name(part: usize) -> String {
    format!("filter_{:03}.txt", part)
}
