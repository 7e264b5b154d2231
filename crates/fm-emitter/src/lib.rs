//! FilterMerge Emitter
//!
//! This crate turns reconciled rule sets into output units: one whitelist
//! file and as many blocklist parts as the part size requires, each with a
//! descriptive header.

pub mod header;
pub mod partition;
pub mod units;

pub use header::{render, render_header, SEPARATOR_LINE};
pub use partition::{part_count, part_file_name, partition, EmitError, WHITELIST_FILE_NAME};
pub use units::{
    build_units, EmitSettings, Emission, Link, OutputUnit, DEFAULT_BASE_URL,
    DEFAULT_MAX_RULES_PER_PART,
};
