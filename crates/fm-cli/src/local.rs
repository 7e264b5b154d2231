use std::fs;

use log::warn;

use fm_core::{Category, SourceLoader, Sources};

/// Serves sources straight from the local filesystem.
pub struct FileLoader;

impl SourceLoader for FileLoader {
    fn load(&self, category: Category, source: &str) -> Option<String> {
        match fs::read_to_string(source) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("[{}] Failed to read '{}': {}", category, source, e);
                None
            }
        }
    }
}

pub fn local_sources(whitelist: Vec<String>, blocklist: Vec<String>) -> Result<Sources, String> {
    if whitelist.is_empty() && blocklist.is_empty() {
        return Err("No input files specified".to_string());
    }
    Ok(Sources {
        whitelist,
        blocklist,
    })
}
