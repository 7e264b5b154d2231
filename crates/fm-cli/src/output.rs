use std::fs;
use std::path::Path;

use log::debug;

use fm_core::Sources;
use fm_emitter::{render, Emission};

/// Replace the output directory with one file per output unit.
///
/// Returns the number of files written.
pub fn write_outputs(dir: &Path, emission: &Emission<'_>, sources: &Sources) -> Result<usize, String> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .map_err(|e| format!("Failed to clear '{}': {}", dir.display(), e))?;
    }
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;

    let mut written = 0usize;
    for unit in emission.units() {
        let path = dir.join(&unit.file_name);
        let text = render(unit, &emission.links, sources);
        fs::write(&path, text)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
        debug!("wrote {} ({} rules)", path.display(), unit.count);
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fm_core::Reconciled;
    use fm_emitter::{build_units, EmitSettings};

    use super::*;

    #[test]
    fn replaces_previous_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("output");
        fs::create_dir_all(&out).expect("mkdir");
        fs::write(out.join("filter_009.txt"), "stale").expect("write");

        let reconciled = Reconciled {
            whitelist: vec!["good.com$important".to_string()],
            blocklist: vec!["a.com".to_string(), "b.com".to_string(), "c.com".to_string()],
            removed: 0,
        };
        let settings = EmitSettings {
            max_rules_per_part: 2,
            base_url: "https://o.example/".to_string(),
        };
        let updated = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("timestamp");
        let emission = build_units(&reconciled, &settings, updated).expect("units");

        let written = write_outputs(&out, &emission, &Sources::default()).expect("write outputs");

        assert_eq!(written, 3);
        assert!(!out.join("filter_009.txt").exists());
        let part_two = fs::read_to_string(out.join("filter_002.txt")).expect("read part");
        assert!(part_two.starts_with("! Title: My Blocklist Part 2\n"));
        assert!(part_two.ends_with("---\nc.com"));
        let whitelist = fs::read_to_string(out.join("whitelist.txt")).expect("read whitelist");
        assert!(whitelist.ends_with("\ngood.com$important"));
    }
}
