//! Output unit construction

use chrono::NaiveDateTime;
use fm_core::Reconciled;
use log::debug;

use crate::partition::{part_count, part_file_name, partition, EmitError, WHITELIST_FILE_NAME};

/// Default maximum number of rules per blocklist part.
pub const DEFAULT_MAX_RULES_PER_PART: usize = 500_000;

/// Default location the generated files are published under.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/hoafd/adguard_filters/main/output/";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSettings {
    pub max_rules_per_part: usize,
    /// Prefix for the cross-reference links written into every header.
    pub base_url: String,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            max_rules_per_part: DEFAULT_MAX_RULES_PER_PART,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Cross-reference to a sibling output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One output file: header fields plus the rules it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit<'a> {
    pub file_name: String,
    pub title: String,
    pub updated: String,
    pub count: usize,
    /// Total blocklist size across all parts. Blocklist units only.
    pub total_count: Option<usize>,
    pub rules: &'a [String],
}

/// Every output unit of a run and the links shared by their headers.
#[derive(Debug, Clone)]
pub struct Emission<'a> {
    pub whitelist: OutputUnit<'a>,
    pub blocklist: Vec<OutputUnit<'a>>,
    pub links: Vec<Link>,
}

impl<'a> Emission<'a> {
    /// Whitelist first, then blocklist parts in order.
    pub fn units(&self) -> impl Iterator<Item = &OutputUnit<'a>> {
        std::iter::once(&self.whitelist).chain(self.blocklist.iter())
    }
}

/// Split the reconciled sets into output units.
pub fn build_units<'a>(
    reconciled: &'a Reconciled,
    settings: &EmitSettings,
    updated: NaiveDateTime,
) -> Result<Emission<'a>, EmitError> {
    let updated = updated.format(TIMESTAMP_FORMAT).to_string();
    let total_parts = part_count(reconciled.blocklist.len(), settings.max_rules_per_part)?;
    let links = build_links(&settings.base_url, total_parts);
    debug!(
        "splitting {} blocklist rules into {} part(s) of at most {}",
        reconciled.blocklist.len(),
        total_parts,
        settings.max_rules_per_part
    );

    let whitelist = OutputUnit {
        file_name: WHITELIST_FILE_NAME.to_string(),
        title: "My Final Whitelist".to_string(),
        updated: updated.clone(),
        count: reconciled.whitelist.len(),
        total_count: None,
        rules: &reconciled.whitelist,
    };

    let blocklist = partition(&reconciled.blocklist, settings.max_rules_per_part)?
        .into_iter()
        .enumerate()
        .map(|(idx, chunk)| OutputUnit {
            file_name: part_file_name(idx + 1),
            title: format!("My Blocklist Part {}", idx + 1),
            updated: updated.clone(),
            count: chunk.len(),
            total_count: Some(reconciled.blocklist.len()),
            rules: chunk,
        })
        .collect();

    Ok(Emission {
        whitelist,
        blocklist,
        links,
    })
}

fn build_links(base_url: &str, total_parts: usize) -> Vec<Link> {
    let mut links = Vec::with_capacity(total_parts + 1);
    links.push(Link {
        label: "Whitelist".to_string(),
        url: join_url(base_url, WHITELIST_FILE_NAME),
    });
    for part in 1..=total_parts {
        links.push(Link {
            label: format!("Blocklist Part {}", part),
            url: join_url(base_url, &part_file_name(part)),
        });
    }
    links
}

fn join_url(base_url: &str, file_name: &str) -> String {
    if base_url.is_empty() || base_url.ends_with('/') {
        format!("{}{}", base_url, file_name)
    } else {
        format!("{}/{}", base_url, file_name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 0))
            .expect("valid timestamp")
    }

    fn reconciled(whitelist: &[&str], blocklist: &[&str]) -> Reconciled {
        Reconciled {
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
            blocklist: blocklist.iter().map(|s| s.to_string()).collect(),
            removed: 0,
        }
    }

    #[test]
    fn splits_blocklist_into_parts() {
        let sets = reconciled(&["a.com$important"], &["b.com", "c.com", "d.com"]);
        let settings = EmitSettings {
            max_rules_per_part: 2,
            base_url: "https://lists.example/out/".to_string(),
        };

        let emission = build_units(&sets, &settings, timestamp()).unwrap();

        assert_eq!(emission.whitelist.file_name, "whitelist.txt");
        assert_eq!(emission.whitelist.count, 1);
        assert_eq!(emission.whitelist.total_count, None);
        assert_eq!(emission.whitelist.updated, "2024-03-09 07:05:00");

        assert_eq!(emission.blocklist.len(), 2);
        let first = &emission.blocklist[0];
        assert_eq!(first.file_name, "filter_001.txt");
        assert_eq!(first.title, "My Blocklist Part 1");
        assert_eq!(first.count, 2);
        assert_eq!(first.total_count, Some(3));
        assert_eq!(emission.blocklist[1].rules, ["d.com".to_string()]);

        let urls: Vec<&str> = emission.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://lists.example/out/whitelist.txt",
                "https://lists.example/out/filter_001.txt",
                "https://lists.example/out/filter_002.txt",
            ]
        );
        assert_eq!(emission.units().count(), 3);
    }

    #[test]
    fn empty_blocklist_still_gets_a_part() {
        let sets = reconciled(&[], &[]);
        let emission = build_units(&sets, &EmitSettings::default(), timestamp()).unwrap();

        assert_eq!(emission.blocklist.len(), 1);
        assert_eq!(emission.blocklist[0].count, 0);
        assert_eq!(emission.blocklist[0].total_count, Some(0));
        assert_eq!(emission.links.len(), 2);
    }

    #[test]
    fn base_url_without_trailing_slash() {
        assert_eq!(join_url("https://x.example/out", "whitelist.txt"), "https://x.example/out/whitelist.txt");
        assert_eq!(join_url("", "whitelist.txt"), "whitelist.txt");
    }
}
