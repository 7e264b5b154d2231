//! Filter list header rendering
//!
//! Layout of every output file:
//!
//! ```text
//! ! Title: My Blocklist Part 1
//! ! Updated: 2024-03-09 07:05:00
//! ! Rules in this file: 2
//! ! Total Block Rules (All parts): 3
//! !
//! ! --- YOUR FILTER LINKS ---
//! ! > Whitelist: https://.../whitelist.txt
//! ! > Blocklist Part 1: https://.../filter_001.txt
//! !
//! ! --- SOURCES USED ---
//! ! [WHITELIST SOURCES]
//! ! - https://...
//! ! [BLOCKLIST SOURCES]
//! ! - https://...
//! ! ---------------------------------------------------
//! rule
//! rule
//! ```

use fm_core::{Category, Sources};

use crate::units::{Link, OutputUnit};

/// Line separating the header from the rules.
pub const SEPARATOR_LINE: &str = "! ---------------------------------------------------";

/// Render the header block, without the separator line.
pub fn render_header(unit: &OutputUnit<'_>, links: &[Link], sources: &Sources) -> String {
    let mut lines = vec![
        format!("! Title: {}", unit.title),
        format!("! Updated: {}", unit.updated),
        format!("! Rules in this file: {}", unit.count),
    ];
    if let Some(total) = unit.total_count {
        lines.push(format!("! Total Block Rules (All parts): {}", total));
    }

    lines.push("!".to_string());
    lines.push("! --- YOUR FILTER LINKS ---".to_string());
    lines.extend(links.iter().map(|link| format!("! > {}: {}", link.label, link.url)));

    lines.push("!".to_string());
    lines.push("! --- SOURCES USED ---".to_string());
    for category in Category::ALL {
        lines.push(format!("! [{} SOURCES]", category.as_str().to_ascii_uppercase()));
        lines.extend(sources.for_category(category).iter().map(|url| format!("! - {}", url)));
    }

    lines.join("\n")
}

/// Render a complete output file: header, separator, rules.
pub fn render(unit: &OutputUnit<'_>, links: &[Link], sources: &Sources) -> String {
    let body_len: usize = unit.rules.iter().map(|r| r.len() + 1).sum();
    let mut out = render_header(unit, links, sources);
    out.reserve(SEPARATOR_LINE.len() + body_len + 2);

    out.push('\n');
    out.push_str(SEPARATOR_LINE);
    out.push('\n');
    out.push_str(&unit.rules.join("\n"));
    out
}
