//! Core type definitions for FilterMerge

use std::fmt;

// =============================================================================
// Line syntax
// =============================================================================

/// Introduces the modifier clause of a rule (`||ads.example^$third-party`).
pub const MODIFIER_SEPARATOR: char = '$';

/// Separates tokens inside the modifier clause.
pub const MODIFIER_DELIMITER: char = ',';

/// Modifier token that marks a rule as high priority.
pub const PRIORITY_TOKEN: &str = "important";

/// Prefixes that turn a line into a comment.
pub const COMMENT_PREFIXES: [char; 2] = ['!', '#'];

/// Exception rule prefix. Never a valid blocklist entry.
pub const EXCEPTION_PREFIX: &str = "@@";

// =============================================================================
// Categories
// =============================================================================

/// Which merged output a rule line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Exemptions. Priority-flagged variants win conflicts.
    Whitelist,
    /// Block rules. Unflagged variants win conflicts.
    Blocklist,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Whitelist, Category::Blocklist];

    /// Lowercase name, also used as the configuration key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Whitelist => "whitelist",
            Category::Blocklist => "blocklist",
        }
    }

    #[inline]
    pub const fn is_whitelist(self) -> bool {
        matches!(self, Category::Whitelist)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
