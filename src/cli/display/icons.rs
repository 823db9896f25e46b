//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    /// Nothing to do
    pub const SKIPPED: &'static str = "-";

    /// Icon for a rendered manifest
    pub fn get_manifest_icon(replacements: usize, unresolved: usize) -> &'static str {
        if unresolved > 0 {
            Self::WARNING
        } else if replacements == 0 {
            Self::SKIPPED
        } else {
            Self::SUCCESS
        }
    }

    /// Status text for a rendered manifest
    pub fn get_manifest_text(replacements: usize, unresolved: usize) -> &'static str {
        if unresolved > 0 {
            "Unresolved"
        } else if replacements == 0 {
            "Unchanged"
        } else {
            "Rendered"
        }
    }
}
