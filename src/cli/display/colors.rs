//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color of a rendered manifest row
    pub fn get_manifest_color(&self, replacements: usize, unresolved: usize) -> TableColor {
        if unresolved > 0 {
            self.warning
        } else if replacements == 0 {
            self.muted
        } else {
            self.success
        }
    }

    /// Color of a placeholder value, required ones turn red when unset
    pub fn get_value_color(&self, is_set: bool, required: bool) -> TableColor {
        match (is_set, required) {
            (true, _) => self.info,
            (false, true) => self.error,
            (false, false) => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_manifest_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_manifest_color(4, 0), TableColor::Green);
        assert_eq!(theme.get_manifest_color(4, 1), TableColor::Yellow);
        assert_eq!(theme.get_manifest_color(0, 0), TableColor::DarkGrey);
    }

    #[test]
    fn test_get_value_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_value_color(true, true), TableColor::Cyan);
        assert_eq!(theme.get_value_color(false, true), TableColor::Red);
        assert_eq!(theme.get_value_color(false, false), TableColor::DarkGrey);
    }
}
