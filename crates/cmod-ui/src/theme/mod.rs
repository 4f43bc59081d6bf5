//! Theme system

use ratatui::prelude::*;

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border color for focused elements
    pub focus_border: Color,
    /// Border color for unfocused elements
    pub unfocus_border: Color,
    /// Selected row background
    pub selection: Color,
    /// Pending review status
    pub pending: Color,
    /// Reviewed status
    pub reviewed: Color,
    /// Flag counts
    pub flags: Color,
    /// Hidden bodies shown to moderators
    pub faded: Color,
    /// Status bar background
    pub status_bg: Color,
}

impl Theme {
    /// Look up a theme by its config name. Unknown names give the default.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" | "monochrome" => Self::monochrome(),
            _ => Self::default(),
        }
    }

    /// Theme without hues for terminals with limited color
    pub fn monochrome() -> Self {
        Self {
            focus_border: Color::White,
            unfocus_border: Color::Gray,
            selection: Color::DarkGray,
            pending: Color::White,
            reviewed: Color::Gray,
            flags: Color::White,
            faded: Color::DarkGray,
            status_bg: Color::DarkGray,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            unfocus_border: Color::DarkGray,
            selection: Color::DarkGray,
            pending: Color::Yellow,
            reviewed: Color::Green,
            flags: Color::Red,
            faded: Color::DarkGray,
            status_bg: Color::DarkGray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("mono").pending, Color::White);
        assert_eq!(Theme::from_name("default").pending, Color::Yellow);
        assert_eq!(Theme::from_name("neon").pending, Color::Yellow);
    }
}
