use std::str::FromStr;

use tuirealm::ratatui::style::Color;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemePreset {
    /// Neon magenta/cyan on a near-black canvas
    #[default]
    Cyber,
    Light,
    Mono,
}

impl ThemePreset {
    pub const ALL: [Self; 3] = [Self::Cyber, Self::Light, Self::Mono];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cyber => "cyber",
            Self::Light => "light",
            Self::Mono => "mono",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Cyber => "Neon accents on a dark canvas",
            Self::Light => "Bright background with dark text",
            Self::Mono => "Minimal monochrome aesthetic",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Cyber => Self::Light,
            Self::Light => Self::Mono,
            Self::Mono => Self::Cyber,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Cyber => Self::Mono,
            Self::Light => Self::Cyber,
            Self::Mono => Self::Light,
        }
    }
}

impl FromStr for ThemePreset {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cyber" | "default" | "neon" => Ok(Self::Cyber),
            "light" | "day" => Ok(Self::Light),
            "mono" | "monochrome" => Ok(Self::Mono),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub canvas: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
    pub selected_bg: Color,
    /// Column accent for the Pending side.
    pub pending: Color,
    /// Column accent for the Completed side.
    pub completed: Color,
    pub accent: Color,
    pub danger: Color,
    pub gauge_fill: Color,
}

impl Theme {
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Cyber => Self {
                canvas: Color::Rgb(5, 5, 16),
                surface: Color::Rgb(15, 18, 34),
                text: Color::Rgb(226, 232, 240),
                text_muted: Color::Rgb(100, 116, 139),
                border: Color::Rgb(51, 65, 85),
                border_focus: Color::Rgb(34, 211, 238),
                selected_bg: Color::Rgb(30, 41, 59),
                pending: Color::Rgb(217, 70, 239),
                completed: Color::Rgb(34, 211, 238),
                accent: Color::Rgb(232, 121, 249),
                danger: Color::Rgb(248, 113, 113),
                gauge_fill: Color::Rgb(34, 211, 238),
            },
            ThemePreset::Light => Self {
                canvas: Color::Rgb(248, 250, 252),
                surface: Color::Rgb(241, 245, 249),
                text: Color::Rgb(15, 23, 42),
                text_muted: Color::Rgb(100, 116, 139),
                border: Color::Rgb(148, 163, 184),
                border_focus: Color::Rgb(8, 145, 178),
                selected_bg: Color::Rgb(226, 232, 240),
                pending: Color::Rgb(162, 28, 175),
                completed: Color::Rgb(14, 116, 144),
                accent: Color::Rgb(192, 38, 211),
                danger: Color::Rgb(185, 28, 28),
                gauge_fill: Color::Rgb(14, 116, 144),
            },
            ThemePreset::Mono => Self {
                canvas: Color::Black,
                surface: Color::Black,
                text: Color::Gray,
                text_muted: Color::DarkGray,
                border: Color::DarkGray,
                border_focus: Color::White,
                selected_bg: Color::DarkGray,
                pending: Color::White,
                completed: Color::Gray,
                accent: Color::White,
                danger: Color::White,
                gauge_fill: Color::White,
            },
        }
    }

    pub fn column_accent(&self, column_index: usize) -> Color {
        if column_index == 0 {
            self.pending
        } else {
            self.completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_parses_aliases() {
        assert_eq!(ThemePreset::from_str("cyber"), Ok(ThemePreset::Cyber));
        assert_eq!(ThemePreset::from_str("default"), Ok(ThemePreset::Cyber));
        assert_eq!(ThemePreset::from_str("DAY"), Ok(ThemePreset::Light));
        assert_eq!(ThemePreset::from_str("monochrome"), Ok(ThemePreset::Mono));
        assert_eq!(ThemePreset::from_str("solarized"), Err(()));
    }

    #[test]
    fn preset_cycle_covers_all_presets() {
        let mut preset = ThemePreset::Cyber;
        for _ in 0..ThemePreset::ALL.len() {
            preset = preset.next();
        }
        assert_eq!(preset, ThemePreset::Cyber);
        assert_eq!(preset.next().previous(), preset);
    }

    #[test]
    fn preset_as_str_roundtrip() {
        for preset in ThemePreset::ALL {
            assert_eq!(ThemePreset::from_str(preset.as_str()), Ok(preset));
        }
    }
}
