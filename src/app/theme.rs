//! Color tables and the font-size to spacing mapping.

use ratatui::style::Color;

use crate::tlp::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeName {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub default_accent: Color,
    pub recharge_accent: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Theme {
                background: Color::White,
                text: Color::Black,
                default_accent: Color::DarkGray,
                recharge_accent: Color::Yellow,
            },
            ThemeName::Dark => Theme {
                background: Color::Black,
                text: Color::White,
                default_accent: Color::Gray,
                recharge_accent: Color::Red,
            },
        }
    }

    /// Highlight color for the currently active profile.
    pub fn accent(&self, profile: Profile) -> Color {
        match profile {
            Profile::Default => self.default_accent,
            Profile::Recharge => self.recharge_accent,
        }
    }
}

/// Spacing derived from the font-size level, the TUI stand-in for an
/// actual font table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub horizontal: u16,
    pub vertical: u16,
}

pub fn scale_for(font_size: u8) -> Scale {
    match font_size {
        1 => Scale {
            horizontal: 0,
            vertical: 0,
        },
        2 => Scale {
            horizontal: 1,
            vertical: 0,
        },
        3 => Scale {
            horizontal: 2,
            vertical: 1,
        },
        4 => Scale {
            horizontal: 4,
            vertical: 1,
        },
        _ => Scale {
            horizontal: 6,
            vertical: 2,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_a_scale() {
        let scales: Vec<Scale> = (1..=5).map(scale_for).collect();
        assert_eq!(scales.len(), 5);
        assert!(scales[0].horizontal < scales[4].horizontal);
    }

    #[test]
    fn accent_tracks_profile() {
        let theme = Theme::from_name(ThemeName::Light);
        assert_eq!(theme.accent(Profile::Default), theme.default_accent);
        assert_eq!(theme.accent(Profile::Recharge), theme.recharge_accent);
    }
}
