//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Post list --
    pub section_header: Style,
    pub post_normal: Style,
    pub post_selected: Style,

    // -- Detail screen --
    pub detail_title: Style,
    pub detail_body: Style,
    pub tile_border: Style,
    pub tile_border_focused: Style,
    pub tile_missing: Style,

    // -- Tile dialog --
    pub dialog_border: Style,
    pub dialog_option: Style,
    pub dialog_option_selected: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub help_heading: Style,
    pub muted: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            section_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            post_normal: Style::default(),
            post_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            detail_title: Style::default().add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            tile_border: Style::default().fg(Color::Blue),
            tile_border_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tile_missing: Style::default().fg(Color::Red),

            dialog_border: Style::default().fg(Color::Yellow),
            dialog_option: Style::default(),
            dialog_option_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
        }
    }

    fn light() -> Self {
        Self {
            section_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            post_normal: Style::default().fg(Color::Black),
            post_selected: Style::default().bg(Color::Blue).fg(Color::White),

            detail_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            tile_border: Style::default().fg(Color::DarkGray),
            tile_border_focused: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tile_missing: Style::default().fg(Color::Red),

            dialog_border: Style::default().fg(Color::Magenta),
            dialog_option: Style::default().fg(Color::Black),
            dialog_option_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let roles = [
            ("section_header", p.section_header),
            ("post_normal", p.post_normal),
            ("post_selected", p.post_selected),
            ("detail_title", p.detail_title),
            ("detail_body", p.detail_body),
            ("tile_border", p.tile_border),
            ("tile_border_focused", p.tile_border_focused),
            ("tile_missing", p.tile_missing),
            ("dialog_border", p.dialog_border),
            ("dialog_option", p.dialog_option),
            ("dialog_option_selected", p.dialog_option_selected),
            ("status_bar", p.status_bar),
            ("panel_border", p.panel_border),
            ("panel_border_focused", p.panel_border_focused),
            ("help_heading", p.help_heading),
            ("muted", p.muted),
        ];

        Self {
            map: roles.into_iter().collect(),
        }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
