//! Palette and semantic styling for the console.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const TEAL: Color = Color::Rgb(94, 234, 212); // #5eead4
pub const STEEL_BLUE: Color = Color::Rgb(125, 160, 220); // #7da0dc
pub const AMBER: Color = Color::Rgb(251, 191, 36); // #fbbf24
pub const SUCCESS_GREEN: Color = Color::Rgb(74, 222, 128); // #4ade80
pub const ERROR_RED: Color = Color::Rgb(248, 113, 113); // #f87171

// ── Extended Palette ──────────────────────────────────────────────────

pub const FOG: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const SLATE: Color = Color::Rgb(100, 116, 139); // #64748b
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // #1e293b

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(TEAL)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(SLATE)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(STEEL_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(FOG)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(TEAL)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Permission code tag in tables and panels.
pub fn tag() -> Style {
    Style::default().fg(STEEL_BLUE)
}

/// The red "None" tag for a user without permissions.
pub fn tag_none() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Form field label.
pub fn form_label() -> Style {
    Style::default().fg(SLATE)
}

/// Form field value being edited.
pub fn form_value() -> Style {
    Style::default().fg(FOG)
}

/// Status-bar notification, by severity.
pub fn notify(level: crate::action::NotifyLevel) -> Style {
    let color = match level {
        crate::action::NotifyLevel::Success => SUCCESS_GREEN,
        crate::action::NotifyLevel::Error => ERROR_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(SLATE)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}
