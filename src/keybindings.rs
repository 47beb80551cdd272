//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are looked up per context (list screen, detail screen, tile
//! dialog) with a fallback to the global context.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Select,
    Back,
    Refresh,
    CycleTheme,
    ShowHelp,
    /// Open the tile dialog for a specific tile (0-based).
    PickTile(usize),
    DraftPrev,
    DraftNext,
    ChooseLabel,
    DismissDialog,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::Select => "Open post / edit tile",
            Self::Back => "Back to post list",
            Self::Refresh => "Fetch posts again",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::PickTile(0) => "Edit tile 1",
            Self::PickTile(1) => "Edit tile 2",
            Self::PickTile(2) => "Edit tile 3",
            Self::PickTile(_) => "Edit tile 4",
            Self::DraftPrev => "Previous label",
            Self::DraftNext => "Next label",
            Self::ChooseLabel => "Apply highlighted label",
            Self::DismissDialog => "Close without changes",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    PostList,
    Detail,
    TileDialog,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right", "Space"
/// - Modifier combos: "Ctrl+r"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::*;

        let defaults = [
            // === Global ===
            (Global, KeySpec::char('q'), Action::Quit),
            (Global, KeySpec::char('j'), Action::NavDown),
            (Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
            (Global, KeySpec::char('k'), Action::NavUp),
            (Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
            (Global, KeySpec::plain(KeyCode::Enter), Action::Select),
            (Global, KeySpec::char('T'), Action::CycleTheme),
            (Global, KeySpec::char('?'), Action::ShowHelp),
            // === Post list ===
            (PostList, KeySpec::char('r'), Action::Refresh),
            // === Detail screen ===
            (Detail, KeySpec::plain(KeyCode::Esc), Action::Back),
            (Detail, KeySpec::char('b'), Action::Back),
            (Detail, KeySpec::char('1'), Action::PickTile(0)),
            (Detail, KeySpec::char('2'), Action::PickTile(1)),
            (Detail, KeySpec::char('3'), Action::PickTile(2)),
            (Detail, KeySpec::char('4'), Action::PickTile(3)),
            // === Tile dialog ===
            (TileDialog, KeySpec::char('h'), Action::DraftPrev),
            (TileDialog, KeySpec::plain(KeyCode::Left), Action::DraftPrev),
            (TileDialog, KeySpec::char('k'), Action::DraftPrev),
            (TileDialog, KeySpec::plain(KeyCode::Up), Action::DraftPrev),
            (TileDialog, KeySpec::char('l'), Action::DraftNext),
            (TileDialog, KeySpec::plain(KeyCode::Right), Action::DraftNext),
            (TileDialog, KeySpec::char('j'), Action::DraftNext),
            (TileDialog, KeySpec::plain(KeyCode::Down), Action::DraftNext),
            (TileDialog, KeySpec::plain(KeyCode::Enter), Action::ChooseLabel),
            (TileDialog, KeySpec::plain(KeyCode::Esc), Action::DismissDialog),
        ];

        for (context, key, action) in defaults {
            self.bind(context, key, action);
        }
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "refresh").
    /// Values are key strings (e.g., "q", "Ctrl+r", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global. The tile
    /// dialog is modal and does not fall back, except for Quit.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted characters arrive with SHIFT set; the char already carries the case
        let mut modifiers = modifiers;
        if matches!(code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        match (context, self.lookup.get(&(Context::Global, key))) {
            (Context::Global, _) | (_, None) => None,
            (Context::TileDialog, Some(&action)) => (action == Action::Quit).then_some(action),
            (_, Some(&action)) => Some(action),
        }
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "select" | "enter" => Some(Action::Select),
        "back" => Some(Action::Back),
        "refresh" => Some(Action::Refresh),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        "tile_1" => Some(Action::PickTile(0)),
        "tile_2" => Some(Action::PickTile(1)),
        "tile_3" => Some(Action::PickTile(2)),
        "tile_4" => Some(Action::PickTile(3)),
        "draft_prev" | "prev_label" => Some(Action::DraftPrev),
        "draft_next" | "next_label" => Some(Action::DraftNext),
        "choose_label" | "choose" => Some(Action::ChooseLabel),
        "dismiss" | "dismiss_dialog" => Some(Action::DismissDialog),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
