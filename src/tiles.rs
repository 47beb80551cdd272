//! Labeled tiles on the detail screen and the dialog that relabels them.
//!
//! A [`TileMap`] holds one label per tile index in a fixed domain. Labels
//! come from a fixed catalog and name visual assets, resolved for the
//! terminal by [`resolve_asset`]. [`TileSelection`] is the two-state machine
//! behind the "Select an Image" dialog:
//!
//! ```text
//! Closed --select_tile(i)--> Open(i)
//! Open(i) --choose_label(l)--> Closed   (tiles[i] = l)
//! Open(i) --dismiss--> Closed           (tiles untouched)
//! ```

use ratatui::style::Color;
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of tiles on a detail screen. Indices are `0..TILE_COUNT`.
pub const TILE_COUNT: usize = 4;

/// Labels a tile can carry, in dialog order.
pub const LABEL_CATALOG: [&str; 4] = [
    "API Gateway",
    "EC2",
    "Service Holder",
    "Simple Storage Service",
];

// ============================================================================
// Asset Catalog
// ============================================================================

/// Terminal rendition of a labeled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    /// Short badge drawn inside the tile.
    pub glyph: &'static str,
    pub color: Color,
}

/// Resolve a label to its asset by exact match. Unknown labels yield `None`.
pub fn resolve_asset(label: &str) -> Option<Asset> {
    let (glyph, color) = match label {
        "API Gateway" => ("[API]", Color::Magenta),
        "EC2" => ("[EC2]", Color::Yellow),
        "Service Holder" => ("[SVC]", Color::Cyan),
        "Simple Storage Service" => ("[S3]", Color::Green),
        _ => return None,
    };
    Some(Asset { glyph, color })
}

fn catalog_position(label: &str) -> Option<usize> {
    LABEL_CATALOG.iter().position(|l| *l == label)
}

// ============================================================================
// Errors
// ============================================================================

/// Calls that do not correspond to a legal transition.
///
/// The key handlers never produce these; they exist so a misuse is reported
/// instead of silently corrupting the tile map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No tile at index {0}")]
    UnknownTile(usize),

    #[error("A tile dialog is already open")]
    DialogAlreadyOpen,

    #[error("No tile dialog is open")]
    DialogClosed,
}

// ============================================================================
// Tile Map
// ============================================================================

/// Tile index to label.
///
/// Every index in `0..TILE_COUNT` always has a label; entries are overwritten
/// but never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    labels: BTreeMap<usize, String>,
}

impl TileMap {
    /// Label of the tile at `index`, if the index is in the domain.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    /// Tiles in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(|(i, l)| (*i, l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Overwrite the label at `index`. Only reachable through
    /// [`TileSelection::choose_label`].
    fn assign(&mut self, index: usize, label: &str) {
        if let Some(slot) = self.labels.get_mut(&index) {
            label.clone_into(slot);
        }
    }
}

impl Default for TileMap {
    fn default() -> Self {
        let labels = LABEL_CATALOG
            .iter()
            .take(TILE_COUNT)
            .enumerate()
            .map(|(i, label)| (i, (*label).to_string()))
            .collect();
        Self { labels }
    }
}

// ============================================================================
// Selection State Machine
// ============================================================================

/// An open dialog: which tile is being relabeled and which catalog entry is
/// highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDialog {
    pub index: usize,
    /// Position in [`LABEL_CATALOG`] of the highlighted label.
    pub draft: usize,
}

impl TileDialog {
    pub fn draft_label(&self) -> &'static str {
        LABEL_CATALOG[self.draft]
    }
}

/// Dialog state for one detail screen. `None` is the closed state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSelection {
    dialog: Option<TileDialog>,
}

impl TileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// Tile being relabeled. `Some` exactly while the dialog is open.
    pub fn active_index(&self) -> Option<usize> {
        self.dialog.map(|d| d.index)
    }

    pub fn dialog(&self) -> Option<&TileDialog> {
        self.dialog.as_ref()
    }

    /// Highlighted label while the dialog is open.
    pub fn draft_label(&self) -> Option<&'static str> {
        self.dialog.map(|d| d.draft_label())
    }

    /// Open the dialog for the tile at `index`.
    ///
    /// The highlight starts on the tile's current label.
    pub fn select_tile(&mut self, tiles: &TileMap, index: usize) -> Result<(), SelectionError> {
        if self.dialog.is_some() {
            return Err(SelectionError::DialogAlreadyOpen);
        }
        let current = tiles.get(index).ok_or(SelectionError::UnknownTile(index))?;
        let draft = catalog_position(current).unwrap_or(0);

        self.dialog = Some(TileDialog { index, draft });
        tracing::debug!(index, draft = LABEL_CATALOG[draft], "Tile dialog opened");
        Ok(())
    }

    /// Apply `label` to the active tile and close the dialog.
    ///
    /// Returns the index that was relabeled. Any string is stored; labels
    /// outside the catalog only fail later, in [`resolve_asset`].
    pub fn choose_label(
        &mut self,
        tiles: &mut TileMap,
        label: &str,
    ) -> Result<usize, SelectionError> {
        let dialog = self.dialog.ok_or(SelectionError::DialogClosed)?;

        tiles.assign(dialog.index, label);
        self.dialog = None;
        tracing::debug!(index = dialog.index, label, "Tile relabeled");
        Ok(dialog.index)
    }

    /// Apply the highlighted label. Same transition as [`Self::choose_label`].
    pub fn choose_draft(&mut self, tiles: &mut TileMap) -> Result<usize, SelectionError> {
        let label = self.draft_label().ok_or(SelectionError::DialogClosed)?;
        self.choose_label(tiles, label)
    }

    /// Close the dialog without touching the tiles. No-op when closed.
    pub fn dismiss(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            tracing::debug!(index = dialog.index, "Tile dialog dismissed");
        }
    }

    /// Move the highlight by `delta` catalog entries, clamped to the catalog.
    pub fn move_draft(&mut self, delta: isize) {
        if let Some(dialog) = &mut self.dialog {
            let max = LABEL_CATALOG.len() - 1;
            dialog.draft = dialog.draft.saturating_add_signed(delta).min(max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_tiles() {
        let tiles = TileMap::default();
        assert_eq!(tiles.len(), TILE_COUNT);
        assert_eq!(tiles.get(0), Some("API Gateway"));
        assert_eq!(tiles.get(1), Some("EC2"));
        assert_eq!(tiles.get(2), Some("Service Holder"));
        assert_eq!(tiles.get(3), Some("Simple Storage Service"));
        assert_eq!(tiles.get(4), None);
    }

    #[test]
    fn test_tiles_iterate_in_index_order() {
        let tiles = TileMap::default();
        let indices: Vec<usize> = tiles.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_initial_state_closed() {
        let selection = TileSelection::new();
        assert!(!selection.is_dialog_open());
        assert_eq!(selection.active_index(), None);
        assert_eq!(selection.draft_label(), None);
    }

    #[test]
    fn test_select_then_choose_round_trip() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();

        selection.select_tile(&tiles, 2).unwrap();
        assert!(selection.is_dialog_open());
        assert_eq!(selection.active_index(), Some(2));

        let index = selection.choose_label(&mut tiles, "EC2").unwrap();
        assert_eq!(index, 2);
        assert_eq!(tiles.get(2), Some("EC2"));
        assert!(!selection.is_dialog_open());
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn test_dismiss_leaves_tiles_untouched() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();
        let before = tiles.clone();

        selection.select_tile(&tiles, 1).unwrap();
        selection.move_draft(2);
        selection.dismiss();

        assert_eq!(tiles, before);
        assert_eq!(tiles.get(1), Some("EC2"));
        assert!(!selection.is_dialog_open());
        assert_eq!(selection.active_index(), None);

        // Closed again, so a choice is now rejected
        assert_eq!(
            selection.choose_label(&mut tiles, "EC2"),
            Err(SelectionError::DialogClosed)
        );
    }

    #[test]
    fn test_choose_while_closed_is_rejected() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();
        assert_eq!(
            selection.choose_label(&mut tiles, "EC2"),
            Err(SelectionError::DialogClosed)
        );
        assert_eq!(tiles, TileMap::default());
    }

    #[test]
    fn test_select_unknown_tile() {
        let tiles = TileMap::default();
        let mut selection = TileSelection::new();
        assert_eq!(
            selection.select_tile(&tiles, TILE_COUNT),
            Err(SelectionError::UnknownTile(TILE_COUNT))
        );
        assert!(!selection.is_dialog_open());
    }

    #[test]
    fn test_select_while_open_is_rejected() {
        let tiles = TileMap::default();
        let mut selection = TileSelection::new();
        selection.select_tile(&tiles, 0).unwrap();
        assert_eq!(
            selection.select_tile(&tiles, 3),
            Err(SelectionError::DialogAlreadyOpen)
        );
        assert_eq!(selection.active_index(), Some(0));
    }

    #[test]
    fn test_label_outside_catalog_is_stored() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();
        selection.select_tile(&tiles, 2).unwrap();

        assert_eq!(selection.choose_label(&mut tiles, "Lambda"), Ok(2));
        assert_eq!(tiles.get(2), Some("Lambda"));
        assert!(!selection.is_dialog_open());
        assert_eq!(resolve_asset("Lambda"), None);

        // Reopening falls back to the first catalog entry
        selection.select_tile(&tiles, 2).unwrap();
        assert_eq!(selection.draft_label(), Some("API Gateway"));
    }

    #[test]
    fn test_repeated_choice_is_idempotent() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();

        selection.select_tile(&tiles, 3).unwrap();
        selection.choose_label(&mut tiles, "EC2").unwrap();
        let after_first = tiles.clone();

        selection.select_tile(&tiles, 3).unwrap();
        selection.choose_label(&mut tiles, "EC2").unwrap();
        assert_eq!(tiles, after_first);
    }

    #[test]
    fn test_draft_starts_on_current_label() {
        let tiles = TileMap::default();
        let mut selection = TileSelection::new();
        selection.select_tile(&tiles, 2).unwrap();
        assert_eq!(selection.draft_label(), Some("Service Holder"));
    }

    #[test]
    fn test_move_draft_clamps() {
        let tiles = TileMap::default();
        let mut selection = TileSelection::new();
        selection.select_tile(&tiles, 0).unwrap();

        selection.move_draft(-1);
        assert_eq!(selection.draft_label(), Some("API Gateway"));

        selection.move_draft(10);
        assert_eq!(selection.draft_label(), Some("Simple Storage Service"));
    }

    #[test]
    fn test_move_draft_when_closed_is_noop() {
        let mut selection = TileSelection::new();
        selection.move_draft(1);
        assert!(!selection.is_dialog_open());
    }

    #[test]
    fn test_choose_draft_applies_highlight() {
        let mut tiles = TileMap::default();
        let mut selection = TileSelection::new();
        selection.select_tile(&tiles, 0).unwrap();
        selection.move_draft(1);

        selection.choose_draft(&mut tiles).unwrap();
        assert_eq!(tiles.get(0), Some("EC2"));
        assert!(!selection.is_dialog_open());
    }

    #[test]
    fn test_resolve_asset() {
        for label in LABEL_CATALOG {
            assert!(resolve_asset(label).is_some(), "missing asset for {}", label);
        }
        assert_eq!(resolve_asset("ec2"), None);
        assert_eq!(resolve_asset(""), None);
    }
}
