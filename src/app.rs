use crate::keybindings::KeybindingRegistry;
use crate::posts::{flatten_rows, group_by_author, FetchError, Post, PostFetcher, PostStore};
use crate::theme::{StyleMap, ThemeVariant};
use crate::tiles::{SelectionError, TileMap, TileSelection, TILE_COUNT};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status bar message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View and Event Types
// ============================================================================

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,   // Posts grouped by author
    Detail, // One post with its tile grid
}

/// Events from background tasks
pub enum AppEvent {
    /// Outcome of one `PostFetcher::spawn_fetch` invocation.
    PostsFetched(Result<Vec<Post>, FetchError>),
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Detail Screen State
// ============================================================================

/// State owned by one visit to the detail screen.
///
/// Built fresh on every `enter_detail`, so tile labels chosen for one post
/// do not carry over to the next.
#[derive(Debug, Clone)]
pub struct DetailScreen {
    pub post: Post,
    pub tiles: TileMap,
    pub selection: TileSelection,
    /// Highlighted tile in the grid while no dialog is open.
    pub tile_cursor: usize,
}

impl DetailScreen {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            tiles: TileMap::default(),
            selection: TileSelection::new(),
            tile_cursor: 0,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub fetcher: PostFetcher,
    pub store: PostStore,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub view: View,
    /// Index into the flattened post rows (headers excluded).
    pub selected_row: usize,
    pub detail: Option<DetailScreen>,

    /// Fetches spawned but not yet reported back.
    pub pending_fetches: usize,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the fetch spinner, advanced on tick while fetching.
    pub spinner_frame: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
    /// Upper bound for `help_scroll_offset` at the last drawn terminal size.
    pub help_max_scroll: usize,
}

impl App {
    pub fn new(fetcher: PostFetcher) -> Self {
        Self {
            fetcher,
            store: PostStore::new(),
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            view: View::List,
            selected_row: 0,
            detail: None,
            pending_fetches: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            help_max_scroll: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Start a background fetch. The result arrives as `AppEvent::PostsFetched`.
    pub fn fetch_posts(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        // Detached: overlapping fetches are neither cancelled nor versioned
        drop(self.fetcher.spawn_fetch(event_tx));
        self.pending_fetches += 1;
        self.needs_redraw = true;
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_fetches > 0
    }

    /// Apply a completed fetch.
    ///
    /// Success replaces the whole collection in server order. Failures leave
    /// the collection as it was and only surface on the status bar.
    pub fn apply_fetch_result(&mut self, result: Result<Vec<Post>, FetchError>) {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);

        match result {
            Ok(posts) => {
                let count = posts.len();
                self.store.replace(posts);
                self.clamp_selection();
                self.set_status(format!("Loaded {} posts", count));
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = ?e.kind(),
                    endpoint = %self.fetcher.endpoint(),
                    "Fetching posts failed"
                );
                self.set_status(format!("Fetch failed: {}", e));
            }
        }
    }

    /// A background task died without reporting a result.
    pub fn task_panicked(&mut self, task: &'static str, error: &str) {
        tracing::error!(task, error, "Background task panicked");
        if task == "fetch_posts" {
            self.pending_fetches = self.pending_fetches.saturating_sub(1);
        }
        self.set_status(format!("Internal error in {} task", task));
    }

    /// Called when the store publishes a new collection.
    pub fn posts_changed(&mut self) {
        self.clamp_selection();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // List screen
    // ------------------------------------------------------------------------

    /// Number of selectable rows in the list screen.
    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    /// Post under the list cursor, in display order.
    pub fn selected_post(&self) -> Option<Post> {
        let posts = self.store.snapshot();
        let grouped = group_by_author(&posts);
        flatten_rows(&grouped)
            .get(self.selected_row)
            .map(|post| (*post).clone())
    }

    /// Keep the list cursor inside the current rows.
    pub fn clamp_selection(&mut self) {
        let count = self.row_count();
        self.selected_row = if count == 0 {
            0
        } else {
            self.selected_row.min(count - 1)
        };

        debug_assert!(
            count == 0 || self.selected_row < count,
            "selected_row {} out of bounds for {} rows",
            self.selected_row,
            count
        );
    }

    pub fn nav_up(&mut self) {
        match self.detail.as_mut() {
            Some(detail) => detail.tile_cursor = detail.tile_cursor.saturating_sub(1),
            None => self.selected_row = self.selected_row.saturating_sub(1),
        }
    }

    pub fn nav_down(&mut self) {
        match self.detail.as_mut() {
            Some(detail) => {
                detail.tile_cursor = detail.tile_cursor.saturating_add(1).min(TILE_COUNT - 1);
            }
            None => {
                let count = self.row_count();
                if count > 0 {
                    self.selected_row = self.selected_row.saturating_add(1).min(count - 1);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Detail screen
    // ------------------------------------------------------------------------

    /// Open the detail screen for the post under the list cursor.
    ///
    /// Returns false when the list is empty.
    pub fn enter_detail(&mut self) -> bool {
        let Some(post) = self.selected_post() else {
            return false;
        };

        tracing::debug!(post_id = post.id, author_id = post.author_id, "Opening post");
        self.detail = Some(DetailScreen::new(post));
        self.view = View::Detail;
        true
    }

    /// Back to the list. Drops the screen's tiles and any open dialog.
    pub fn exit_detail(&mut self) {
        self.detail = None;
        self.view = View::List;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.detail
            .as_ref()
            .is_some_and(|d| d.selection.is_dialog_open())
    }

    /// Open the label dialog for `index`, or the tile under the cursor.
    pub fn open_tile_dialog(&mut self, index: Option<usize>) -> Result<(), SelectionError> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(());
        };
        let index = index.unwrap_or(detail.tile_cursor);
        detail.selection.select_tile(&detail.tiles, index)?;
        detail.tile_cursor = index;
        Ok(())
    }

    /// Apply the highlighted label to the active tile and close the dialog.
    pub fn choose_tile_label(&mut self) -> Result<(), SelectionError> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(());
        };
        let index = detail.selection.choose_draft(&mut detail.tiles)?;
        if let Some(label) = detail.tiles.get(index).map(str::to_owned) {
            self.set_status(format!("Tile {} set to {}", index + 1, label));
        }
        Ok(())
    }

    pub fn dismiss_tile_dialog(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.selection.dismiss();
        }
    }

    pub fn move_draft(&mut self, delta: isize) {
        if let Some(detail) = self.detail.as_mut() {
            detail.selection.move_draft(delta);
        }
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
