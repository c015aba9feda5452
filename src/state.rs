use crate::config::Config;
use crate::executor::{LaunchError, Launcher};
use crate::matcher;
use crate::model::{Catalog, CatalogEntry};
use crate::status::StatusLine;
use log::{info, warn};

pub const PROMPT: &str = "Type to search for applications.";

/// Which widget receives Up/Down. Typing always edits the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    List,
}

/// Remembers the last row pressed so a second press can count as a double-click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTracker {
    last: Option<(u32, usize)>,
}

impl ClickTracker {
    /// Records a press on `row` at `time` (ms). Returns true when it completes
    /// a double-click, which also consumes the pair.
    pub fn press(&mut self, time: u32, row: usize, window_ms: u32) -> bool {
        let double = matches!(
            self.last,
            Some((t, r)) if r == row && time.wrapping_sub(t) <= window_ms
        );
        self.last = if double { None } else { Some((time, row)) };
        double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub filtered_indices: Vec<usize>,
    pub cursor: Option<usize>,
    pub query: String,
    pub focus: Focus,
    pub status: StatusLine,
    pub clicks: ClickTracker,
    launcher: Launcher,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog, launcher: Launcher) -> Self {
        let mut state = Self {
            config,
            catalog,
            filtered_indices: Vec::new(),
            cursor: None,
            query: String::new(),
            focus: Focus::Query,
            status: StatusLine::default(),
            clicks: ClickTracker::default(),
            launcher,
        };
        state.update_filter();
        state
    }

    pub fn update_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.update_filter();
    }

    pub fn push_text(&mut self, text: &str) {
        let query = format!("{}{}", self.query, text);
        self.update_query(&query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.query.clone();
        if query.pop().is_some() {
            self.update_query(&query);
        }
    }

    /// Replaces the displayed list and resets the cursor to the first row.
    pub fn update_filter(&mut self) {
        self.filtered_indices = matcher::filter(&self.catalog, &self.query);
        self.cursor = (!self.filtered_indices.is_empty()).then_some(0);
        // Row numbers now point at different entries.
        self.clicks.reset();

        if self.query.is_empty() {
            self.status.info(PROMPT);
        } else if self.filtered_indices.is_empty() {
            self.status.info(format!("No applications found matching '{}'.", self.query));
        } else {
            self.status.info(format!("{} application(s) found.", self.filtered_indices.len()));
        }

        info!(
            "AppState: query='{}', filtered_count={}",
            self.query,
            self.filtered_indices.len()
        );
    }

    pub fn displayed(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.filtered_indices.iter().filter_map(|&i| self.catalog.get(i))
    }

    // No wraparound at either end.
    pub fn move_down(&mut self) {
        let len = self.filtered_indices.len();
        if len == 0 {
            return;
        }
        self.cursor = Some(match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    pub fn move_up(&mut self) {
        let len = self.filtered_indices.len();
        if len == 0 {
            return;
        }
        self.cursor = Some(match self.cursor {
            None => len - 1,
            Some(i) => i.saturating_sub(1).min(len - 1),
        });
    }

    /// Down arrow: from the query field it also hands focus to the list.
    pub fn key_down(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.move_down();
        self.focus = Focus::List;
    }

    pub fn key_up(&mut self) {
        self.move_up();
    }

    /// Pointer selection. Returns false if `row` is past the end of the list.
    pub fn select_row(&mut self, row: usize) -> bool {
        if row >= self.filtered_indices.len() {
            return false;
        }
        self.cursor = Some(row);
        self.focus = Focus::List;
        true
    }

    /// Pointer press on a list row, or on empty list space when `row` is `None`.
    /// A second press on the same row within `double_click_ms` launches it.
    pub fn press_row(&mut self, row: Option<usize>, time: u32) {
        let selected = row.filter(|&r| r < self.filtered_indices.len());
        let Some(row) = selected else {
            self.clicks.reset();
            return;
        };
        self.select_row(row);
        if self.clicks.press(time, row, self.config.general.double_click_ms) {
            self.launch_selected();
        }
    }

    /// Pointer press on the query field.
    pub fn focus_query(&mut self) {
        self.focus = Focus::Query;
        self.clicks.reset();
    }

    /// Launches the entry under the cursor, or the first row if nothing is selected.
    pub fn launch_selected(&mut self) {
        if self.filtered_indices.is_empty() {
            self.status.error("No application selected or found to launch.");
            return;
        }

        let row = *self.cursor.get_or_insert(0);
        let Some(entry) = self
            .filtered_indices
            .get(row)
            .and_then(|&i| self.catalog.get(i))
            .cloned()
        else {
            warn!("Cursor {} outside of {} displayed rows", row, self.filtered_indices.len());
            self.status.error("Error: Selection index out of range.");
            return;
        };

        self.status.info(format!("Launching {}...", entry.name));
        match self.launcher.launch(&entry) {
            Ok(()) => {
                self.status.success(format!("Successfully launched {}.", entry.name));
            }
            Err(LaunchError::NotFound { command }) => {
                warn!("Launch of {} failed: {} not found", entry.name, command);
                self.status.error(format!(
                    "Error: App path not found for {} ({}).",
                    entry.name, command
                ));
            }
            Err(err) => {
                warn!("Launch of {} failed: {}", entry.name, err);
                self.status.error(format!("Error launching {}: {}", entry.name, err));
            }
        }
    }
}
