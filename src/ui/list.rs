//! Filterable selection list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::catalog::Item;

/// Rows one entry takes on screen: title, description, spacer.
pub const ITEM_HEIGHT: u16 = 3;

/// Rows used by the list title, filter line and short key help.
pub const CHROME_HEIGHT: u16 = 4;

/// Rows the expanded key help takes instead of the one-line summary.
pub const FULL_HELP_HEIGHT: u16 = 3;

/// What a key did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    /// The key moved the cursor, edited the filter or toggled help.
    Handled,
    /// The list has no use for the key.
    Ignored,
    /// The user asked to leave: `q`, or `esc` with no filter to clear.
    Quit,
}

/// Filter input state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// All items are shown.
    #[default]
    Off,
    /// The user is typing a filter.
    Editing(String),
    /// A filter is active but no longer being edited.
    Applied(String),
}

impl Filter {
    /// The filter text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Off => None,
            Self::Editing(text) | Self::Applied(text) => Some(text),
        }
    }
}

/// A titled list with a cursor and an optional case-insensitive filter.
///
/// The list interprets navigation and filter keys itself; accepting the
/// highlighted item is left to the caller via [`selected_item`](Self::selected_item).
#[derive(Debug, Clone)]
pub struct SelectList<T> {
    title: String,
    items: Vec<T>,
    filter: Filter,
    visible: Vec<usize>,
    cursor: usize,
    full_help: bool,
    width: u16,
    height: u16,
}

impl<T: Item> SelectList<T> {
    /// Creates a list showing `items`.
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        let mut list = Self {
            title: title.into(),
            items,
            filter: Filter::Off,
            visible: Vec::new(),
            cursor: 0,
            full_help: false,
            width: 0,
            height: 0,
        };
        list.refilter();
        list
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the items, clearing the filter and moving the cursor to the top.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.filter = Filter::Off;
        self.refilter();
    }

    /// Moves the cursor back to the first visible item.
    pub fn reset_selected(&mut self) {
        self.cursor = 0;
    }

    /// Records the space available for the list.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Returns the last size given to [`set_size`](Self::set_size).
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Returns `true` while the expanded key help is shown.
    pub fn full_help(&self) -> bool {
        self.full_help
    }

    /// Rows the key help currently takes.
    pub fn help_height(&self) -> u16 {
        if self.full_help {
            FULL_HELP_HEIGHT
        } else {
            1
        }
    }

    /// Number of items one page key moves by.
    pub fn page_size(&self) -> usize {
        let chrome = CHROME_HEIGHT - 1 + self.help_height();
        usize::from((self.height.saturating_sub(chrome) / ITEM_HEIGHT).max(1))
    }

    /// The current filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Index of the highlighted row among the visible items.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items passing the filter, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(|&i| &self.items[i])
    }

    /// Number of items passing the filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The highlighted item, or `None` when the filter matches nothing.
    pub fn selected_item(&self) -> Option<&T> {
        self.visible.get(self.cursor).map(|&i| &self.items[i])
    }

    /// Applies a navigation, filter or help key.
    ///
    /// While a filter is being typed every printable key is text, so
    /// [`ListAction::Quit`] only comes back while browsing.
    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        if let Filter::Editing(text) = &mut self.filter {
            match key.code {
                KeyCode::Esc => self.filter = Filter::Off,
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Tab => {
                    let text = std::mem::take(text);
                    self.filter = Filter::Applied(text);
                    return ListAction::Handled;
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    text.push(c);
                }
                KeyCode::Up => {
                    self.move_up(1);
                    return ListAction::Handled;
                }
                KeyCode::Down => {
                    self.move_down(1);
                    return ListAction::Handled;
                }
                _ => return ListAction::Ignored,
            }
            self.refilter();
            return ListAction::Handled;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp | KeyCode::Left | KeyCode::Char('h') => self.move_up(self.page_size()),
            KeyCode::PageDown | KeyCode::Right | KeyCode::Char('l') => {
                self.move_down(self.page_size());
            }
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.cursor = self.visible.len().saturating_sub(1),
            KeyCode::Char('/') => {
                self.filter = Filter::Editing(String::new());
                self.refilter();
            }
            KeyCode::Esc if self.filter != Filter::Off => {
                self.filter = Filter::Off;
                self.refilter();
            }
            KeyCode::Char('?') => self.full_help = !self.full_help,
            KeyCode::Char('q') | KeyCode::Esc => return ListAction::Quit,
            _ => return ListAction::Ignored,
        }
        ListAction::Handled
    }

    fn move_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
    }

    fn move_down(&mut self, by: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + by).min(last);
    }

    fn refilter(&mut self) {
        let needle = self.filter.text().map(str::to_lowercase).unwrap_or_default();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.filter_value().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
    }
}
