//! Completion selection overlay: one paged, filterable list per category

use tracing::debug;

use crate::complete::Proposal;
use crate::input::Action;
use crate::render::OverlayColumn;
use crate::util::unicode::display_width;

/// Smallest overlay: title row, one entry row and two paging rows
pub const MIN_OVERLAY_HEIGHT: usize = 4;
/// Rows always left to the text area while the overlay is shown
pub const MIN_EDITOR_ROWS: usize = 2;
/// Title row plus two paging rows
const DECORATION_ROWS: usize = 3;

/// Height of the overlay for a natural height and screen height
pub fn overlay_height(natural: usize, screen_height: usize) -> usize {
    natural
        .min(screen_height / 2)
        .min(screen_height.saturating_sub(MIN_EDITOR_ROWS))
        .max(MIN_OVERLAY_HEIGHT)
}

/// Result of feeding an action to the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Handled inside the overlay
    Consumed,
    /// A candidate was chosen
    Accepted(String),
    /// Closed without choosing
    Aborted,
    /// Not an overlay action: close and hand it back to the editor
    Unrecognized,
}

/// One category's list
#[derive(Debug, Clone)]
pub struct CategoryList {
    title: String,
    items: Vec<String>,
    /// Indices into `items` matching the filter
    visible: Vec<usize>,
    /// Index into `visible`
    selected: usize,
    page_size: usize,
    filter: String,
    /// The filter prompt is open and receiving text
    filtering: bool,
    width: usize,
}

impl CategoryList {
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        let title = title.into();
        let widest = items.iter().map(|s| display_width(s)).max().unwrap_or(0);
        let width = (widest + 1).max(display_width(&title));
        let visible = (0..items.len()).collect();
        Self {
            title,
            items,
            visible,
            selected: 0,
            page_size: 1,
            filter: String::new(),
            filtering: false,
            width,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currently selected index into the visible items
    pub fn index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.items.get(i))
            .map(|s| s.as_str())
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn page(&self) -> usize {
        self.selected / self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    pub fn on_first_page(&self) -> bool {
        self.page() == 0
    }

    pub fn on_last_page(&self) -> bool {
        self.page() + 1 >= self.total_pages()
    }

    pub fn select(&mut self, idx: usize) {
        self.selected = idx.min(self.visible.len().saturating_sub(1));
    }

    pub fn select_last(&mut self) {
        self.select(self.visible.len().saturating_sub(1));
    }

    pub fn cursor_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.select(self.selected + self.page_size);
        }
    }

    pub fn prev_page(&mut self) {
        if !self.on_first_page() {
            self.selected -= self.page_size;
        }
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn start_filter(&mut self) {
        self.filtering = true;
        self.filter.clear();
        self.refilter();
    }

    pub fn push_filter(&mut self, s: &str) {
        self.filter.push_str(s);
        self.refilter();
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.refilter();
    }

    /// Close the filter prompt, keeping the filter
    pub fn apply_filter(&mut self) {
        self.filtering = false;
    }

    pub fn clear_filter(&mut self) {
        self.filtering = false;
        self.filter.clear();
        self.refilter();
    }

    /// Case-insensitive substring match
    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
    }

    fn column(&self, focused: bool) -> OverlayColumn {
        let start = self.page() * self.page_size;
        let end = (start + self.page_size).min(self.visible.len());
        let items = self.visible[start.min(end)..end]
            .iter()
            .map(|&i| self.items[i].clone())
            .collect();
        let show_filter = self.filtering || !self.filter.is_empty();
        OverlayColumn {
            title: self.title.clone(),
            width: self.width,
            items,
            selected: (!self.visible.is_empty()).then(|| self.selected - start),
            focused,
            page: self.page(),
            pages: self.total_pages(),
            filter: show_filter.then(|| self.filter.clone()),
        }
    }
}

/// An open completion overlay
#[derive(Debug, Clone)]
pub struct CompletionSession {
    lists: Vec<CategoryList>,
    focus: usize,
    /// Chars to delete before the cursor when a candidate is accepted
    delete_count: usize,
    height: usize,
}

impl CompletionSession {
    /// Build the overlay for a proposal. Categories without candidates are
    /// skipped; `None` if nothing is left to choose from.
    pub fn new(proposal: &Proposal, delete_count: usize) -> Option<Self> {
        let lists: Vec<CategoryList> = proposal
            .categories
            .iter()
            .filter_map(|cat| {
                let items = proposal.candidates.get(cat)?;
                (!items.is_empty()).then(|| CategoryList::new(cat.clone(), items.clone()))
            })
            .collect();
        if lists.is_empty() {
            return None;
        }
        let mut session = Self {
            lists,
            focus: 0,
            delete_count,
            height: MIN_OVERLAY_HEIGHT,
        };
        session.set_height(session.natural_height());
        Some(session)
    }

    pub fn lists(&self) -> &[CategoryList] {
        &self.lists
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count
    }

    pub fn focused_list(&self) -> &CategoryList {
        &self.lists[self.focus]
    }

    fn focused_list_mut(&mut self) -> &mut CategoryList {
        &mut self.lists[self.focus]
    }

    /// Height needed to show every list without paging
    pub fn natural_height(&self) -> usize {
        let longest = self.lists.iter().map(|l| l.len()).max().unwrap_or(0);
        longest + DECORATION_ROWS
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(MIN_OVERLAY_HEIGHT);
        let page_size = self.height.saturating_sub(DECORATION_ROWS).max(1);
        for list in &mut self.lists {
            list.set_page_size(page_size);
        }
    }

    /// Focus the next category (wrapping) and select its first item
    pub fn next_category(&mut self) {
        self.focus = (self.focus + 1) % self.lists.len();
        self.focused_list_mut().select(0);
    }

    /// Focus the previous category (wrapping) and select its last item
    pub fn prev_category(&mut self) {
        self.focus = (self.focus + self.lists.len() - 1) % self.lists.len();
        self.focused_list_mut().select_last();
    }

    pub fn handle(&mut self, action: &Action) -> CompletionOutcome {
        if matches!(action, Action::Interrupt) {
            return CompletionOutcome::Aborted;
        }
        if self.focused_list().is_filtering() {
            self.handle_filtering(action);
            return CompletionOutcome::Consumed;
        }

        match action {
            Action::MoveUp => self.focused_list_mut().cursor_up(),
            Action::MoveDown => self.focused_list_mut().cursor_down(),
            Action::CharForward | Action::PageDown => {
                if self.focused_list().on_last_page() {
                    self.next_category();
                } else {
                    self.focused_list_mut().next_page();
                }
            }
            Action::CharBackward | Action::PageUp => {
                if self.focused_list().on_first_page() {
                    self.prev_category();
                } else {
                    self.focused_list_mut().prev_page();
                }
            }
            Action::LineStart | Action::BufferStart => self.focused_list_mut().select(0),
            Action::LineEnd | Action::BufferEnd => self.focused_list_mut().select_last(),
            Action::StartCompletion | Action::HistoryNext => self.next_category(),
            Action::HistoryPrev => self.prev_category(),
            Action::Insert('/') => self.focused_list_mut().start_filter(),
            Action::AbortSearch => self.focused_list_mut().clear_filter(),
            Action::InsertNewline | Action::AcceptCompletion => {
                return match self.focused_list().selected_item() {
                    Some(item) => {
                        debug!(item, "completion accepted");
                        CompletionOutcome::Accepted(item.to_string())
                    }
                    None => CompletionOutcome::Consumed,
                };
            }
            _ => return CompletionOutcome::Unrecognized,
        }
        CompletionOutcome::Consumed
    }

    fn handle_filtering(&mut self, action: &Action) {
        let list = self.focused_list_mut();
        match action {
            Action::Insert(c) => {
                let mut tmp = [0u8; 4];
                list.push_filter(c.encode_utf8(&mut tmp));
            }
            Action::InsertText(s) => list.push_filter(s),
            Action::DeleteBackward => list.pop_filter(),
            Action::InsertNewline | Action::AcceptCompletion => list.apply_filter(),
            Action::AbortSearch => list.clear_filter(),
            _ => {}
        }
    }

    /// Display columns for the overlay
    pub fn columns(&self) -> Vec<OverlayColumn> {
        self.lists
            .iter()
            .enumerate()
            .map(|(i, l)| l.column(i == self.focus))
            .collect()
    }
}
