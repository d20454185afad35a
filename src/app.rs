use std::sync::Arc;

use crate::events::AppEvent;
use crate::explorer::{ExplorerState, Page, build_page, explorer_state};
use crate::nav_stack::{Crumb, NavStack, split_path};
use crate::provider::ProviderSnapshot;
use crate::schema::Schema;

const SCROLL_STEP: u16 = 5;

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    nav: NavStack,
    snapshot: ProviderSnapshot,
    validation_errors: Vec<String>,
    pending_path: Option<Vec<String>>,
    selected: usize,
    scroll: u16,
    follow_selection: bool,
    search: Option<String>,
    refetch_requested: bool,
    source_label: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            ticks: 0,
            nav: NavStack::default(),
            snapshot: ProviderSnapshot::default(),
            validation_errors: Vec::new(),
            pending_path: None,
            selected: 0,
            scroll: 0,
            follow_selection: true,
            search: None,
            refetch_requested: false,
            source_label: String::new(),
        }
    }
}

impl App {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            ..Self::default()
        }
    }

    /// Opens a dotted path (`Type.field.arg`) as soon as a usable schema arrives.
    pub fn with_initial_path(mut self, path: &str) -> Self {
        let segments: Vec<String> = split_path(path).into_iter().map(str::to_string).collect();
        self.pending_path = (!segments.is_empty()).then_some(segments);
        self
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn nav_stack(&self) -> &NavStack {
        &self.nav
    }

    pub fn snapshot(&self) -> &ProviderSnapshot {
        &self.snapshot
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Reconciles the nav stack before returning.
    pub fn apply_snapshot(&mut self, snapshot: ProviderSnapshot) {
        let schema_changed = match (&self.snapshot.schema, &snapshot.schema) {
            (Some(old), Some(new)) => !Arc::ptr_eq(old, new),
            (None, None) => false,
            _ => true,
        };
        self.snapshot = snapshot;
        if schema_changed {
            self.validation_errors = self
                .snapshot
                .schema
                .as_deref()
                .map(Schema::validate)
                .unwrap_or_default();
            for error in &self.validation_errors {
                tracing::warn!(%error, "schema validation error");
            }
        }

        let Some(schema) = self.snapshot.schema.clone() else {
            return;
        };
        let before = self.nav.len();
        let outcome = self.nav.reconcile(&schema);
        if outcome.dropped > 0 {
            tracing::info!(
                kept = outcome.kept,
                dropped = outcome.dropped,
                "nav stack trimmed after schema change"
            );
        }
        if let Some(path) = self.pending_path.take() {
            let segments: Vec<&str> = path.iter().map(String::as_str).collect();
            let resolved = self.nav.open_path(&schema, &segments);
            if resolved < segments.len() {
                tracing::warn!(
                    path = %path.join("."),
                    resolved,
                    "initial path only partially resolved"
                );
            }
        }
        if self.nav.len() != before {
            self.reset_view();
        } else {
            self.clamp_selection();
        }
    }

    pub fn explorer_state(&self) -> ExplorerState<'_> {
        explorer_state(&self.snapshot, &self.validation_errors)
    }

    pub fn current_page(&self) -> Option<Page> {
        let ExplorerState::Ready(schema) = self.explorer_state() else {
            return None;
        };
        let mut page = build_page(schema, self.nav.current());
        if let Some(query) = self.search.as_deref() {
            page.filter(query);
        }
        Some(page)
    }

    pub fn push(&mut self, crumb: Crumb) {
        tracing::debug!(crumb = %crumb.name, depth = self.nav.len(), "push");
        self.nav.push(crumb);
        self.reset_view();
    }

    pub fn go_back(&mut self) -> bool {
        if self.nav.pop().is_none() {
            return false;
        }
        self.reset_view();
        true
    }

    pub fn go_home(&mut self) {
        self.nav.reset();
        self.reset_view();
    }

    pub fn open_selected(&mut self) -> bool {
        let Some(schema) = self.snapshot.schema.clone() else {
            return false;
        };
        let Some(page) = self.current_page() else {
            return false;
        };
        let crumb = page
            .links()
            .get(self.selected)
            .and_then(|entry| entry.target.as_ref())
            .and_then(|target| target.to_crumb(&schema));
        match crumb {
            Some(crumb) => {
                self.push(crumb);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let count = self.link_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
        self.follow_selection = true;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection = true;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn follows_selection(&self) -> bool {
        self.follow_selection
    }

    pub fn set_scroll(&mut self, scroll: u16) {
        self.scroll = scroll;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_selection = false;
    }

    pub fn scroll_down(&mut self, lines: u16, max_scroll: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(max_scroll);
        self.follow_selection = false;
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn start_search(&mut self) {
        self.search = Some(String::new());
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search = None;
        self.clamp_selection();
    }

    pub fn request_refetch(&mut self) {
        self.refetch_requested = true;
    }

    pub fn take_refetch_request(&mut self) -> bool {
        std::mem::take(&mut self.refetch_requested)
    }

    pub fn handle_event(&mut self, event: AppEvent, max_scroll: u16) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Quit => self.quit(),
            AppEvent::MoveUp => self.select_prev(),
            AppEvent::MoveDown => self.select_next(),
            AppEvent::Open => {
                self.open_selected();
            }
            AppEvent::Back => {
                self.go_back();
            }
            AppEvent::Home => self.go_home(),
            AppEvent::ScrollUp | AppEvent::MouseScrollUp => self.scroll_up(SCROLL_STEP),
            AppEvent::ScrollDown | AppEvent::MouseScrollDown => {
                self.scroll_down(SCROLL_STEP, max_scroll)
            }
            AppEvent::Escape => {
                if self.search.is_some() {
                    self.clear_search();
                }
            }
            AppEvent::Backspace => match self.search.as_mut() {
                Some(query) => {
                    if query.pop().is_none() {
                        self.clear_search();
                    } else {
                        self.selected = 0;
                    }
                }
                None => {
                    self.go_back();
                }
            },
            AppEvent::InputChar(c) => {
                if let Some(query) = self.search.as_mut() {
                    query.push(c);
                    self.selected = 0;
                    self.follow_selection = true;
                    return;
                }
                match c {
                    'q' => self.quit(),
                    'r' => self.request_refetch(),
                    '/' => self.start_search(),
                    'j' => self.select_next(),
                    'k' => self.select_prev(),
                    'h' => {
                        self.go_back();
                    }
                    'l' => {
                        self.open_selected();
                    }
                    _ => {}
                }
            }
        }
    }

    fn link_count(&self) -> usize {
        self.current_page()
            .map(|page| page.links().len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let count = self.link_count();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    fn reset_view(&mut self) {
        self.selected = 0;
        self.scroll = 0;
        self.follow_selection = true;
        self.search = None;
    }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
