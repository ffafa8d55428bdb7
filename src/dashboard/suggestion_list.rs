//! Dropdown state for the search box suggestions.

use serde::Serialize;
use utoipa::ToSchema;

use crate::suggestions::service::MIN_TERM_LEN;
use crate::suggestions::CitySuggestion;

pub const NO_MATCHES_NOTE: &str = "No matching cities found";

/// Keys the dropdown reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Down,
    Up,
    Enter,
    Escape,
}

impl ListKey {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "Down" => Some(Self::Down),
            "ArrowUp" | "Up" => Some(Self::Up),
            "Enter" => Some(Self::Enter),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    /// Term the current items were fetched for
    term: String,
    items: Vec<CitySuggestion>,
    highlighted: Option<usize>,
    focused: bool,
    dismissed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SuggestionView {
    pub term: String,
    pub open: bool,
    pub items: Vec<CitySuggestion>,
    pub highlighted: Option<usize>,
    pub note: Option<String>,
}

impl SuggestionList {
    pub fn set_results(&mut self, term: &str, items: Vec<CitySuggestion>) {
        self.term = term.to_string();
        self.items = items;
        self.highlighted = None;
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.dismissed = false;
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.highlighted = None;
    }

    /// Close without committing (outside click, Escape, or the consumer's choice)
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.highlighted = None;
    }

    pub fn is_open(&self) -> bool {
        self.focused && !self.dismissed && !self.items.is_empty()
    }

    /// Apply a key press. Returns the suggestion committed by Enter, if any.
    pub fn handle_key(&mut self, key: ListKey) -> Option<CitySuggestion> {
        if !self.is_open() {
            return None;
        }

        let len = self.items.len();
        match key {
            ListKey::Down => {
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % len));
                None
            }
            ListKey::Up => {
                self.highlighted = Some(self.highlighted.map_or(len - 1, |i| (i + len - 1) % len));
                None
            }
            ListKey::Enter => self.highlighted.and_then(|i| self.select(i)),
            ListKey::Escape => {
                self.dismiss();
                None
            }
        }
    }

    /// Commit the suggestion at `index`, as a click on it would.
    ///
    /// Focus is not required: the input blurs before the click lands.
    pub fn select(&mut self, index: usize) -> Option<CitySuggestion> {
        if self.dismissed {
            return None;
        }
        let chosen = self.items.get(index).cloned()?;
        self.dismiss();
        Some(chosen)
    }

    fn note(&self) -> Option<String> {
        let queried = self.term.trim().chars().count() >= MIN_TERM_LEN;
        (self.focused && queried && self.items.is_empty()).then(|| NO_MATCHES_NOTE.to_string())
    }

    pub fn view(&self) -> SuggestionView {
        SuggestionView {
            term: self.term.clone(),
            open: self.is_open(),
            items: self.items.clone(),
            highlighted: self.highlighted,
            note: self.note(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: u64, name: &str) -> CitySuggestion {
        CitySuggestion {
            id,
            name: name.to_string(),
            full_name: format!("{}, India", name),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn open_list() -> SuggestionList {
        let mut list = SuggestionList::default();
        list.focus();
        list.set_results("Pu", vec![city(1, "Pune"), city(2, "Puri"), city(3, "Pudukkottai")]);
        list
    }

    #[test]
    fn test_open_requires_focus_and_items() {
        let mut list = SuggestionList::default();
        list.set_results("Pu", vec![city(1, "Pune")]);
        assert!(!list.is_open());

        list.focus();
        assert!(list.is_open());

        list.set_results("Pux", Vec::new());
        assert!(!list.is_open());
    }

    #[test]
    fn test_down_wraps_to_first() {
        let mut list = open_list();
        for _ in 0..3 {
            list.handle_key(ListKey::Down);
        }
        assert_eq!(list.view().highlighted, Some(2));

        list.handle_key(ListKey::Down);
        assert_eq!(list.view().highlighted, Some(0));
    }

    #[test]
    fn test_up_wraps_to_last() {
        let mut list = open_list();
        list.handle_key(ListKey::Up);
        assert_eq!(list.view().highlighted, Some(2));

        list.handle_key(ListKey::Down);
        list.handle_key(ListKey::Up);
        list.handle_key(ListKey::Up);
        assert_eq!(list.view().highlighted, Some(1));
    }

    #[test]
    fn test_enter_commits_highlighted() {
        let mut list = open_list();
        list.handle_key(ListKey::Down);
        list.handle_key(ListKey::Down);

        let committed = list.handle_key(ListKey::Enter);

        assert_eq!(committed.map(|c| c.name), Some("Puri".to_string()));
        assert!(!list.is_open());
    }

    #[test]
    fn test_enter_without_highlight_commits_nothing() {
        let mut list = open_list();
        assert!(list.handle_key(ListKey::Enter).is_none());
        assert!(list.is_open());
    }

    #[test]
    fn test_enter_matches_click() {
        let mut by_key = open_list();
        by_key.handle_key(ListKey::Down);
        let mut by_click = open_list();

        assert_eq!(by_key.handle_key(ListKey::Enter), by_click.select(0));
        assert_eq!(by_key.view(), by_click.view());
    }

    #[test]
    fn test_escape_closes_without_commit() {
        let mut list = open_list();
        list.handle_key(ListKey::Down);

        assert!(list.handle_key(ListKey::Escape).is_none());
        assert!(!list.is_open());
        // Closed lists ignore navigation
        assert!(list.handle_key(ListKey::Enter).is_none());
    }

    #[test]
    fn test_blur_and_dismiss_close() {
        let mut list = open_list();
        list.blur();
        assert!(!list.is_open());

        let mut list = open_list();
        list.dismiss();
        assert!(!list.is_open());

        list.focus();
        assert!(list.is_open());
    }

    #[test]
    fn test_results_do_not_reopen_dismissed_list() {
        let mut list = open_list();
        list.handle_key(ListKey::Escape);

        list.set_results("Pun", vec![city(1, "Pune")]);

        assert!(!list.is_open());
        assert!(list.select(0).is_none());
    }

    #[test]
    fn test_click_after_blur_still_commits() {
        let mut list = open_list();
        list.blur();

        let committed = list.select(1);

        assert_eq!(committed.map(|c| c.name), Some("Puri".to_string()));
        assert!(list.select(0).is_none());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut list = open_list();
        assert!(list.select(7).is_none());
        assert!(list.is_open());
    }

    #[test]
    fn test_no_matches_note() {
        let mut list = SuggestionList::default();
        list.focus();
        list.set_results("Zzq", Vec::new());
        assert_eq!(list.view().note.as_deref(), Some(NO_MATCHES_NOTE));

        list.set_results("Z", Vec::new());
        assert!(list.view().note.is_none());
    }

    #[test]
    fn test_parse_dom_keys() {
        assert_eq!(ListKey::parse("ArrowDown"), Some(ListKey::Down));
        assert_eq!(ListKey::parse("ArrowUp"), Some(ListKey::Up));
        assert_eq!(ListKey::parse("Enter"), Some(ListKey::Enter));
        assert_eq!(ListKey::parse("Escape"), Some(ListKey::Escape));
        assert_eq!(ListKey::parse("Tab"), None);
    }
}
