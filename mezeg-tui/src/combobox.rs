//! Searchable locality picker: a text query over the catalog with a
//! keyboard-driven dropdown.
//!
//! The widget is a plain state machine over (query, open flag, highlighted
//! row); rendering lives in `ui` and the terminal never leaks in here, so
//! every transition is unit-testable.

use crossterm::event::KeyCode;
use mezeg_core::Locality;

/// Display cap for the dropdown. Matching is unaffected; only this many
/// rows are offered.
pub const MAX_VISIBLE_MATCHES: usize = 100;

/// Reported to the orchestrator when an input event changed the committed
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// A locality was committed; the canonical name is the lookup key.
    Selected(String),
    /// The query was emptied and the prior selection no longer applies.
    Cleared,
}

#[derive(Debug)]
pub struct CitySearch {
    localities: Vec<Locality>,
    query: String,
    open: bool,
    /// Index into `filtered`; -1 means no row highlighted.
    highlight: isize,
    /// Indices into `localities` matching the current query, in catalog
    /// order, capped at [`MAX_VISIBLE_MATCHES`].
    filtered: Vec<usize>,
    /// Match count before the display cap.
    total_matches: usize,
    /// Canonical name of the committed selection, if any.
    selection: Option<String>,
}

impl CitySearch {
    pub fn new(localities: Vec<Locality>) -> Self {
        let mut search = Self {
            localities,
            query: String::new(),
            open: false,
            highlight: -1,
            filtered: Vec::new(),
            total_matches: 0,
            selection: None,
        };
        search.refilter();
        search
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlight(&self) -> Option<usize> {
        usize::try_from(self.highlight).ok()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Rows currently offered by the dropdown.
    pub fn matches(&self) -> impl Iterator<Item = &Locality> {
        self.filtered.iter().map(|&idx| &self.localities[idx])
    }

    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    /// Matches for the current query before the display cap; lets the status
    /// line show when the dropdown is clipped.
    pub fn total_match_count(&self) -> usize {
        self.total_matches
    }

    /// Apply one key event. Returns a selection change when one occurred.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<SelectionChange> {
        match code {
            KeyCode::Char(c) => self.edit_query(|q| q.push(c)),
            KeyCode::Backspace => self.edit_query(|q| {
                q.pop();
            }),

            KeyCode::Down => {
                if self.open {
                    if self.highlight + 1 < self.filtered.len() as isize {
                        self.highlight += 1;
                    }
                } else {
                    self.open = true;
                }
                None
            }
            KeyCode::Up => {
                if self.open && self.highlight > -1 {
                    self.highlight -= 1;
                }
                None
            }

            KeyCode::Enter => {
                if !self.open {
                    self.open = true;
                    return None;
                }
                let row = usize::try_from(self.highlight).ok()?;
                self.commit(row)
            }
            KeyCode::Esc => {
                self.open = false;
                None
            }

            _ => None,
        }
    }

    /// Pointer press on a dropdown row commits it, regardless of the
    /// current highlight.
    pub fn click_row(&mut self, row: usize) -> Option<SelectionChange> {
        if self.open { self.commit(row) } else { None }
    }

    /// Pointer press on the input itself: reopen the dropdown.
    pub fn open_dropdown(&mut self) {
        self.open = true;
    }

    /// Pointer press outside the widget: close, keep query and selection.
    pub fn click_outside(&mut self) {
        self.open = false;
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) -> Option<SelectionChange> {
        edit(&mut self.query);
        self.open = true;
        self.highlight = -1;
        self.refilter();

        if self.query.is_empty() && self.selection.take().is_some() {
            Some(SelectionChange::Cleared)
        } else {
            None
        }
    }

    fn commit(&mut self, row: usize) -> Option<SelectionChange> {
        let locality = self.filtered.get(row).map(|&idx| &self.localities[idx])?;
        let canonical = locality.canonical_name.clone();

        self.query = locality.native_name.clone();
        self.open = false;
        self.highlight = -1;
        self.refilter();
        self.selection = Some(canonical.clone());

        Some(SelectionChange::Selected(canonical))
    }

    /// A locality matches when the query is a literal substring of the
    /// native name, or a case-insensitive substring of the canonical name.
    fn refilter(&mut self) {
        let query = self.query.as_str();
        let lower = query.to_lowercase();

        self.total_matches = 0;
        self.filtered.clear();
        for (idx, locality) in self.localities.iter().enumerate() {
            let hit = locality.native_name.contains(query)
                || locality.canonical_name.to_lowercase().contains(&lower);
            if hit {
                self.total_matches += 1;
                if self.filtered.len() < MAX_VISIBLE_MATCHES {
                    self.filtered.push(idx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locality(native: &str, canonical: &str) -> Locality {
        Locality { native_name: native.to_string(), canonical_name: canonical.to_string() }
    }

    fn sample() -> Vec<Locality> {
        vec![
            locality("עכו", "Acre"),
            locality("חיפה", "Haifa"),
            locality("תל אביב", "Tel Aviv"),
        ]
    }

    fn type_str(search: &mut CitySearch, text: &str) -> Option<SelectionChange> {
        let mut last = None;
        for c in text.chars() {
            last = search.handle_key(KeyCode::Char(c));
        }
        last
    }

    #[test]
    fn typing_opens_and_resets_highlight() {
        let mut search = CitySearch::new(sample());
        search.handle_key(KeyCode::Down);
        search.handle_key(KeyCode::Down);
        assert_eq!(search.highlight(), Some(0));

        search.handle_key(KeyCode::Char('H'));
        assert!(search.is_open());
        assert_eq!(search.highlight(), None);
    }

    #[test]
    fn canonical_name_matches_case_insensitively() {
        let mut search = CitySearch::new(sample());
        type_str(&mut search, "haifa");
        let names: Vec<&str> =
            search.matches().map(|l| l.canonical_name.as_str()).collect();
        assert_eq!(names, ["Haifa"]);
    }

    #[test]
    fn native_name_matches_literally() {
        let mut search = CitySearch::new(sample());
        type_str(&mut search, "תל");
        let names: Vec<&str> =
            search.matches().map(|l| l.canonical_name.as_str()).collect();
        assert_eq!(names, ["Tel Aviv"]);
    }

    #[test]
    fn arrow_down_opens_then_walks_and_clamps() {
        let mut search = CitySearch::new(sample());
        assert!(!search.is_open());

        search.handle_key(KeyCode::Down);
        assert!(search.is_open());
        assert_eq!(search.highlight(), None);

        for _ in 0..10 {
            search.handle_key(KeyCode::Down);
        }
        assert_eq!(search.highlight(), Some(2));
    }

    #[test]
    fn arrow_up_clamps_at_nothing_highlighted() {
        let mut search = CitySearch::new(sample());
        search.handle_key(KeyCode::Down);
        search.handle_key(KeyCode::Down);
        assert_eq!(search.highlight(), Some(0));

        search.handle_key(KeyCode::Up);
        assert_eq!(search.highlight(), None);
        search.handle_key(KeyCode::Up);
        assert_eq!(search.highlight(), None);
    }

    #[test]
    fn enter_opens_when_closed_and_commits_when_highlighted() {
        let mut search = CitySearch::new(sample());

        assert_eq!(search.handle_key(KeyCode::Enter), None);
        assert!(search.is_open());

        // Nothing highlighted yet: Enter is a no-op.
        assert_eq!(search.handle_key(KeyCode::Enter), None);

        search.handle_key(KeyCode::Down);
        search.handle_key(KeyCode::Down);
        let change = search.handle_key(KeyCode::Enter);

        assert_eq!(change, Some(SelectionChange::Selected("Haifa".to_string())));
        assert!(!search.is_open());
        assert_eq!(search.query(), "חיפה");
        assert_eq!(search.selection(), Some("Haifa"));
    }

    #[test]
    fn escape_closes_without_touching_the_selection() {
        let mut search = CitySearch::new(sample());
        type_str(&mut search, "Haifa");
        search.handle_key(KeyCode::Down);
        search.handle_key(KeyCode::Enter);

        search.handle_key(KeyCode::Down);
        assert!(search.is_open());
        search.handle_key(KeyCode::Esc);
        assert!(!search.is_open());
        assert_eq!(search.selection(), Some("Haifa"));
    }

    #[test]
    fn emptying_the_query_clears_the_selection() {
        let mut search = CitySearch::new(sample());
        type_str(&mut search, "Acre");
        search.handle_key(KeyCode::Down);
        search.handle_key(KeyCode::Enter);
        assert_eq!(search.selection(), Some("Acre"));

        let mut last = None;
        while !search.query().is_empty() {
            last = search.handle_key(KeyCode::Backspace);
        }
        assert_eq!(last, Some(SelectionChange::Cleared));
        assert_eq!(search.selection(), None);
    }

    #[test]
    fn click_commits_a_row_regardless_of_highlight() {
        let mut search = CitySearch::new(sample());
        search.handle_key(KeyCode::Down);

        let change = search.click_row(2);
        assert_eq!(change, Some(SelectionChange::Selected("Tel Aviv".to_string())));
        assert!(!search.is_open());
    }

    #[test]
    fn click_outside_closes_and_keeps_query() {
        let mut search = CitySearch::new(sample());
        type_str(&mut search, "Tel");
        assert!(search.is_open());

        search.click_outside();
        assert!(!search.is_open());
        assert_eq!(search.query(), "Tel");
    }

    #[test]
    fn match_list_is_capped_but_count_is_not() {
        let many: Vec<Locality> = (0..150)
            .map(|n| locality(&format!("עיר {n}"), &format!("Town {n:03}")))
            .collect();
        let mut search = CitySearch::new(many);
        type_str(&mut search, "Town");

        assert_eq!(search.match_count(), MAX_VISIBLE_MATCHES);
        assert_eq!(search.total_match_count(), 150);
        assert!(search.matches().all(|l| l.canonical_name.contains("Town")));
    }
}
