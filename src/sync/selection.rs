// SPDX-License-Identifier: MPL-2.0
//! Set of checked image URLs.

use std::collections::BTreeSet;

/// Original URLs the user checked. Each URL appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    urls: BTreeSet<String>,
}

impl SelectionSet {
    /// Builds a selection from a persisted list, dropping duplicates.
    pub fn restore(urls: impl IntoIterator<Item = String>) -> Self {
        Self {
            urls: urls.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Checks or unchecks `url`. Returns true if the set changed.
    pub fn set(&mut self, url: &str, checked: bool) -> bool {
        if checked {
            self.urls.insert(url.to_string())
        } else {
            self.urls.remove(url)
        }
    }

    /// Flips `url` and returns its new state.
    pub fn toggle(&mut self, url: &str) -> bool {
        let checked = !self.contains(url);
        self.set(url, checked);
        checked
    }

    /// Checks every given URL. Returns true if the set changed.
    pub fn select_all<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> bool {
        urls.into_iter()
            .fold(false, |changed, url| self.set(url, true) || changed)
    }

    /// Unchecks every given URL. Selected URLs not in `urls` stay selected.
    pub fn deselect_all<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> bool {
        urls.into_iter()
            .fold(false, |changed, url| self.set(url, false) || changed)
    }

    /// The selected URLs among `urls`, in the order of `urls`.
    pub fn selected_in<'a>(&self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        urls.into_iter()
            .filter(|url| self.contains(url) && seen.insert(*url))
            .map(str::to_owned)
            .collect()
    }

    /// Snapshot for persistence.
    pub fn to_vec(&self) -> Vec<String> {
        self.urls.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "https://cdn.test/a.jpg";
    const B: &str = "https://cdn.test/b.jpg";
    const C: &str = "https://cdn.test/c.jpg";

    #[test]
    fn toggling_twice_restores_state() {
        let mut selection = SelectionSet::default();
        assert!(selection.toggle(A));
        assert!(!selection.toggle(A));
        assert!(selection.is_empty());
    }

    #[test]
    fn set_reports_changes_only() {
        let mut selection = SelectionSet::default();
        assert!(selection.set(A, true));
        assert!(!selection.set(A, true));
        assert!(selection.set(A, false));
        assert!(!selection.set(A, false));
    }

    #[test]
    fn restore_drops_duplicates() {
        let selection = SelectionSet::restore([A.to_string(), A.to_string(), B.to_string()]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn select_all_then_deselect_all_over_rendered_items() {
        let mut selection = SelectionSet::restore([C.to_string()]);

        assert!(selection.select_all([A, B]));
        assert_eq!(selection.len(), 3);
        assert!(!selection.select_all([A, B]));

        assert!(selection.deselect_all([A, B]));
        assert_eq!(selection.to_vec(), vec![C.to_string()]);
    }

    #[test]
    fn selected_in_follows_display_order() {
        let selection = SelectionSet::restore([A.to_string(), C.to_string()]);
        assert_eq!(
            selection.selected_in([C, B, A, C]),
            vec![C.to_string(), A.to_string()]
        );
    }
}
