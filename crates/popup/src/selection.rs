//! Selection state for the worksheet checklist.
//!
//! Responsibilities:
//! - Seed the checklist from host worksheets and a previously persisted selection.
//! - Toggle worksheet names in and out of the selection.
//! - Produce the order-preserving snapshot that gets persisted on close.
//!
//! Does NOT handle:
//! - Reading or writing the settings store (see `runtime`).
//! - Rendering the checklist.
//!
//! Invariants:
//! - Seeding never drops prior selections, even ones no longer on the dashboard.
//! - Each name appears at most once in a `SelectionSet`.
//! - `toggle` followed by `toggle` with the same name restores an equal set.

use std::collections::HashSet;

use datasource_host::Worksheet;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of selected worksheet names.
///
/// Equality compares membership only; `snapshot` exposes insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectionSet {
    names: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted snapshot (a JSON array of names).
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize the snapshot as a JSON array of names.
    pub fn to_json(&self) -> String {
        // A Vec<String> always serializes.
        serde_json::to_string(&self.names).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Remove `name` if selected, otherwise append it. Returns whether it is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.names.remove(idx);
                false
            }
            None => {
                self.names.push(name.to_string());
                true
            }
        }
    }

    /// Consuming form of [`toggle`](Self::toggle).
    pub fn toggled(mut self, name: &str) -> Self {
        self.toggle(name);
        self
    }

    /// Selected names in insertion order.
    pub fn snapshot(&self) -> Vec<String> {
        self.names.clone()
    }

    /// The earliest selected name still in the set.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.names.len() == other.names.len() && self.names.iter().all(|n| other.contains(n))
    }
}

impl Eq for SelectionSet {}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let names = iter
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names }
    }
}

impl From<Vec<String>> for SelectionSet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<SelectionSet> for Vec<String> {
    fn from(set: SelectionSet) -> Self {
        set.names
    }
}

/// One rendered row of the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Worksheet name; the identity used in the selection.
    pub name: String,
    /// Name with the eligibility marker removed.
    pub label: String,
    pub checked: bool,
}

/// Result of seeding: the rendered checklist and the initial selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededChecklist {
    pub items: Vec<ChecklistItem>,
    pub selection: SelectionSet,
}

impl SeededChecklist {
    /// Names of the rendered items, in render order.
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }

    /// Re-derive `checked` flags from the current selection.
    pub fn sync_checked(&mut self) {
        let selection = &self.selection;
        for item in &mut self.items {
            item.checked = selection.contains(&item.name);
        }
    }
}

/// Build the checklist from dashboard worksheets and a prior selection.
///
/// Only worksheets whose name contains `marker` are rendered, each name at
/// most once (first occurrence wins). The returned selection is `prior`
/// unchanged, including names that were not rendered.
pub fn seed(candidates: &[Worksheet], prior: SelectionSet, marker: &str) -> SeededChecklist {
    let mut rendered = HashSet::new();
    let items = candidates
        .iter()
        .filter(|sheet| sheet.is_eligible(marker))
        .filter(|sheet| rendered.insert(sheet.name.as_str()))
        .map(|sheet| ChecklistItem {
            name: sheet.name.clone(),
            label: sheet.label(marker),
            checked: prior.contains(&sheet.name),
        })
        .collect();

    SeededChecklist {
        items,
        selection: prior,
    }
}
