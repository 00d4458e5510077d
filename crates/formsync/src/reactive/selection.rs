#![forbid(unsafe_code)]

//! The observable "currently selected" subset of a list.

use std::ops::Deref;

use super::list::ObservableVec;

/// Observable set of selected elements.
///
/// A `SelectionSet` is an [`ObservableVec`] (all of its operations and the
/// same notification contract are available through `Deref`) plus checked
/// insertion helpers. Membership is by `PartialEq`. `push` does not
/// deduplicate; use [`select`](Self::select) to insert only when absent.
pub struct SelectionSet<T: 'static> {
    items: ObservableVec<T>,
}

impl<T: 'static> Clone for SelectionSet<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for SelectionSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSet")
            .field("items", &self.items)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Deref for SelectionSet<T> {
    type Target = ObservableVec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T: Clone + PartialEq + 'static> SelectionSet<T> {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: ObservableVec::default(),
        }
    }

    /// Add `item` unless an equal element is already selected. Returns whether
    /// it was added.
    pub fn select(&self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove `item` if selected. Returns whether it was removed.
    pub fn deselect(&self, item: &T) -> bool {
        self.items.remove(item)
    }

    /// Select or deselect `item` according to `selected`. Returns whether the
    /// set changed.
    pub fn set_selected(&self, item: T, selected: bool) -> bool {
        if selected {
            self.select(item)
        } else {
            self.deselect(&item)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::ListEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn select_is_checked_insertion() {
        let set = SelectionSet::new();
        assert!(set.select("a"));
        assert!(!set.select("a"));
        assert_eq!(set.to_vec(), vec!["a"]);
    }

    #[test]
    fn push_does_not_deduplicate() {
        let set = SelectionSet::new();
        set.push(1);
        set.push(1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn deselect_absent_is_noop() {
        let set = SelectionSet::new();
        set.push('x');
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = set.subscribe(move |_| c.set(c.get() + 1));

        assert!(!set.deselect(&'y'));
        assert_eq!(count.get(), 0);
        assert!(set.deselect(&'x'));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn set_selected_toggles() {
        let set = SelectionSet::new();
        assert!(set.set_selected(5, true));
        assert!(!set.set_selected(5, true));
        assert!(set.set_selected(5, false));
        assert!(set.is_empty());
    }

    #[test]
    fn notify_updated_without_mutation() {
        let set: SelectionSet<u8> = SelectionSet::new();
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let _sub = set.subscribe(move |e| s.set(Some(*e)));

        set.notify_updated();
        assert_eq!(seen.get(), Some(ListEvent::ItemsChanged));
    }
}
