#![forbid(unsafe_code)]

//! Observable sequences: [`ObservableVec`] and [`ReactiveList`].
//!
//! # Notification contract
//!
//! Every mutating operation emits exactly three [`ListEvent`]s, in order:
//!
//! 1. [`ListEvent::Changed`] describing the structural change,
//! 2. [`ListEvent::CountChanged`] carrying the new length,
//! 3. [`ListEvent::ItemsChanged`] for consumers that only care that *some*
//!    element changed.
//!
//! [`ObservableVec::notify_updated`] emits only `ItemsChanged`; it exists for
//! callers that mutated an element's internal state out of band.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Index out of range | `at`/`set_at`/`remove_at`/`insert` | `Err(ListError::IndexOutOfRange)`, no events |
//! | Remove of absent item | `remove(&x)` with no match | Returns `false`, no events |

use std::cell::RefCell;
use std::rc::Rc;

use super::event::{EventSource, Property, Subscription};
use super::selection::SelectionSet;
use super::value::ReactiveValue;

/// Structural change applied to a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListChange {
    /// An element was inserted at `index`.
    Inserted { index: usize },
    /// The element at `index` was removed.
    Removed { index: usize },
    /// The element at `index` was overwritten.
    Replaced { index: usize },
    /// All elements were removed.
    Cleared,
    /// The whole sequence was replaced.
    Reset,
}

impl ListChange {
    /// Index affected by the change, if the change targets one element.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Inserted { index } | Self::Removed { index } | Self::Replaced { index } => {
                Some(index)
            }
            Self::Cleared | Self::Reset => None,
        }
    }
}

/// Notification emitted by [`ObservableVec`], [`ReactiveList`], and
/// [`SelectionSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListEvent {
    /// Structural change.
    Changed(ListChange),
    /// Element count after the change.
    CountChanged(usize),
    /// Some element changed.
    ItemsChanged,
}

impl ListEvent {
    /// The property this event reports on. Structural changes have none.
    #[must_use]
    pub const fn property(self) -> Option<Property> {
        match self {
            Self::Changed(_) => None,
            Self::CountChanged(_) => Some(Property::Count),
            Self::ItemsChanged => Some(Property::Items),
        }
    }
}

/// Errors from indexed list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// `index` is not valid for a sequence of length `len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of length {len}")
            }
        }
    }
}

impl std::error::Error for ListError {}

struct VecInner<T> {
    items: Vec<T>,
    version: u64,
}

/// A shared, observable, index-addressable sequence.
///
/// Cloning an `ObservableVec` creates a new handle to the **same** sequence.
///
/// # Invariants
///
/// 1. Each mutation emits `Changed`, `CountChanged`, `ItemsChanged` in that
///    order, after the mutation is visible to readers.
/// 2. `version` increments by exactly 1 per mutation.
/// 3. A failed (out-of-range) operation emits nothing and changes nothing.
pub struct ObservableVec<T: 'static> {
    inner: Rc<RefCell<VecInner<T>>>,
    events: EventSource<ListEvent>,
}

impl<T: 'static> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            events: self.events.clone(),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableVec")
            .field("items", &inner.items)
            .field("version", &inner.version)
            .field("subscriber_count", &self.events.subscriber_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + PartialEq + 'static> ObservableVec<T> {
    /// Create a sequence holding `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecInner { items, version: 0 })),
            events: EventSource::new(),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Clone of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<T, ListError> {
        let inner = self.inner.borrow();
        inner
            .items
            .get(index)
            .cloned()
            .ok_or(ListError::IndexOutOfRange {
                index,
                len: inner.items.len(),
            })
    }

    /// Clone of the element at `index`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Whether an element equal to `item` is present.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.inner.borrow().items.contains(item)
    }

    /// Index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.inner.borrow().items.iter().position(|x| x == item)
    }

    /// Snapshot of the elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    /// Access the elements by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Subscribe to list events.
    pub fn subscribe(&self, callback: impl Fn(&ListEvent) + 'static) -> Subscription {
        self.events.subscribe(callback)
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    /// Number of subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.events.live_subscriber_count()
    }

    /// Append `item`.
    pub fn push(&self, item: T) {
        let index = self.mutate(|items| {
            items.push(item);
            items.len() - 1
        });
        self.announce(ListChange::Inserted { index });
    }

    /// Insert `item` at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index > len()`.
    pub fn insert(&self, index: usize, item: T) -> Result<(), ListError> {
        self.check_index(index, self.len() + 1)?;
        self.mutate(|items| items.insert(index, item));
        self.announce(ListChange::Inserted { index });
        Ok(())
    }

    /// Remove and return the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_at(&self, index: usize) -> Result<T, ListError> {
        self.check_index(index, self.len())?;
        let removed = self.mutate(|items| items.remove(index));
        self.announce(ListChange::Removed { index });
        Ok(removed)
    }

    /// Remove the first element equal to `item`. Returns whether one was
    /// removed; an absent item is a silent no-op.
    pub fn remove(&self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => {
                self.mutate(|items| items.remove(index));
                self.announce(ListChange::Removed { index });
                true
            }
            None => false,
        }
    }

    /// Remove every element, returning them.
    pub fn clear(&self) -> Vec<T> {
        let removed = self.mutate(std::mem::take);
        self.announce(ListChange::Cleared);
        removed
    }

    /// Overwrite the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_at(&self, index: usize, item: T) -> Result<T, ListError> {
        self.check_index(index, self.len())?;
        let old = self.mutate(|items| std::mem::replace(&mut items[index], item));
        self.announce(ListChange::Replaced { index });
        Ok(old)
    }

    /// Replace the whole sequence, returning the previous elements.
    pub fn reset(&self, items: Vec<T>) -> Vec<T> {
        let old = self.mutate(|current| std::mem::replace(current, items));
        self.announce(ListChange::Reset);
        old
    }

    /// Emit [`ListEvent::ItemsChanged`] without mutating anything.
    pub fn notify_updated(&self) {
        self.events.emit(&ListEvent::ItemsChanged);
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<(), ListError> {
        if index < bound {
            Ok(())
        } else {
            Err(ListError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut inner = self.inner.borrow_mut();
        let out = f(&mut inner.items);
        inner.version += 1;
        out
    }

    fn announce(&self, change: ListChange) {
        let len = self.len();
        self.events.emit(&ListEvent::Changed(change));
        self.events.emit(&ListEvent::CountChanged(len));
        self.events.emit(&ListEvent::ItemsChanged);
    }
}

impl<T: Clone + PartialEq + 'static> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// An observable list with a multi-selection set and a single current item.
///
/// `selected` and `selected_item` are independent observables. Removing an
/// element from the list deselects it once no equal element remains: it is
/// dropped from `selected`, and `selected_item` is cleared if it held it.
/// Those cascading notifications fire after the list's own.
pub struct ReactiveList<T: 'static> {
    items: ObservableVec<T>,
    selected: SelectionSet<T>,
    selected_item: ReactiveValue<Option<T>>,
}

impl<T: 'static> Clone for ReactiveList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            selected: self.selected.clone(),
            selected_item: self.selected_item.clone(),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ReactiveList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveList")
            .field("items", &self.items)
            .field("selected", &self.selected)
            .field("selected_item", &self.selected_item)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ReactiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> From<Vec<T>> for ReactiveList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: ObservableVec::new(items),
            selected: SelectionSet::new(),
            selected_item: ReactiveValue::new(None),
        }
    }
}

impl<T: Clone + PartialEq + 'static> FromIterator<T> for ReactiveList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveList<T> {
    /// Create an empty list with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// The multi-selection set.
    #[must_use]
    pub fn selected(&self) -> &SelectionSet<T> {
        &self.selected
    }

    /// The single current item.
    #[must_use]
    pub fn selected_item(&self) -> &ReactiveValue<Option<T>> {
        &self.selected_item
    }

    /// Number of registered list subscribers (including dead ones not yet
    /// pruned). Selection subscribers are counted on `selected()` and
    /// `selected_item()`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.items.subscriber_count()
    }

    /// Number of list subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.items.live_subscriber_count()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clone of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<T, ListError> {
        self.items.at(index)
    }

    /// Clone of the element at `index`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.get(index)
    }

    /// Whether an element equal to `item` is present.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.index_of(item)
    }

    /// Snapshot of the elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.to_vec()
    }

    /// Access the elements by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.items.with(f)
    }

    /// Current version number of the element sequence.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.items.version()
    }

    /// Subscribe to list events (not selection events).
    pub fn subscribe(&self, callback: impl Fn(&ListEvent) + 'static) -> Subscription {
        self.items.subscribe(callback)
    }

    /// Append `item`.
    pub fn push(&self, item: T) {
        self.items.push(item);
    }

    /// Insert `item` at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index > len()`.
    pub fn insert(&self, index: usize, item: T) -> Result<(), ListError> {
        self.items.insert(index, item)
    }

    /// Remove and return the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_at(&self, index: usize) -> Result<T, ListError> {
        let removed = self.items.remove_at(index)?;
        self.deselect_missing(std::slice::from_ref(&removed));
        Ok(removed)
    }

    /// Remove the first element equal to `item`.
    pub fn remove(&self, item: &T) -> bool {
        let removed = self.items.remove(item);
        if removed {
            self.deselect_missing(std::slice::from_ref(item));
        }
        removed
    }

    /// Remove every element.
    pub fn clear(&self) {
        let removed = self.items.clear();
        self.deselect_missing(&removed);
    }

    /// Overwrite the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`ListError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_at(&self, index: usize, item: T) -> Result<T, ListError> {
        let old = self.items.set_at(index, item)?;
        self.deselect_missing(std::slice::from_ref(&old));
        Ok(old)
    }

    /// Replace the whole sequence.
    pub fn reset(&self, items: Vec<T>) {
        let old = self.items.reset(items);
        self.deselect_missing(&old);
    }

    /// Emit [`ListEvent::ItemsChanged`] without mutating anything.
    pub fn notify_updated(&self) {
        self.items.notify_updated();
    }

    fn deselect_missing(&self, removed: &[T]) {
        for item in removed {
            if self.items.contains(item) {
                continue;
            }
            while self.selected.remove(item) {}
            if self.selected_item.with(|current| current.as_ref() == Some(item)) {
                self.selected_item.set(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + PartialEq + 'static>(
        list: &ObservableVec<T>,
    ) -> (Rc<RefCell<Vec<ListEvent>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let sub = list.subscribe(move |e| l.borrow_mut().push(*e));
        (log, sub)
    }

    #[test]
    fn push_emits_changed_count_items_in_order() {
        let list = ObservableVec::new(vec!["a"]);
        let (log, _sub) = recorder(&list);

        list.push("b");
        assert_eq!(
            *log.borrow(),
            vec![
                ListEvent::Changed(ListChange::Inserted { index: 1 }),
                ListEvent::CountChanged(2),
                ListEvent::ItemsChanged,
            ]
        );
        assert_eq!(list.version(), 1);
    }

    #[test]
    fn each_mutation_kind_reports_its_change() {
        let list = ObservableVec::new(vec![1, 2, 3]);
        let (log, _sub) = recorder(&list);

        list.insert(0, 0).unwrap();
        list.set_at(1, 10).unwrap();
        list.remove_at(3).unwrap();
        list.reset(vec![7, 8]);
        list.clear();

        let changes: Vec<ListChange> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ListEvent::Changed(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![
                ListChange::Inserted { index: 0 },
                ListChange::Replaced { index: 1 },
                ListChange::Removed { index: 3 },
                ListChange::Reset,
                ListChange::Cleared,
            ]
        );
        assert_eq!(log.borrow().len(), 15);
    }

    #[test]
    fn out_of_range_is_reported_without_events() {
        let list = ObservableVec::new(vec![1, 2]);
        let (log, _sub) = recorder(&list);

        assert_eq!(
            list.at(2),
            Err(ListError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(list.set_at(5, 0).is_err());
        assert!(list.remove_at(2).is_err());
        assert!(list.insert(3, 0).is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert_eq!(list.version(), 0);
    }

    #[test]
    fn insert_at_end_is_allowed() {
        let list = ObservableVec::new(vec![1]);
        list.insert(1, 2).unwrap();
        assert_eq!(list.to_vec(), vec![1, 2]);
    }

    #[test]
    fn remove_absent_item_is_noop() {
        let list = ObservableVec::new(vec!["a", "b"]);
        let (log, _sub) = recorder(&list);

        assert!(!list.remove(&"z"));
        assert!(log.borrow().is_empty());

        assert!(list.remove(&"a"));
        assert_eq!(list.to_vec(), vec!["b"]);
    }

    #[test]
    fn notify_updated_emits_items_only() {
        let list = ObservableVec::new(vec![1]);
        let (log, _sub) = recorder(&list);

        list.notify_updated();
        assert_eq!(*log.borrow(), vec![ListEvent::ItemsChanged]);
        assert_eq!(list.version(), 0);
    }

    #[test]
    fn subscriber_sees_mutation_already_applied() {
        let list = ObservableVec::new(Vec::<u8>::new());
        let observed = Rc::new(RefCell::new(Vec::new()));
        let o = Rc::clone(&observed);
        let reader = list.clone();
        let _sub = list.subscribe(move |e| {
            if let ListEvent::CountChanged(n) = e {
                o.borrow_mut().push((*n, reader.len()));
            }
        });

        list.push(1);
        list.push(2);
        assert_eq!(*observed.borrow(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn list_event_properties() {
        assert_eq!(ListEvent::ItemsChanged.property(), Some(Property::Items));
        assert_eq!(ListEvent::CountChanged(3).property(), Some(Property::Count));
        assert_eq!(ListEvent::Changed(ListChange::Cleared).property(), None);
        assert_eq!(ListChange::Removed { index: 4 }.index(), Some(4));
    }

    #[test]
    fn error_display() {
        let err = ListError::IndexOutOfRange { index: 9, len: 3 };
        assert_eq!(err.to_string(), "index 9 out of range for list of length 3");
    }

    // ---- ReactiveList ----

    #[test]
    fn reactive_list_from_iter_and_queries() {
        let list: ReactiveList<&str> = ["a", "b", "c"].into_iter().collect();
        assert_eq!(list.len(), 3);
        assert_eq!(list.at(1), Ok("b"));
        assert!(list.contains(&"c"));
        assert_eq!(list.index_of(&"c"), Some(2));
        assert!(list.selected().is_empty());
        assert_eq!(list.selected_item().get(), None);
    }

    #[test]
    fn removing_item_deselects_it() {
        let list = ReactiveList::from(vec!["a", "b", "c"]);
        list.selected().push("b");
        list.selected().push("c");
        list.selected_item().set(Some("b"));

        assert!(list.remove(&"b"));
        assert_eq!(list.selected().to_vec(), vec!["c"]);
        assert_eq!(list.selected_item().get(), None);
    }

    #[test]
    fn removing_one_of_duplicates_keeps_selection() {
        let list = ReactiveList::from(vec!["a", "b", "a"]);
        list.selected().push("a");

        list.remove_at(0).unwrap();
        assert_eq!(list.selected().to_vec(), vec!["a"]);

        list.remove(&"a");
        assert!(list.selected().is_empty());
    }

    #[test]
    fn clear_and_reset_prune_selection() {
        let list = ReactiveList::from(vec![1, 2, 3]);
        list.selected().push(1);
        list.selected().push(3);
        list.selected_item().set(Some(2));

        list.reset(vec![3, 4]);
        assert_eq!(list.selected().to_vec(), vec![3]);
        assert_eq!(list.selected_item().get(), None);

        list.clear();
        assert!(list.selected().is_empty());
    }

    #[test]
    fn set_at_deselects_overwritten_item() {
        let list = ReactiveList::from(vec!["x", "y"]);
        list.selected().push("x");
        assert_eq!(list.set_at(0, "z"), Ok("x"));
        assert!(list.selected().is_empty());
    }

    #[test]
    fn selection_events_follow_list_events() {
        let list = ReactiveList::from(vec!["a", "b"]);
        list.selected().push("a");

        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _s1 = list.subscribe(move |e| l1.borrow_mut().push(("list", *e)));
        let l2 = Rc::clone(&log);
        let _s2 = list
            .selected()
            .subscribe(move |e| l2.borrow_mut().push(("selected", *e)));

        list.remove_at(0).unwrap();
        let sources: Vec<&str> = log.borrow().iter().map(|(s, _)| *s).collect();
        assert_eq!(
            sources,
            vec!["list", "list", "list", "selected", "selected", "selected"]
        );
    }

    #[test]
    fn failed_remove_at_leaves_selection() {
        let list = ReactiveList::from(vec![1]);
        list.selected().push(1);
        assert!(list.remove_at(3).is_err());
        assert_eq!(list.selected().to_vec(), vec![1]);
    }

    #[test]
    fn list_counts_only_its_own_subscribers() {
        let list = ReactiveList::from(vec![1, 2]);
        let sub = list.subscribe(|_| {});
        let _sel = list.selected().subscribe(|_| {});
        assert_eq!(list.subscriber_count(), 1);
        assert_eq!(list.live_subscriber_count(), 1);

        drop(sub);
        assert_eq!(list.live_subscriber_count(), 0);
        assert_eq!(list.selected().live_subscriber_count(), 1);
    }
}
