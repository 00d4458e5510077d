#![forbid(unsafe_code)]

//! List control double.

use std::cell::{Cell, RefCell};

use formsync::{CollectionSurface, EventSource, Subscription, SurfaceCaps};

/// How user clicks change the control's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Any number of elements may be flagged (checked list box, multi-select
    /// list box).
    #[default]
    Multi,
    /// Flagging an element clears every other flag (combo box, single-select
    /// list box).
    Single,
}

/// An in-memory list widget.
///
/// Advertised capabilities gate which change events can be subscribed;
/// methods for capabilities the control lacks are never called by the binding
/// engine, and the double does not pretend otherwise. Programmatic flag writes
/// raise `on_item_flag_changed` (and `on_selection_changed`) the way real
/// toolkits do.
#[derive(Debug)]
pub struct ListControl<T: 'static> {
    items: RefCell<Vec<T>>,
    flags: RefCell<Vec<bool>>,
    caps: SurfaceCaps,
    mode: SelectionMode,
    flag_writes: Cell<u32>,
    source_writes: Cell<u32>,
    flag_changed: EventSource<(usize, bool)>,
    selection_changed: EventSource<()>,
}

impl<T: Clone + 'static> ListControl<T> {
    /// A multi-select control with every capability.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let flags = vec![false; items.len()];
        Self {
            items: RefCell::new(items),
            flags: RefCell::new(flags),
            caps: SurfaceCaps::all(),
            mode: SelectionMode::Multi,
            flag_writes: Cell::new(0),
            source_writes: Cell::new(0),
            flag_changed: EventSource::new(),
            selection_changed: EventSource::new(),
        }
    }

    /// Restrict the advertised capabilities.
    #[must_use]
    pub fn with_caps(mut self, caps: SurfaceCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Set the selection mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Simulate the user checking or unchecking the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a visible element.
    pub fn user_toggle(&self, index: usize, flag: bool) {
        assert!(index < self.len(), "user_toggle({index}) past end of list");
        if self.mode == SelectionMode::Single && flag {
            self.clear_other_flags(index);
        }
        self.flags.borrow_mut()[index] = flag;
        self.announce(index, flag);
    }

    /// Simulate the user clicking the element at `index` (single selection),
    /// or clicking empty space with `None`.
    pub fn user_select(&self, index: Option<usize>) {
        match index {
            Some(index) => self.user_toggle(index, true),
            None => {
                self.clear_other_flags(usize::MAX);
                self.selection_changed.emit(&());
            }
        }
    }

    /// Current flags, in display order.
    #[must_use]
    pub fn flags(&self) -> Vec<bool> {
        self.flags.borrow().clone()
    }

    /// Number of visible elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Programmatic `set_item_flag` calls so far.
    #[must_use]
    pub fn flag_writes(&self) -> u32 {
        self.flag_writes.get()
    }

    /// Programmatic `set_source` calls so far.
    #[must_use]
    pub fn source_writes(&self) -> u32 {
        self.source_writes.get()
    }

    /// Live listeners across both change events.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.flag_changed.live_subscriber_count() + self.selection_changed.live_subscriber_count()
    }

    fn clear_other_flags(&self, keep: usize) {
        let cleared: Vec<usize> = {
            let mut flags = self.flags.borrow_mut();
            let cleared = flags
                .iter()
                .enumerate()
                .filter(|&(i, &f)| f && i != keep)
                .map(|(i, _)| i)
                .collect();
            for (i, f) in flags.iter_mut().enumerate() {
                if i != keep {
                    *f = false;
                }
            }
            cleared
        };
        for index in cleared {
            self.flag_changed.emit(&(index, false));
        }
    }

    fn announce(&self, index: usize, flag: bool) {
        self.flag_changed.emit(&(index, flag));
        self.selection_changed.emit(&());
    }
}

impl<T: Clone + 'static> CollectionSurface<T> for ListControl<T> {
    fn capabilities(&self) -> SurfaceCaps {
        self.caps
    }

    fn visible_items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    fn set_source(&self, items: Vec<T>) {
        self.source_writes.set(self.source_writes.get() + 1);
        // Rebinding the data source drops every check mark.
        *self.flags.borrow_mut() = vec![false; items.len()];
        *self.items.borrow_mut() = items;
    }

    fn item_flag(&self, index: usize) -> bool {
        self.flags.borrow().get(index).copied().unwrap_or(false)
    }

    fn set_item_flag(&self, index: usize, flag: bool) {
        if index >= self.len() {
            return;
        }
        self.flag_writes.set(self.flag_writes.get() + 1);
        self.flags.borrow_mut()[index] = flag;
        self.announce(index, flag);
    }

    fn on_item_flag_changed(&self, callback: Box<dyn Fn(usize, bool)>) -> Option<Subscription> {
        self.caps
            .contains(SurfaceCaps::ITEM_FLAG_EVENTS)
            .then(|| self.flag_changed.subscribe(move |&(index, flag)| callback(index, flag)))
    }

    fn on_selection_changed(&self, callback: Box<dyn Fn()>) -> Option<Subscription> {
        self.caps
            .contains(SurfaceCaps::SELECTION_EVENTS)
            .then(|| self.selection_changed.subscribe(move |_| callback()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn single_mode_clears_other_flags() {
        let list = ListControl::new(vec!["a", "b", "c"]).with_mode(SelectionMode::Single);
        list.user_toggle(0, true);
        list.user_toggle(2, true);
        assert_eq!(list.flags(), vec![false, false, true]);

        list.user_select(None);
        assert_eq!(list.flags(), vec![false, false, false]);
    }

    #[test]
    fn events_respect_caps() {
        let list = ListControl::new(vec![1, 2]).with_caps(SurfaceCaps::ITEM_FLAGS);
        assert!(list.on_item_flag_changed(Box::new(|_, _| {})).is_none());
        assert!(list.on_selection_changed(Box::new(|| {})).is_none());

        let full = ListControl::new(vec![1, 2]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = full
            .on_item_flag_changed(Box::new(move |i, f| s.borrow_mut().push((i, f))))
            .unwrap();
        full.set_item_flag(1, true);
        assert_eq!(*seen.borrow(), vec![(1, true)]);
        assert_eq!(full.flag_writes(), 1);
    }

    #[test]
    fn set_source_resets_flags() {
        let list = ListControl::new(vec!["x"]);
        list.user_toggle(0, true);
        list.set_source(vec!["a", "b"]);
        assert_eq!(list.flags(), vec![false, false]);
        assert_eq!(list.visible_items(), vec!["a", "b"]);
        assert_eq!(list.source_writes(), 1);
        assert!(!list.item_flag(5));
    }
}
