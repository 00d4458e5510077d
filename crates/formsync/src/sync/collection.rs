#![forbid(unsafe_code)]

//! Collection bindings against a [`CollectionSurface<T>`].
//!
//! - [`SourceSync`]: pushes a whole sequence into the control's backing
//!   collection whenever the observable reports that some element changed.
//!   Rebinding is wholesale, never an incremental patch.
//! - [`FlagSync`]: mirrors a list's `selected` set with the control's
//!   per-element flags, optionally rebinding the source first.
//! - [`SingleFlagSync`]: mirrors one "current" element (by value or by index)
//!   with the control's single flagged element.
//!
//! Flag propagation toward the control scans the visible items once and
//! writes only flags that differ, so a sync never flickers a flag that is
//! already right.

use std::rc::{Rc, Weak};

use super::binding::{LinkMeta, SyncLink};
use super::error::BindError;
use super::options::BindOptions;
use super::state::{SyncGuard, SyncState};
use super::surface::{CollectionSurface, SurfaceCaps};
use crate::reactive::{ListEvent, ReactiveList, ReactiveValue, Subscription};

/// Observable side of a data-source binding.
pub(crate) enum SourceEndpoint<T: 'static> {
    List(ReactiveList<T>),
    Sequence(ReactiveValue<Vec<T>>),
}

impl<T: Clone + PartialEq + 'static> SourceEndpoint<T> {
    fn snapshot(&self) -> Vec<T> {
        match self {
            Self::List(list) => list.to_vec(),
            Self::Sequence(value) => value.get(),
        }
    }

    fn on_items_changed(&self, callback: impl Fn() + 'static) -> Subscription {
        match self {
            Self::List(list) => list.subscribe(move |event| {
                if *event == ListEvent::ItemsChanged {
                    callback();
                }
            }),
            Self::Sequence(value) => value.subscribe(move |_| callback()),
        }
    }
}

fn missing(meta: &LinkMeta, caps: SurfaceCaps) -> BindError {
    BindError::MissingCapability {
        kind: meta.kind,
        missing: caps,
    }
}

/// Write `want(i, item)` into every visible flag that differs.
fn apply_flags<T>(control: &dyn CollectionSurface<T>, want: impl Fn(usize, &T) -> bool) {
    for (index, item) in control.visible_items().iter().enumerate() {
        let flag = want(index, item);
        if control.item_flag(index) != flag {
            control.set_item_flag(index, flag);
        }
    }
}

/// Index of the first flagged visible element.
fn flagged_index<T>(control: &dyn CollectionSurface<T>) -> Option<usize> {
    (0..control.visible_items().len()).find(|&index| control.item_flag(index))
}

// ---------------------------------------------------------------------------
// SourceSync
// ---------------------------------------------------------------------------

pub(crate) struct SourceSync<T: 'static> {
    guard: SyncGuard,
    meta: LinkMeta,
    source: SourceEndpoint<T>,
    control: Rc<dyn CollectionSurface<T>>,
}

impl<T: Clone + PartialEq + 'static> SourceSync<T> {
    pub(crate) fn wire(
        source: SourceEndpoint<T>,
        control: Rc<dyn CollectionSurface<T>>,
        meta: LinkMeta,
    ) -> (Rc<Self>, Vec<Subscription>) {
        let sync = Rc::new(Self {
            guard: SyncGuard::new(),
            meta,
            source,
            control,
        });
        let weak: Weak<Self> = Rc::downgrade(&sync);
        let sub = sync.source.on_items_changed(move || {
            if let Some(sync) = weak.upgrade() {
                sync.push_to_control();
            }
        });
        (sync, vec![sub])
    }
}

impl<T: Clone + PartialEq + 'static> SyncLink for SourceSync<T> {
    fn state(&self) -> SyncState {
        self.guard.state()
    }

    fn push_to_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToControl) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToControl);
        self.control.set_source(self.source.snapshot());
    }
}

// ---------------------------------------------------------------------------
// FlagSync
// ---------------------------------------------------------------------------

pub(crate) struct FlagSync<T: 'static> {
    guard: SyncGuard,
    meta: LinkMeta,
    list: ReactiveList<T>,
    control: Rc<dyn CollectionSurface<T>>,
    rebind_source: bool,
}

impl<T: Clone + PartialEq + 'static> FlagSync<T> {
    /// Wire a multi-selection binding. With `rebind_source`, list changes
    /// also replace the control's backing collection.
    pub(crate) fn wire(
        list: ReactiveList<T>,
        control: Rc<dyn CollectionSurface<T>>,
        meta: LinkMeta,
        options: &BindOptions,
        rebind_source: bool,
    ) -> Result<(Rc<Self>, Vec<Subscription>), BindError> {
        let sync = Rc::new(Self {
            guard: SyncGuard::new(),
            meta,
            list,
            control,
            rebind_source,
        });
        let mut subscriptions = Vec::with_capacity(3);

        if options.is_two_way() {
            let weak: Weak<Self> = Rc::downgrade(&sync);
            let sub = sync
                .control
                .on_item_flag_changed(Box::new(move |index, flag| {
                    if let Some(sync) = weak.upgrade() {
                        sync.pull_flag(index, flag);
                    }
                }))
                .ok_or_else(|| missing(&sync.meta, SurfaceCaps::ITEM_FLAG_EVENTS))?;
            subscriptions.push(sub);
        }

        let weak: Weak<Self> = Rc::downgrade(&sync);
        subscriptions.push(sync.list.selected().subscribe(move |event| {
            if *event == ListEvent::ItemsChanged {
                if let Some(sync) = weak.upgrade() {
                    sync.push_flags();
                }
            }
        }));

        // A list change may have rebuilt the control's rows (here, or through
        // a separate data-source binding), so flags are re-applied.
        let weak: Weak<Self> = Rc::downgrade(&sync);
        subscriptions.push(sync.list.subscribe(move |event| {
            if *event == ListEvent::ItemsChanged {
                if let Some(sync) = weak.upgrade() {
                    sync.push_to_control();
                }
            }
        }));

        Ok((sync, subscriptions))
    }

    fn push_flags(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToControl) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToControl);
        self.write_flags();
    }

    fn write_flags(&self) {
        let selected = self.list.selected();
        apply_flags(self.control.as_ref(), |_, item| selected.contains(item));
    }

    /// Mirror a user flag change into `selected`.
    ///
    /// Membership is by value: when equal items appear more than once, the
    /// value stays selected while any of its copies is still flagged. Only the
    /// selection container is notified; the list's own item channel is left
    /// alone so data-source bindings on the same control do not rebind.
    fn pull_flag(&self, index: usize, flag: bool) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToObservable) else {
            return;
        };
        let visible = self.control.visible_items();
        let Some(item) = visible.get(index).cloned() else {
            tracing::debug!(
                kind = self.meta.kind.as_str(),
                label = %self.meta.label,
                index,
                "flag change for an index outside the visible items"
            );
            return;
        };
        self.meta.trace(SyncState::PropagatingToObservable);
        let flag = flag
            || visible
                .iter()
                .enumerate()
                .any(|(i, other)| i != index && *other == item && self.control.item_flag(i));
        let selected = self.list.selected();
        if selected.set_selected(item, flag) {
            selected.notify_updated();
        }
    }
}

impl<T: Clone + PartialEq + 'static> SyncLink for FlagSync<T> {
    fn state(&self) -> SyncState {
        self.guard.state()
    }

    fn push_to_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToControl) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToControl);
        if self.rebind_source {
            self.control.set_source(self.list.to_vec());
        }
        self.write_flags();
    }
}

// ---------------------------------------------------------------------------
// SingleFlagSync
// ---------------------------------------------------------------------------

/// Observable side of a single-selection binding.
pub(crate) enum CurrentEndpoint<T: 'static> {
    /// The list's `selected_item`, matched against visible items by value.
    Item(ReactiveList<T>),
    /// An index into the visible items.
    Index(ReactiveValue<Option<usize>>),
}

pub(crate) struct SingleFlagSync<T: 'static> {
    guard: SyncGuard,
    meta: LinkMeta,
    current: CurrentEndpoint<T>,
    control: Rc<dyn CollectionSurface<T>>,
}

impl<T: Clone + PartialEq + 'static> SingleFlagSync<T> {
    pub(crate) fn wire(
        current: CurrentEndpoint<T>,
        control: Rc<dyn CollectionSurface<T>>,
        meta: LinkMeta,
        options: &BindOptions,
    ) -> Result<(Rc<Self>, Vec<Subscription>), BindError> {
        let sync = Rc::new(Self {
            guard: SyncGuard::new(),
            meta,
            current,
            control,
        });
        let mut subscriptions = Vec::with_capacity(2);

        if options.is_two_way() {
            let weak: Weak<Self> = Rc::downgrade(&sync);
            let sub = sync
                .control
                .on_selection_changed(Box::new(move || {
                    if let Some(sync) = weak.upgrade() {
                        sync.pull_from_control();
                    }
                }))
                .ok_or_else(|| missing(&sync.meta, SurfaceCaps::SELECTION_EVENTS))?;
            subscriptions.push(sub);
        }

        let weak: Weak<Self> = Rc::downgrade(&sync);
        let on_change = move || {
            if let Some(sync) = weak.upgrade() {
                sync.push_to_control();
            }
        };
        subscriptions.push(match &sync.current {
            CurrentEndpoint::Item(list) => list.selected_item().subscribe(move |_| on_change()),
            CurrentEndpoint::Index(index) => index.subscribe(move |_| on_change()),
        });

        Ok((sync, subscriptions))
    }

    fn target_index(&self, visible: &[T]) -> Option<usize> {
        match &self.current {
            CurrentEndpoint::Item(list) => list
                .selected_item()
                .with(|current| current.as_ref().and_then(|c| visible.iter().position(|x| x == c))),
            CurrentEndpoint::Index(index) => index.get().filter(|&i| i < visible.len()),
        }
    }

    fn pull_from_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToObservable) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToObservable);
        let flagged = flagged_index(self.control.as_ref());
        match &self.current {
            CurrentEndpoint::Item(list) => {
                let item = flagged.and_then(|i| self.control.visible_items().into_iter().nth(i));
                list.selected_item().set(item);
            }
            CurrentEndpoint::Index(index) => {
                index.set(flagged);
            }
        }
    }
}

impl<T: Clone + PartialEq + 'static> SyncLink for SingleFlagSync<T> {
    fn state(&self) -> SyncState {
        self.guard.state()
    }

    fn push_to_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToControl) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToControl);
        let visible = self.control.visible_items();
        let target = self.target_index(&visible);
        apply_flags(self.control.as_ref(), |index, _| Some(index) == target);

        // An index the control cannot show is cleared so both sides agree.
        if let CurrentEndpoint::Index(index) = &self.current {
            if target.is_none() && index.with(Option::is_some) {
                tracing::debug!(
                    kind = self.meta.kind.as_str(),
                    label = %self.meta.label,
                    index = ?index.get(),
                    visible = visible.len(),
                    "selected index outside the visible items, cleared"
                );
                index.set(None);
            }
        }
    }
}
