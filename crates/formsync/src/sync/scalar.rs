#![forbid(unsafe_code)]

//! Scalar bindings: one `ReactiveValue<T>` against one [`ScalarSurface<T>`].

use std::rc::{Rc, Weak};

use super::binding::{LinkMeta, SyncLink};
use super::options::BindOptions;
use super::state::{SyncGuard, SyncState};
use super::surface::ScalarSurface;
use crate::reactive::{ReactiveValue, Subscription};

pub(crate) struct ScalarSync<T: 'static> {
    guard: SyncGuard,
    meta: LinkMeta,
    value: ReactiveValue<T>,
    control: Rc<dyn ScalarSurface<T>>,
}

impl<T: Clone + PartialEq + 'static> ScalarSync<T> {
    pub(crate) fn wire(
        value: ReactiveValue<T>,
        control: Rc<dyn ScalarSurface<T>>,
        meta: LinkMeta,
        options: &BindOptions,
    ) -> (Rc<Self>, Vec<Subscription>) {
        let sync = Rc::new(Self {
            guard: SyncGuard::new(),
            meta,
            value,
            control,
        });

        let mut subscriptions = Vec::with_capacity(2);
        let weak: Weak<Self> = Rc::downgrade(&sync);
        subscriptions.push(sync.value.subscribe(move |_| {
            if let Some(sync) = weak.upgrade() {
                sync.push_to_control();
            }
        }));

        if options.is_two_way() {
            let weak: Weak<Self> = Rc::downgrade(&sync);
            subscriptions.push(sync.control.on_change(Box::new(move || {
                if let Some(sync) = weak.upgrade() {
                    sync.pull_from_control();
                }
            })));
        }

        (sync, subscriptions)
    }

    fn pull_from_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToObservable) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToObservable);
        self.value.set(self.control.read());
    }
}

impl<T: Clone + PartialEq + 'static> SyncLink for ScalarSync<T> {
    fn state(&self) -> SyncState {
        self.guard.state()
    }

    fn push_to_control(&self) {
        let Some(_token) = self.guard.enter(SyncState::PropagatingToControl) else {
            return;
        };
        self.meta.trace(SyncState::PropagatingToControl);
        self.control.write(self.value.get());
    }
}
