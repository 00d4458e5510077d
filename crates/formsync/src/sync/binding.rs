#![forbid(unsafe_code)]

//! The [`bind`] entry point and the [`Binding`] handle.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use formsync::reactive::ReactiveValue;
//! use formsync::sync::{bind, BindOptions, BindingKind, Endpoint, Surface};
//!
//! let model = ReactiveValue::new(String::from("hello"));
//! // Any `ScalarSurface` works on the control side; another observable is
//! // the simplest one.
//! let widget = ReactiveValue::new(String::new());
//!
//! let binding = bind(
//!     Endpoint::value(&model),
//!     Surface::scalar(Rc::new(widget.clone())),
//!     BindingKind::Text,
//!     BindOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(widget.get(), "hello");
//!
//! widget.set("typed".into());
//! assert_eq!(model.get(), "typed");
//!
//! binding.unbind();
//! model.set("detached".into());
//! assert_eq!(widget.get(), "typed");
//! ```
//!
//! # Invariants
//!
//! 1. Immediately after `bind` returns `Ok`, the control reflects the
//!    observable.
//! 2. Each trigger propagates at most once; its echo from the other side is
//!    dropped by the binding's [`SyncGuard`](super::SyncGuard).
//! 3. `bind` returning `Err` has registered no listener and written nothing.
//! 4. Dropping or unbinding a `Binding` releases every listener it
//!    registered on both endpoints.

use std::rc::Rc;

use super::collection::{CurrentEndpoint, FlagSync, SingleFlagSync, SourceEndpoint, SourceSync};
use super::error::BindError;
use super::options::{BindOptions, BindingKind};
use super::scalar::ScalarSync;
use super::state::SyncState;
use super::surface::{CollectionSurface, ScalarSurface};
use crate::reactive::{ReactiveList, ReactiveValue, Subscription};

/// Behavior shared by every per-kind sync object.
pub(crate) trait SyncLink {
    fn state(&self) -> SyncState;

    /// Propagate the observable's current state into the control.
    fn push_to_control(&self);
}

/// Identity of a binding, carried into tracing events.
pub(crate) struct LinkMeta {
    pub(crate) kind: BindingKind,
    pub(crate) label: String,
}

impl LinkMeta {
    pub(crate) fn new(kind: BindingKind, options: &BindOptions) -> Self {
        Self {
            kind,
            label: options.label_str().to_owned(),
        }
    }

    pub(crate) fn trace(&self, direction: SyncState) {
        tracing::trace!(
            kind = self.kind.as_str(),
            direction = direction.as_str(),
            label = %self.label,
            "propagate"
        );
    }
}

/// Observable side of a binding.
pub enum Endpoint<T: 'static> {
    /// A scalar observable.
    Value(ReactiveValue<T>),
    /// An observable holding a whole sequence.
    Sequence(ReactiveValue<Vec<T>>),
    /// A reactive list, with its selection containers.
    List(ReactiveList<T>),
    /// An optional index into a control's visible items.
    Index(ReactiveValue<Option<usize>>),
}

impl<T: Clone + PartialEq + 'static> Endpoint<T> {
    /// Scalar endpoint.
    #[must_use]
    pub fn value(value: &ReactiveValue<T>) -> Self {
        Self::Value(value.clone())
    }

    /// Whole-sequence endpoint.
    #[must_use]
    pub fn sequence(value: &ReactiveValue<Vec<T>>) -> Self {
        Self::Sequence(value.clone())
    }

    /// List endpoint.
    #[must_use]
    pub fn list(list: &ReactiveList<T>) -> Self {
        Self::List(list.clone())
    }

    /// Index endpoint.
    #[must_use]
    pub fn index(index: &ReactiveValue<Option<usize>>) -> Self {
        Self::Index(index.clone())
    }
}

impl<T: 'static> Endpoint<T> {
    /// Short description used in errors.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Sequence(_) => "sequence",
            Self::List(_) => "list",
            Self::Index(_) => "index",
        }
    }

    fn accepts(&self, kind: BindingKind) -> bool {
        use BindingKind as K;
        match self {
            Self::Value(_) => kind.is_scalar(),
            Self::Sequence(_) => matches!(kind, K::DataSource | K::Collection),
            Self::List(_) => matches!(
                kind,
                K::DataSource | K::Collection | K::SelectedItem | K::SelectedItems | K::CheckedItems
            ),
            Self::Index(_) => kind == K::SelectedIndex,
        }
    }
}

/// Control side of a binding.
pub enum Surface<T: 'static> {
    /// A single-value control.
    Scalar(Rc<dyn ScalarSurface<T>>),
    /// A multi-element control.
    Collection(Rc<dyn CollectionSurface<T>>),
}

impl<T: 'static> Surface<T> {
    /// Wrap a scalar control.
    #[must_use]
    pub fn scalar(control: Rc<impl ScalarSurface<T> + 'static>) -> Self {
        Self::Scalar(control)
    }

    /// Wrap a collection control.
    #[must_use]
    pub fn collection(control: Rc<impl CollectionSurface<T> + 'static>) -> Self {
        Self::Collection(control)
    }

    /// Short description used in errors.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Collection(_) => "collection",
        }
    }
}

/// Attach `endpoint` to `surface` as a binding of `kind`.
///
/// On success the control has already received the observable's current
/// state.
///
/// # Errors
///
/// - [`BindError::EndpointMismatch`] if `endpoint` cannot back `kind`.
/// - [`BindError::SurfaceMismatch`] if `surface` cannot host `kind`.
/// - [`BindError::MissingCapability`] if a collection surface lacks a
///   capability `kind` needs.
///
/// On error neither endpoint has been touched.
pub fn bind<T: Clone + PartialEq + 'static>(
    endpoint: Endpoint<T>,
    surface: Surface<T>,
    kind: BindingKind,
    options: BindOptions,
) -> Result<Binding, BindError> {
    match wire(endpoint, surface, kind, &options) {
        Ok((link, subscriptions)) => {
            link.push_to_control();
            tracing::debug!(
                kind = kind.as_str(),
                label = %options.label_str(),
                mode = ?options.mode,
                listeners = subscriptions.len(),
                "bound"
            );
            Ok(Binding {
                kind,
                label: options.label,
                link,
                subscriptions,
            })
        }
        Err(err) => {
            tracing::debug!(
                kind = kind.as_str(),
                label = %options.label_str(),
                error = %err,
                "bind rejected"
            );
            Err(err)
        }
    }
}

/// Bind two observables so each mirrors the other. `b` takes `a`'s value
/// first.
#[must_use = "dropping the Binding disconnects the two values"]
pub fn bind_values<T: Clone + PartialEq + 'static>(
    a: &ReactiveValue<T>,
    b: &ReactiveValue<T>,
) -> Binding {
    let (link, subscriptions) = ScalarSync::wire(
        a.clone(),
        Rc::new(b.clone()),
        LinkMeta::new(BindingKind::Value, &BindOptions::default()),
        &BindOptions::default(),
    );
    link.push_to_control();
    Binding {
        kind: BindingKind::Value,
        label: None,
        link,
        subscriptions,
    }
}

type Wired = (Rc<dyn SyncLink>, Vec<Subscription>);

fn erase<L: SyncLink + 'static>((link, subscriptions): (Rc<L>, Vec<Subscription>)) -> Wired {
    let link: Rc<dyn SyncLink> = link;
    (link, subscriptions)
}

fn wire<T: Clone + PartialEq + 'static>(
    endpoint: Endpoint<T>,
    surface: Surface<T>,
    kind: BindingKind,
    options: &BindOptions,
) -> Result<Wired, BindError> {
    if !endpoint.accepts(kind) {
        return Err(BindError::EndpointMismatch {
            kind,
            endpoint: endpoint.describe(),
        });
    }
    let meta = LinkMeta::new(kind, options);

    match surface {
        Surface::Scalar(control) => match endpoint {
            Endpoint::Value(value) => Ok(erase(ScalarSync::wire(value, control, meta, options))),
            _ => Err(BindError::SurfaceMismatch {
                kind,
                surface: "scalar",
            }),
        },
        Surface::Collection(control) => {
            if kind.is_scalar() {
                return Err(BindError::SurfaceMismatch {
                    kind,
                    surface: "collection",
                });
            }
            let missing = kind
                .required_caps(options.mode)
                .difference(control.capabilities());
            if !missing.is_empty() {
                return Err(BindError::MissingCapability { kind, missing });
            }
            wire_collection(endpoint, control, kind, meta, options)
        }
    }
}

fn wire_collection<T: Clone + PartialEq + 'static>(
    endpoint: Endpoint<T>,
    control: Rc<dyn CollectionSurface<T>>,
    kind: BindingKind,
    meta: LinkMeta,
    options: &BindOptions,
) -> Result<Wired, BindError> {
    use BindingKind as K;
    let wired = match (kind, endpoint) {
        (K::DataSource | K::Collection, Endpoint::List(list)) => {
            erase(SourceSync::wire(SourceEndpoint::List(list), control, meta))
        }
        (K::DataSource | K::Collection, Endpoint::Sequence(seq)) => {
            erase(SourceSync::wire(SourceEndpoint::Sequence(seq), control, meta))
        }
        (K::SelectedItems, Endpoint::List(list)) => {
            erase(FlagSync::wire(list, control, meta, options, false)?)
        }
        (K::CheckedItems, Endpoint::List(list)) => {
            erase(FlagSync::wire(list, control, meta, options, true)?)
        }
        (K::SelectedItem, Endpoint::List(list)) => erase(SingleFlagSync::wire(
            CurrentEndpoint::Item(list),
            control,
            meta,
            options,
        )?),
        (K::SelectedIndex, Endpoint::Index(index)) => erase(SingleFlagSync::wire(
            CurrentEndpoint::Index(index),
            control,
            meta,
            options,
        )?),
        (kind, endpoint) => {
            return Err(BindError::EndpointMismatch {
                kind,
                endpoint: endpoint.describe(),
            });
        }
    };
    Ok(wired)
}

/// A live binding between one observable and one control surface.
///
/// Dropping the `Binding` (or calling [`unbind`](Self::unbind)) releases the
/// listeners it registered on both sides. The sync object is referenced
/// weakly from those listeners, so neither endpoint keeps the other alive.
#[must_use = "dropping a Binding disconnects it"]
pub struct Binding {
    kind: BindingKind,
    label: Option<String>,
    link: Rc<dyn SyncLink>,
    subscriptions: Vec<Subscription>,
}

impl Binding {
    /// Kind this binding was created with.
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Label from the binding's options, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Current propagation state. Always `Idle` outside a propagation.
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.link.state()
    }

    /// Number of listeners this binding holds across both endpoints.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Push the observable's current state into the control again.
    ///
    /// Useful after the control was repopulated out of band.
    pub fn resync(&self) {
        self.link.push_to_control();
    }

    /// Disconnect both directions.
    pub fn unbind(self) {
        drop(self);
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        tracing::debug!(
            kind = self.kind.as_str(),
            label = self.label.as_deref().unwrap_or(""),
            listeners = self.subscriptions.len(),
            "unbound"
        );
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("state", &self.state())
            .field("listener_count", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::EventSource;
    use crate::sync::SurfaceCaps;
    use std::cell::{Cell, RefCell};

    struct NumericBox {
        value: Cell<i32>,
        writes: Cell<u32>,
        changed: EventSource<()>,
    }

    impl NumericBox {
        fn new(value: i32) -> Rc<Self> {
            Rc::new(Self {
                value: Cell::new(value),
                writes: Cell::new(0),
                changed: EventSource::new(),
            })
        }

        fn spin_to(&self, value: i32) {
            self.value.set(value);
            self.changed.emit(&());
        }
    }

    impl ScalarSurface<i32> for NumericBox {
        fn read(&self) -> i32 {
            self.value.get()
        }

        fn write(&self, value: i32) {
            self.writes.set(self.writes.get() + 1);
            self.value.set(value);
            self.changed.emit(&());
        }

        fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription {
            self.changed.subscribe(move |_| callback())
        }
    }

    /// A list control without a settable backing collection.
    struct ReadOnlyList {
        items: RefCell<Vec<i32>>,
    }

    impl CollectionSurface<i32> for ReadOnlyList {
        fn capabilities(&self) -> SurfaceCaps {
            SurfaceCaps::ITEM_FLAGS
        }

        fn visible_items(&self) -> Vec<i32> {
            self.items.borrow().clone()
        }
    }

    #[test]
    fn bind_pushes_initial_value() {
        let value = ReactiveValue::new(7);
        let control = NumericBox::new(0);
        let binding = bind(
            Endpoint::value(&value),
            Surface::scalar(control.clone()),
            BindingKind::Value,
            BindOptions::default(),
        )
        .unwrap();

        assert_eq!(control.read(), 7);
        assert_eq!(binding.state(), SyncState::Idle);
        assert_eq!(binding.listener_count(), 2);
        assert_eq!(binding.kind(), BindingKind::Value);
    }

    #[test]
    fn control_change_then_equal_set_is_noop() {
        let value = ReactiveValue::new(0);
        let control = NumericBox::new(0);
        let _binding = bind(
            Endpoint::value(&value),
            Surface::scalar(control.clone()),
            BindingKind::Value,
            BindOptions::default(),
        )
        .unwrap();
        let writes_after_bind = control.writes.get();

        control.spin_to(5);
        assert_eq!(value.get(), 5);

        value.set(5);
        assert_eq!(control.writes.get(), writes_after_bind);
    }

    #[test]
    fn scalar_kind_on_collection_surface_is_rejected() {
        let value = ReactiveValue::new(1);
        let control = Rc::new(ReadOnlyList {
            items: RefCell::new(vec![1]),
        });
        let err = bind(
            Endpoint::value(&value),
            Surface::collection(control),
            BindingKind::Text,
            BindOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BindError::SurfaceMismatch {
                kind: BindingKind::Text,
                surface: "collection"
            }
        );
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn data_source_on_read_only_list_is_rejected() {
        let list = ReactiveList::from(vec![1, 2, 3]);
        let control = Rc::new(ReadOnlyList {
            items: RefCell::new(vec![9]),
        });
        let err = bind(
            Endpoint::list(&list),
            Surface::collection(control.clone()),
            BindingKind::DataSource,
            BindOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            BindError::MissingCapability {
                kind: BindingKind::DataSource,
                missing: SurfaceCaps::SET_SOURCE
            }
        );
        assert_eq!(list.subscriber_count(), 0);
        assert_eq!(control.visible_items(), vec![9]);
    }

    #[test]
    fn endpoint_mismatch_is_rejected() {
        let value = ReactiveValue::new(1);
        let control = Rc::new(ReadOnlyList {
            items: RefCell::new(vec![]),
        });
        let err = bind(
            Endpoint::value(&value),
            Surface::collection(control),
            BindingKind::SelectedItems,
            BindOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BindError::EndpointMismatch { endpoint: "value", .. }));

        let list = ReactiveList::from(vec![1]);
        let err = bind(
            Endpoint::list(&list),
            Surface::scalar(NumericBox::new(0)),
            BindingKind::Value,
            BindOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BindError::EndpointMismatch { endpoint: "list", .. }));
    }

    #[test]
    fn unbind_releases_both_sides() {
        let value = ReactiveValue::new(1);
        let control = NumericBox::new(0);
        let binding = bind(
            Endpoint::value(&value),
            Surface::scalar(control.clone()),
            BindingKind::Value,
            BindOptions::default().with_label("qty"),
        )
        .unwrap();
        assert_eq!(binding.label(), Some("qty"));

        binding.unbind();
        assert_eq!(value.live_subscriber_count(), 0);
        assert_eq!(control.changed.live_subscriber_count(), 0);

        value.set(2);
        control.spin_to(3);
        assert_eq!(control.read(), 3);
        assert_eq!(value.get(), 2);
    }

    #[test]
    fn resync_repushes_after_out_of_band_change() {
        let value = ReactiveValue::new(4);
        let control = NumericBox::new(0);
        let binding = bind(
            Endpoint::value(&value),
            Surface::scalar(control.clone()),
            BindingKind::Value,
            BindOptions::one_way(),
        )
        .unwrap();

        control.spin_to(10);
        assert_eq!(value.get(), 4);
        binding.resync();
        assert_eq!(control.read(), 4);
    }

    #[test]
    fn bind_values_mirrors_both_ways() {
        let a = ReactiveValue::new(10);
        let b = ReactiveValue::new(0);
        let binding = bind_values(&a, &b);
        assert_eq!(b.get(), 10);

        a.set(5);
        assert_eq!(b.get(), 5);
        b.set(20);
        assert_eq!(a.get(), 20);
        assert_eq!(a.version(), 2);

        drop(binding);
        a.set(100);
        assert_eq!(b.get(), 20);
    }

    #[test]
    fn debug_format() {
        let a = ReactiveValue::new(1);
        let b = ReactiveValue::new(1);
        let binding = bind_values(&a, &b);
        let dbg = format!("{binding:?}");
        assert!(dbg.contains("Binding"));
        assert!(dbg.contains("Idle"));
    }
}
