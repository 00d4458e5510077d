#![forbid(unsafe_code)]

//! Lifetime grouping for bindings.

use super::binding::{Binding, Endpoint, Surface, bind};
use super::error::BindError;
use super::options::{BindOptions, BindingKind};

/// Owns the bindings of one logical scope, such as every binding on a form.
///
/// When the scope is dropped, all held bindings are released, disconnecting
/// the scope's controls from their observables.
///
/// # Usage
///
/// ```
/// use std::rc::Rc;
/// use formsync::reactive::ReactiveValue;
/// use formsync::sync::{BindOptions, BindingKind, BindingScope, Endpoint, Surface};
///
/// let name = ReactiveValue::new(String::from("Ada"));
/// let field = ReactiveValue::new(String::new());
///
/// let mut scope = BindingScope::new();
/// scope
///     .bind(
///         Endpoint::value(&name),
///         Surface::scalar(Rc::new(field.clone())),
///         BindingKind::Text,
///         BindOptions::default(),
///     )
///     .unwrap();
/// assert_eq!(field.get(), "Ada");
///
/// drop(scope);
/// name.set("Grace".into());
/// assert_eq!(field.get(), "Ada");
/// ```
///
/// # Invariants
///
/// 1. Bindings are released in reverse registration order.
/// 2. After drop or `clear()`, no propagation from this scope happens.
/// 3. A failed `bind` leaves the scope unchanged.
#[derive(Default)]
pub struct BindingScope {
    bindings: Vec<Binding>,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind and keep the resulting binding in this scope.
    ///
    /// # Errors
    ///
    /// Whatever [`bind`] reports; the scope is left unchanged.
    pub fn bind<T: Clone + PartialEq + 'static>(
        &mut self,
        endpoint: Endpoint<T>,
        surface: Surface<T>,
        kind: BindingKind,
        options: BindOptions,
    ) -> Result<&mut Self, BindError> {
        let binding = bind(endpoint, surface, kind, options)?;
        self.bindings.push(binding);
        Ok(self)
    }

    /// Take ownership of an existing binding.
    pub fn hold(&mut self, binding: Binding) -> &mut Self {
        self.bindings.push(binding);
        self
    }

    /// Number of held bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Held bindings, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Release every binding now. The scope stays usable.
    pub fn clear(&mut self) {
        while let Some(binding) = self.bindings.pop() {
            binding.unbind();
        }
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.bindings.len())
            .finish()
    }
}
