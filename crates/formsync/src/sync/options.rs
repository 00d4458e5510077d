#![forbid(unsafe_code)]

//! Binding kinds and per-binding configuration.

use super::surface::SurfaceCaps;

/// What a binding synchronizes.
///
/// Scalar kinds differ only in which property of the control they stand for;
/// the engine treats them identically. Collection kinds differ in which part
/// of the control's state is kept in sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingKind {
    /// Text of a label, button, or text box.
    Text,
    /// Checked state of a check box or radio button.
    Checked,
    /// Value of a numeric box, track bar, progress bar, or date picker.
    Value,
    /// Image of a picture box.
    Image,
    /// Backing collection of a list control, replaced wholesale on change.
    DataSource,
    /// Same as `DataSource`, for controls that call it a collection.
    Collection,
    /// The list's single `selected_item`, mirrored by the control's one
    /// flagged element.
    SelectedItem,
    /// Index of the control's one flagged element.
    SelectedIndex,
    /// The list's `selected` set, mirrored by per-element flags.
    SelectedItems,
    /// `DataSource` and `SelectedItems` together (checked list box).
    CheckedItems,
}

impl BindingKind {
    /// Whether this kind binds a single value to a scalar surface.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Text | Self::Checked | Self::Value | Self::Image)
    }

    /// Capabilities a collection surface needs for this kind in `mode`.
    /// Scalar kinds need none. Change-event capabilities are only needed
    /// when control changes flow back (`TwoWay`).
    #[must_use]
    pub const fn required_caps(self, mode: UpdateMode) -> SurfaceCaps {
        let two_way = matches!(mode, UpdateMode::TwoWay);
        match self {
            Self::Text | Self::Checked | Self::Value | Self::Image => SurfaceCaps::empty(),
            Self::DataSource | Self::Collection => SurfaceCaps::SET_SOURCE,
            Self::SelectedItem | Self::SelectedIndex if two_way => {
                SurfaceCaps::ITEM_FLAGS.union(SurfaceCaps::SELECTION_EVENTS)
            }
            Self::SelectedItems if two_way => {
                SurfaceCaps::ITEM_FLAGS.union(SurfaceCaps::ITEM_FLAG_EVENTS)
            }
            Self::CheckedItems if two_way => SurfaceCaps::SET_SOURCE
                .union(SurfaceCaps::ITEM_FLAGS)
                .union(SurfaceCaps::ITEM_FLAG_EVENTS),
            Self::SelectedItem | Self::SelectedIndex | Self::SelectedItems => {
                SurfaceCaps::ITEM_FLAGS
            }
            Self::CheckedItems => SurfaceCaps::SET_SOURCE.union(SurfaceCaps::ITEM_FLAGS),
        }
    }

    /// Stable name used in errors and tracing fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Checked => "Checked",
            Self::Value => "Value",
            Self::Image => "Image",
            Self::DataSource => "DataSource",
            Self::Collection => "Collection",
            Self::SelectedItem => "SelectedItem",
            Self::SelectedIndex => "SelectedIndex",
            Self::SelectedItems => "SelectedItems",
            Self::CheckedItems => "CheckedItems",
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which directions a binding propagates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateMode {
    /// Observable and control update each other.
    #[default]
    TwoWay,
    /// Only the observable updates the control. The control's change events
    /// are not subscribed. Used for display-only controls.
    OneWay,
}

/// Per-binding configuration.
///
/// # Example
///
/// ```
/// use formsync::sync::{BindOptions, UpdateMode};
///
/// let opts = BindOptions::default()
///     .with_mode(UpdateMode::OneWay)
///     .with_label("status-label");
/// assert_eq!(opts.mode, UpdateMode::OneWay);
/// assert_eq!(opts.label.as_deref(), Some("status-label"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BindOptions {
    /// Propagation directions.
    pub mode: UpdateMode,
    /// Name attached to this binding's tracing events.
    pub label: Option<String>,
}

impl BindOptions {
    /// Two-way binding without a label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a one-way binding.
    #[must_use]
    pub fn one_way() -> Self {
        Self::default().with_mode(UpdateMode::OneWay)
    }

    /// Set the update mode.
    #[must_use]
    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the tracing label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether control-side changes flow back into the observable.
    #[must_use]
    pub fn is_two_way(&self) -> bool {
        self.mode == UpdateMode::TwoWay
    }

    pub(crate) fn label_str(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}
