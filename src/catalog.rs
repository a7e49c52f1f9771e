//! Menu items and the three selection catalogs.

use crate::effects::EffectKind;
use crate::engine::AudioEngine;
use crate::EnumerationError;

/// Title of the synthetic first entry on each device screen.
pub const DEFAULT_TITLE: &str = "Default";

/// Description of the synthetic first entry on each device screen.
pub const DEFAULT_DESCRIPTION: &str = "System Default";

/// Something a selection list can show.
pub trait Item {
    /// Main line.
    fn title(&self) -> &str;

    /// Secondary line.
    fn description(&self) -> &str;

    /// Text matched against the list filter.
    fn filter_value(&self) -> &str {
        self.title()
    }
}

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    title: String,
    description: String,
}

impl MenuItem {
    /// Creates an item.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// The synthetic "use the system default" entry.
    pub fn system_default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_DESCRIPTION)
    }

    /// Returns `true` for the synthetic default entry.
    pub fn is_default(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// The device id this item selects: empty for the default entry,
    /// the title otherwise.
    pub fn device_id(&self) -> &str {
        if self.is_default() {
            ""
        } else {
            &self.title
        }
    }
}

impl Item for MenuItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// The three ordered lists the user picks from.
///
/// Device lists always start with the default entry, so none of the lists
/// is ever empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    inputs: Vec<MenuItem>,
    outputs: Vec<MenuItem>,
    effects: Vec<MenuItem>,
}

impl Catalog {
    /// Builds the catalog from device names.
    pub fn from_devices<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            inputs: device_items(inputs, "Input Device"),
            outputs: device_items(outputs, "Output Device"),
            effects: EffectKind::ALL
                .into_iter()
                .map(|kind| MenuItem::new(kind.name(), kind.description()))
                .collect(),
        }
    }

    /// Enumerates devices through the engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`EnumerationError`]; inputs are listed before
    /// outputs. An empty device list is not an error.
    pub fn load(engine: &dyn AudioEngine) -> Result<Self, EnumerationError> {
        let inputs = engine.list_input_devices()?;
        let outputs = engine.list_output_devices()?;
        tracing::debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            "enumerated devices"
        );
        Ok(Self::from_devices(inputs, outputs))
    }

    /// Input screen entries.
    pub fn inputs(&self) -> &[MenuItem] {
        &self.inputs
    }

    /// Output screen entries.
    pub fn outputs(&self) -> &[MenuItem] {
        &self.outputs
    }

    /// Effect screen entries.
    pub fn effects(&self) -> &[MenuItem] {
        &self.effects
    }
}

fn device_items<I>(names: I, description: &str) -> Vec<MenuItem>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    std::iter::once(MenuItem::system_default())
        .chain(names.into_iter().map(|n| MenuItem::new(n, description)))
        .collect()
}
