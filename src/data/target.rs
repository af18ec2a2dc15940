//! Simulator-side collaborators observed by plots.

use std::collections::HashMap;
use std::rc::Rc;

/// A simulated entity (ensemble, node, probe) that can be observed.
pub trait Target {
    fn label(&self) -> String;
}

/// A kind of observable data exposed by a target.
pub trait Capability {
    fn name(&self) -> String;
    /// Output dimensionality of this capability for `target`.
    fn out_dimensions(&self, target: &dyn Target) -> usize;
}

/// A target identified only by its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedTarget {
    pub label: String,
}

impl NamedTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Target for NamedTarget {
    fn label(&self) -> String {
        self.label.clone()
    }
}

/// A capability whose dimensionality is looked up per target label.
#[derive(Clone, Debug, Default)]
pub struct ProbeCapability {
    pub name: String,
    pub dimensions: HashMap<String, usize>,
    pub default_dimensions: usize,
}

impl ProbeCapability {
    pub fn new(name: impl Into<String>, default_dimensions: usize) -> Self {
        Self {
            name: name.into(),
            dimensions: HashMap::new(),
            default_dimensions,
        }
    }

    pub fn with_dimensions(mut self, target: impl Into<String>, dims: usize) -> Self {
        self.dimensions.insert(target.into(), dims);
        self
    }
}

impl Capability for ProbeCapability {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn out_dimensions(&self, target: &dyn Target) -> usize {
        self.dimensions
            .get(&target.label())
            .copied()
            .unwrap_or(self.default_dimensions)
    }
}

/// A capability of one target that the host can plot.
#[derive(Clone)]
pub struct Probe {
    pub target: Rc<dyn Target>,
    pub capability: Rc<dyn Capability>,
}

impl Probe {
    pub fn new(target: Rc<dyn Target>, capability: Rc<dyn Capability>) -> Self {
        Self { target, capability }
    }

    /// `(target label, capability name)`
    pub fn key(&self) -> (String, String) {
        (self.target.label(), self.capability.name())
    }

    pub fn dimensions(&self) -> usize {
        self.capability.out_dimensions(self.target.as_ref())
    }
}
