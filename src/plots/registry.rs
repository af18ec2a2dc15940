//! Catalog of available plot types.
//!
//! A [`PlotRegistry`] maps each plot type's registry key to a
//! [`PlotDescriptor`]. The process-wide instance behind [`read`] is filled
//! by an explicit [`register_builtin`] call at startup, before any UI reads
//! it.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::data::target::Capability;
use crate::error::PlotError;
use crate::plots::plot_trait::{Plot, PlotContext, PlotType};
use crate::plots::raster_spike::RasterSpikePlot;
use crate::plots::time_series::TimeSeriesPlot;

/// Type-erased entry point for one plot type.
#[derive(Copy, Clone, Debug)]
pub struct PlotDescriptor {
    pub type_name: &'static str,
    pub plot_name: &'static str,
    pub supports: fn(&dyn Capability) -> bool,
    pub create: fn(PlotContext) -> Box<dyn Plot>,
}

fn create_boxed<P: PlotType>(ctx: PlotContext) -> Box<dyn Plot> {
    Box::new(P::create(ctx))
}

impl PlotDescriptor {
    pub fn of<P: PlotType>() -> Self {
        Self {
            type_name: P::TYPE_NAME,
            plot_name: P::plot_name(),
            supports: P::supports_capability,
            create: create_boxed::<P>,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlotRegistry {
    entries: IndexMap<&'static str, PlotDescriptor>,
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `P`; registering the same type again keeps a single entry.
    pub fn register<P: PlotType>(&mut self) -> Result<(), PlotError> {
        self.register_descriptor(PlotDescriptor::of::<P>())
    }

    pub fn register_descriptor(&mut self, desc: PlotDescriptor) -> Result<(), PlotError> {
        if desc.type_name.is_empty() {
            return Err(PlotError::NotImplemented {
                type_name: desc.plot_name.to_string(),
                what: "a registry key",
            });
        }
        if desc.plot_name.is_empty() {
            return Err(PlotError::NotImplemented {
                type_name: desc.type_name.to_string(),
                what: "plot_name",
            });
        }
        if self.entries.insert(desc.type_name, desc).is_none() {
            log::debug!("registered plot type {}", desc.type_name);
        }
        Ok(())
    }

    pub fn all_registered(&self) -> &IndexMap<&'static str, PlotDescriptor> {
        &self.entries
    }

    pub fn get(&self, type_name: &str) -> Option<&PlotDescriptor> {
        self.entries.get(type_name)
    }

    /// Plot types able to display `capability`, in registration order.
    pub fn supporting(&self, capability: &dyn Capability) -> Vec<PlotDescriptor> {
        self.entries
            .values()
            .filter(|d| (d.supports)(capability))
            .copied()
            .collect()
    }

    pub fn create(&self, type_name: &str, ctx: PlotContext) -> Result<Box<dyn Plot>, PlotError> {
        let desc = self
            .get(type_name)
            .ok_or_else(|| PlotError::UnknownPlotType(type_name.to_string()))?;
        Ok((desc.create)(ctx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

static GLOBAL: Lazy<RwLock<PlotRegistry>> = Lazy::new(|| RwLock::new(PlotRegistry::new()));

pub fn read() -> RwLockReadGuard<'static, PlotRegistry> {
    GLOBAL.read().unwrap_or_else(|e| e.into_inner())
}

pub fn write() -> RwLockWriteGuard<'static, PlotRegistry> {
    GLOBAL.write().unwrap_or_else(|e| e.into_inner())
}

/// Register a plot type in the process-wide registry.
pub fn register<P: PlotType>() -> Result<(), PlotError> {
    write().register::<P>()
}

/// Snapshot of the process-wide registry.
pub fn all_registered() -> IndexMap<&'static str, PlotDescriptor> {
    read().all_registered().clone()
}

/// Register every plot type shipped with this crate.
pub fn register_builtin() -> Result<(), PlotError> {
    let mut reg = write();
    reg.register::<RasterSpikePlot>()?;
    reg.register::<TimeSeriesPlot>()?;
    log::info!("{} plot types registered", reg.len());
    Ok(())
}

/// Empty the process-wide registry.
pub fn reset() {
    write().clear();
}
