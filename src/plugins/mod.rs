//! Feature plugins and the plugin loader.
//!
//! A plugin is an independently developed feature module that contributes
//! sidebar entries and routable pages without the shell depending on its
//! internals. The set of plugins is fixed at build time; the loader
//! invokes each plugin's `register` exactly once, in list order, before
//! the shell's first render.
//!
//! Registration is not idempotent — running a plugin twice duplicates
//! its entries — so the loader enforces the exactly-once guarantee at
//! the API level. A failing plugin aborts startup: silently dropping its
//! contribution would hide functionality from the user without
//! explanation.

pub mod model_registry;
pub mod npm;
pub mod python;

use crate::registry::NavigationRegistry;

/// Contract every feature plugin implements. `register` is synchronous
/// and appends zero or more sidebar entries and routes.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String>;
}

/// Invokes each plugin in a fixed order, exactly once per process
/// lifetime.
pub struct PluginLoader {
    plugins: Vec<Box<dyn Plugin>>,
    loaded: bool,
}

impl PluginLoader {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self {
            plugins,
            loaded: false,
        }
    }

    /// The console's built-in plugin set, in load order. Order matters:
    /// it fixes sidebar display order and which entry wins a route-path
    /// conflict.
    pub fn with_default_plugins() -> Self {
        Self::new(vec![
            Box::new(model_registry::ModelRegistryPlugin),
            Box::new(npm::NpmPlugin),
            Box::new(python::PythonPlugin),
        ])
    }

    /// Run every plugin's `register` in list order. Errors propagate
    /// immediately and abort startup. Calling this twice is an error —
    /// re-registration would duplicate every entry.
    pub fn load_all(&mut self, registry: &mut NavigationRegistry) -> Result<(), String> {
        if self.loaded {
            return Err("plugins already loaded for this process".to_string());
        }
        self.loaded = true;

        for plugin in &self.plugins {
            plugin
                .register(registry)
                .map_err(|e| format!("plugin \"{}\" failed to register: {e}", plugin.name()))?;
        }
        Ok(())
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
