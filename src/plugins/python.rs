//! Python artifact plugin.
//!
//! Mounts its whole page tree under one wildcard prefix — the package
//! index has its own nested navigation, so the shell only routes the
//! prefix and the plugin's page interprets the remainder.

use crate::pages::RenderContext;
use crate::registry::{NavigationRegistry, RouteEntry, SidebarEntry};

use super::Plugin;

pub struct PythonPlugin;

impl Plugin for PythonPlugin {
    fn name(&self) -> &'static str {
        "python"
    }

    fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
        registry.append_sidebar_entries(vec![SidebarEntry::new(
            "/python",
            "Python Packages",
            package_index,
        )]);
        registry.append_routes(vec![RouteEntry::new("/python/*", package_index)]);
        Ok(())
    }
}

fn package_index(_ctx: &RenderContext) -> String {
    "Python Packages\n\nSimple index of packages published to this registry.".to_string()
}
