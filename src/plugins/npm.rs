//! Npm artifact plugin: browse npm packages stored in the registry.

use crate::pages::RenderContext;
use crate::registry::{NavigationRegistry, RouteEntry, SidebarEntry};

use super::Plugin;

pub struct NpmPlugin;

impl Plugin for NpmPlugin {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
        registry.append_sidebar_entries(vec![SidebarEntry::new(
            "/npm",
            "Npm Packages",
            packages_list,
        )]);
        registry.append_routes(vec![
            RouteEntry::new("/npm", packages_list),
            RouteEntry::new("/npm/:packageName", package_detail),
            RouteEntry::new("/npm/:packageName/:version", version_detail),
        ]);
        Ok(())
    }
}

fn packages_list(_ctx: &RenderContext) -> String {
    "Npm Packages\n\nPackages published to this registry.".to_string()
}

fn package_detail(ctx: &RenderContext) -> String {
    format!("Npm package: {}", ctx.param("packageName"))
}

fn version_detail(ctx: &RenderContext) -> String {
    format!(
        "Npm package: {}@{}",
        ctx.param("packageName"),
        ctx.param("version")
    )
}
