//! Built-in page components and the rendering contract.
//!
//! Pages are opaque renderable units: a function from a [`RenderContext`]
//! to the text block shown in the content area. The shell never inspects
//! what a page renders — it only places the output below the chrome
//! (title, sidebar, banner). Plugin pages use the same contract.

use std::collections::HashMap;

use crate::registry::{RouteEntry, SidebarEntry};

/// Everything a page may read while rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Named parameters captured from the matched route pattern.
    pub params: HashMap<String, String>,
    /// Username of the signed-in user, when the session resolved.
    pub username: Option<String>,
    /// Display title from the registry configuration endpoint.
    pub registry_title: String,
}

impl RenderContext {
    /// Look up a captured route parameter, empty string if absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }
}

/// A renderable unit. Plain function pointers keep entries `Copy` and
/// comparable in tests.
pub type Component = fn(&RenderContext) -> String;

// ---------------------------------------------------------------------------
// Built-in pages
// ---------------------------------------------------------------------------

pub fn organizations_list(_ctx: &RenderContext) -> String {
    "Organizations\n\nAll organizations visible to the current user.".to_string()
}

pub fn organization_detail(ctx: &RenderContext) -> String {
    format!("Organization: {}", ctx.param("organizationName"))
}

pub fn repositories_list(_ctx: &RenderContext) -> String {
    "Repositories\n\nAll repositories visible to the current user.".to_string()
}

pub fn repository_detail(ctx: &RenderContext) -> String {
    format!(
        "Repository: {}/{}",
        ctx.param("organizationName"),
        ctx.param("repositoryName")
    )
}

pub fn tag_detail(ctx: &RenderContext) -> String {
    format!(
        "Tag: {}/{}:{}",
        ctx.param("organizationName"),
        ctx.param("repositoryName"),
        ctx.param("tagName")
    )
}

/// Rendered when no route pattern matches the requested path.
pub fn not_found(_ctx: &RenderContext) -> String {
    "404: Page not found".to_string()
}

/// Full-content onboarding view shown while the username-confirmation
/// prompt is pending. Replaces the router output entirely.
pub fn new_user_onboarding(ctx: &RenderContext) -> String {
    let who = ctx.username.as_deref().unwrap_or("there");
    format!(
        "Welcome, {who}!\n\nConfirm your username to start using the registry.\n\
         Navigation is unavailable until the username is confirmed."
    )
}

/// Informational banner composed above routed content in normal mode.
pub fn info_banner() -> String {
    "[info] Please use the feedback form to tell us about your experience".to_string()
}

// ---------------------------------------------------------------------------
// Built-in navigation surface
// ---------------------------------------------------------------------------

/// Routes the shell ships with, independent of any plugin. These are
/// composed ahead of plugin-contributed routes, so they always win a
/// path conflict.
pub fn built_in_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new("/organization", organizations_list),
        RouteEntry::new("/organization/:organizationName", organization_detail),
        RouteEntry::new("/repository", repositories_list),
        RouteEntry::new(
            "/repository/:organizationName/:repositoryName/*",
            repository_detail,
        ),
        RouteEntry::new(
            "/tag/:organizationName/:repositoryName/:tagName",
            tag_detail,
        ),
    ]
}

/// Sidebar entries the shell ships with. Plugin entries are appended
/// after these in load order.
pub fn built_in_sidebar() -> Vec<SidebarEntry> {
    vec![
        SidebarEntry::new("/organization", "Organizations", organizations_list),
        SidebarEntry::new("/repository", "Repositories", repositories_list),
    ]
}
