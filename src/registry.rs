//! Process-wide navigation registry.
//!
//! The registry accumulates the sidebar entries and routable paths that
//! feature plugins contribute at startup. It is deliberately minimal:
//! both collections are append-only and ordered, because insertion order
//! drives sidebar display order and router first-match semantics. There
//! is no removal or reorder API — plugins cannot be unloaded, and the
//! shell treats the registry as read-only once the loader has finished.
//!
//! Appends perform no validation; duplicate route paths are detected at
//! merge time by the router composition (`router::RouteTable::compose`).

use crate::pages::Component;

/// One clickable entry in the persistent side navigation.
#[derive(Clone)]
pub struct SidebarEntry {
    /// Unique navigation key, also the path the entry links to.
    pub nav_path: String,
    /// Display label.
    pub title: String,
    /// Always true; kept so the entry shape matches the navigation item
    /// contract shared with non-sidebar items.
    pub is_side_nav: bool,
    pub component: Component,
}

impl SidebarEntry {
    pub fn new(nav_path: &str, title: &str, component: Component) -> Self {
        Self {
            nav_path: nav_path.to_string(),
            title: title.to_string(),
            is_side_nav: true,
            component,
        }
    }
}

impl std::fmt::Debug for SidebarEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarEntry")
            .field("nav_path", &self.nav_path)
            .field("title", &self.title)
            .field("is_side_nav", &self.is_side_nav)
            .finish()
    }
}

/// Maps a URL pattern to a page component.
#[derive(Clone)]
pub struct RouteEntry {
    /// Router pattern: literal segments, `:name` parameters, optional
    /// trailing `*` wildcard.
    pub path: String,
    pub component: Component,
}

impl RouteEntry {
    pub fn new(path: &str, component: Component) -> Self {
        Self {
            path: path.to_string(),
            component,
        }
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry").field("path", &self.path).finish()
    }
}

/// Ordered, append-only store of plugin navigation contributions.
///
/// Owned by the shell. Plugins only ever see `&mut NavigationRegistry`
/// for the duration of their `register` call, which grants append
/// capability and nothing else.
#[derive(Debug, Default)]
pub struct NavigationRegistry {
    sidebar_entries: Vec<SidebarEntry>,
    routes: Vec<RouteEntry>,
}

impl NavigationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append sidebar entries, preserving call order.
    pub fn append_sidebar_entries(&mut self, entries: Vec<SidebarEntry>) {
        self.sidebar_entries.extend(entries);
    }

    /// Append route entries, preserving call order.
    pub fn append_routes(&mut self, entries: Vec<RouteEntry>) {
        self.routes.extend(entries);
    }

    pub fn sidebar_entries(&self) -> &[SidebarEntry] {
        &self.sidebar_entries
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }
}
