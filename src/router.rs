//! Shell router: route table composition and first-match resolution.
//!
//! The composed table is built synchronously, once, before the first
//! render — built-in routes first, then registry-contributed routes in
//! registration order — and is immutable afterwards. Matching walks the
//! table in order and the first pattern that accepts the path wins.
//!
//! Pattern syntax: literal segments, `:name` parameter segments, and an
//! optional trailing `*` wildcard that mounts a whole sub-application
//! under one prefix (`/python/*` matches `/python` and everything below
//! it).

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::pages::Component;
use crate::registry::RouteEntry;

/// Destination of the bare-root redirect — the only implicit default in
/// the table.
pub const DEFAULT_ROUTE: &str = "/organization";

lazy_static! {
    static ref PARAM_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    segments: Vec<Segment>,
    trailing_wildcard: bool,
}

impl RoutePattern {
    /// Parse a pattern string. Malformed patterns are configuration
    /// defects and fail composition (and therefore startup).
    pub fn parse(pattern: &str) -> Result<Self, String> {
        if !pattern.starts_with('/') {
            return Err(format!("route pattern \"{pattern}\" must start with '/'"));
        }

        let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut trailing_wildcard = false;

        for (i, seg) in raw.iter().enumerate() {
            if *seg == "*" {
                if i != raw.len() - 1 {
                    return Err(format!(
                        "route pattern \"{pattern}\": wildcard is only allowed as the last segment"
                    ));
                }
                trailing_wildcard = true;
            } else if let Some(name) = seg.strip_prefix(':') {
                if !PARAM_NAME.is_match(name) {
                    return Err(format!(
                        "route pattern \"{pattern}\": invalid parameter name \"{name}\""
                    ));
                }
                segments.push(Segment::Param(name.to_string()));
            } else if seg.contains(':') || seg.contains('*') {
                return Err(format!(
                    "route pattern \"{pattern}\": segment \"{seg}\" mixes literals and markers"
                ));
            } else {
                segments.push(Segment::Literal((*seg).to_string()));
            }
        }

        Ok(Self {
            segments,
            trailing_wildcard,
        })
    }

    /// Match a concrete path against this pattern, returning the captured
    /// parameters on success.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if self.trailing_wildcard {
            // The wildcard also matches the bare prefix itself.
            if parts.len() < self.segments.len() {
                return None;
            }
        } else if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts.iter()) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

// ---------------------------------------------------------------------------
// Table composition
// ---------------------------------------------------------------------------

/// A route with its pattern compiled, ready for matching.
pub struct CompiledRoute {
    pub path: String,
    pub component: Component,
    pattern: RoutePattern,
}

impl std::fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRoute").field("path", &self.path).finish()
    }
}

/// A duplicate path detected during composition. First occurrence wins;
/// the later contribution is dropped and reported.
#[derive(Debug, Clone)]
pub struct RouteConflict {
    pub path: String,
    /// `"built-in"` or `"plugin"` — which side of the merge kept the path.
    pub kept_source: &'static str,
    pub dropped_source: &'static str,
}

/// The composed, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    conflicts: Vec<RouteConflict>,
}

/// Outcome of resolving a requested path against the table.
pub enum Resolution<'a> {
    /// Bare root — navigate to [`DEFAULT_ROUTE`] instead.
    Redirect(&'static str),
    Matched {
        route: &'a CompiledRoute,
        params: HashMap<String, String>,
    },
    NotFound,
}

impl RouteTable {
    /// Merge built-in routes with registry-contributed routes into one
    /// ordered table: built-ins first, then contributions in
    /// registration order.
    ///
    /// Duplicate paths keep the first occurrence (standard first-match
    /// semantics). The drop is a latent configuration defect, so it is
    /// reported loudly via the returned conflict list and stderr rather
    /// than resolved silently.
    pub fn compose(built_ins: &[RouteEntry], contributed: &[RouteEntry]) -> Result<Self, String> {
        let mut table = Self::default();
        let mut seen: HashMap<String, &'static str> = HashMap::new();

        let sources = built_ins
            .iter()
            .map(|e| (e, "built-in"))
            .chain(contributed.iter().map(|e| (e, "plugin")));

        for (entry, source) in sources {
            if let Some(kept_source) = seen.get(entry.path.as_str()) {
                eprintln!(
                    "[router] duplicate route path \"{}\": {} entry shadowed by earlier {} entry",
                    entry.path, source, kept_source
                );
                table.conflicts.push(RouteConflict {
                    path: entry.path.clone(),
                    kept_source,
                    dropped_source: source,
                });
                continue;
            }

            let pattern = RoutePattern::parse(&entry.path)?;
            seen.insert(entry.path.clone(), source);
            table.routes.push(CompiledRoute {
                path: entry.path.clone(),
                component: entry.component,
                pattern,
            });
        }

        Ok(table)
    }

    /// Resolve a requested path: redirect for the bare root, first match
    /// in table order, or not-found.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed.split('/').all(|s| s.is_empty()) {
            return Resolution::Redirect(DEFAULT_ROUTE);
        }

        for route in &self.routes {
            if let Some(params) = route.pattern.matches(trimmed) {
                return Resolution::Matched { route, params };
            }
        }
        Resolution::NotFound
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn conflicts(&self) -> &[RouteConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
