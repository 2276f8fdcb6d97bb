//! Portside: a pluggable console shell for a container registry.
//!
//! The shell owns chrome and wiring only — navigation composition, route
//! resolution, environment/auth bridging, and the onboarding gate. Pages
//! are opaque renderable units; feature plugins contribute sidebar
//! entries and routes through the [`registry::NavigationRegistry`]
//! without the shell knowing their internals.

pub mod app_logger;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod gate;
pub mod pages;
pub mod plugins;
pub mod registry;
pub mod router;
pub mod session;
pub mod shell;
pub mod state;

pub use bridge::{EnvExecutionContext, ExecutionContext};
pub use config::ShellConfig;
pub use gate::{GateState, OnboardingGate};
pub use plugins::{Plugin, PluginLoader};
pub use registry::{NavigationRegistry, RouteEntry, SidebarEntry};
pub use router::{Resolution, RouteTable};
pub use shell::{Shell, bootstrap};
pub use state::ShellState;
