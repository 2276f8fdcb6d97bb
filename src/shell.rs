//! Shell bootstrap and render dispatch.
//!
//! The bootstrap sequence is strictly ordered: the plugin loader runs
//! first and the route table is composed synchronously from its output,
//! so the table is complete and immutable before anything renders. Only
//! then is the environment bridge mounted and the session fetched — the
//! current-user fetch is the one thing the shell blocks on, because the
//! onboarding gate cannot be decided without it.

use std::sync::Arc;

use crate::app_logger::LogLevel;
use crate::bridge::{self, ExecutionContext};
use crate::gate::{GateState, OnboardingGate};
use crate::pages::{self, RenderContext};
use crate::plugins::PluginLoader;
use crate::registry::{NavigationRegistry, SidebarEntry};
use crate::router::{Resolution, RouteTable};
use crate::session::{CurrentUser, SessionClient};
use crate::state::ShellState;

const FALLBACK_TITLE: &str = "Portside";

/// The composed console: immutable route table, sidebar, gate decision
/// and session data, ready to render any requested path.
#[derive(Debug)]
pub struct Shell {
    state: Arc<ShellState>,
    table: RouteTable,
    sidebar: Vec<SidebarEntry>,
    gate: OnboardingGate,
    user: Option<CurrentUser>,
    registry_title: String,
    session_error: Option<String>,
}

/// Run the full bootstrap with the console's built-in plugin set.
pub async fn bootstrap(
    context: Arc<dyn ExecutionContext>,
    state: Arc<ShellState>,
) -> Result<Shell, String> {
    bootstrap_with(context, state, PluginLoader::with_default_plugins()).await
}

/// Bootstrap with an explicit loader. Tests construct their own plugin
/// lists and a fresh registry per case.
pub async fn bootstrap_with(
    context: Arc<dyn ExecutionContext>,
    state: Arc<ShellState>,
    mut loader: PluginLoader,
) -> Result<Shell, String> {
    // 1. Plugins populate the registry. A plugin failure is fatal here —
    //    startup aborts rather than shipping a reduced navigation surface.
    let mut registry = NavigationRegistry::new();
    loader.load_all(&mut registry)?;
    state.log(
        LogLevel::Info,
        "plugins",
        format!(
            "{} plugins contributed {} routes and {} sidebar entries",
            loader.len(),
            registry.routes().len(),
            registry.sidebar_entries().len()
        ),
    );

    // 2. Compose the route table before anything renders.
    let table = RouteTable::compose(&pages::built_in_routes(), registry.routes())?;
    for conflict in table.conflicts() {
        state.log(
            LogLevel::Warn,
            "router",
            format!(
                "duplicate route path \"{}\": {} entry shadowed by earlier {} entry",
                conflict.path, conflict.dropped_source, conflict.kept_source
            ),
        );
    }

    let mut sidebar = pages::built_in_sidebar();
    sidebar.extend(registry.sidebar_entries().iter().cloned());

    // 3. Resolve environment and start the token fetch (not awaited).
    let origin = bridge::mount(context, &state)?;
    tracing::info!(session = %state.session_id, origin = %origin, "shell environment mounted");

    let client = SessionClient::new(origin, state.clone())?;

    // 4. Registry title is cosmetic — a failed config fetch is logged,
    //    not fatal.
    let registry_title = match client.fetch_registry_config().await {
        Ok(config) if !config.config.registry_title.is_empty() => config.config.registry_title,
        Ok(_) => FALLBACK_TITLE.to_string(),
        Err(e) => {
            state.log(LogLevel::Warn, "session", format!("config fetch failed: {e}"));
            FALLBACK_TITLE.to_string()
        }
    };

    // 5. The current-user fetch decides the gate. A failure surfaces as
    //    a rendered error state, never an indefinite loading screen.
    let mut gate = OnboardingGate::new();
    let (user, session_error) = match client.fetch_current_user().await {
        Ok(user) => {
            let decision = gate.resolve(&user);
            state.log(
                LogLevel::Info,
                "gate",
                format!("session resolved for \"{}\": {:?}", user.username, decision),
            );
            (Some(user), None)
        }
        Err(e) => {
            state.log(LogLevel::Error, "session", format!("user fetch failed: {e}"));
            (None, Some(e))
        }
    };

    Ok(Shell {
        state,
        table,
        sidebar,
        gate,
        user,
        registry_title,
        session_error,
    })
}

impl Shell {
    /// Render the console for a requested path.
    ///
    /// Dispatch order mirrors the gate contract: a session error renders
    /// an inline alert, a blocked gate renders only the onboarding view,
    /// and normal mode renders chrome plus routed content.
    pub fn render(&self, requested_path: &str) -> String {
        if let Some(err) = &self.session_error {
            return format!(
                "{}\n\n[error] Could not load the current session: {err}",
                self.registry_title
            );
        }

        match self.gate.state() {
            GateState::Gated => "Loading...".to_string(),
            GateState::Blocked => {
                let ctx = self.context(Default::default());
                format!(
                    "{}\n\n{}",
                    self.registry_title,
                    pages::new_user_onboarding(&ctx)
                )
            }
            GateState::Normal => {
                format!(
                    "{}\n\n{}\n\n{}\n\n{}",
                    self.registry_title,
                    self.render_sidebar(),
                    pages::info_banner(),
                    self.render_content(requested_path)
                )
            }
        }
    }

    /// Resolve and render the page body for a path. Follows the bare-root
    /// redirect one hop.
    fn render_content(&self, path: &str) -> String {
        match self.table.resolve(path) {
            Resolution::Redirect(target) => self.render_content(target),
            Resolution::Matched { route, params } => {
                let ctx = self.context(params);
                (route.component)(&ctx)
            }
            Resolution::NotFound => pages::not_found(&self.context(Default::default())),
        }
    }

    fn render_sidebar(&self) -> String {
        self.sidebar
            .iter()
            .map(|entry| format!("* {} ({})", entry.title, entry.nav_path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn context(&self, params: std::collections::HashMap<String, String>) -> RenderContext {
        RenderContext {
            params,
            username: self.user.as_ref().map(|u| u.username.clone()),
            registry_title: self.registry_title.clone(),
        }
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    pub fn sidebar(&self) -> &[SidebarEntry] {
        &self.sidebar
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn state(&self) -> &Arc<ShellState> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::EnvExecutionContext;
    use crate::config::ShellConfig;
    use crate::plugins::Plugin;
    use crate::registry::RouteEntry;

    fn page_a(_ctx: &RenderContext) -> String {
        "page A".to_string()
    }

    fn page_b(_ctx: &RenderContext) -> String {
        "page B".to_string()
    }

    struct PluginA;

    impl Plugin for PluginA {
        fn name(&self) -> &'static str {
            "a"
        }

        fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
            registry.append_routes(vec![
                RouteEntry::new("/a", page_a),
                RouteEntry::new("/a/detail", page_a),
            ]);
            Ok(())
        }
    }

    struct PluginB;

    impl Plugin for PluginB {
        fn name(&self) -> &'static str {
            "b"
        }

        fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
            registry.append_routes(vec![RouteEntry::new("/b", page_b)]);
            Ok(())
        }
    }

    /// Mock the session endpoints and return a state whose staging origin
    /// points at the mock server.
    async fn mock_session(server: &mut mockito::ServerGuard, user_body: &str) -> Arc<ShellState> {
        server
            .mock("GET", "/config")
            .with_status(200)
            .with_body(r#"{"config": {"REGISTRY_TITLE": "Acme Registry"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body(user_body)
            .create_async()
            .await;

        Arc::new(ShellState::new(ShellConfig {
            staging_origin: Some(server.url()),
            ..Default::default()
        }))
    }

    fn staging_context() -> Arc<dyn ExecutionContext> {
        Arc::new(EnvExecutionContext::fixed(false, "test-token"))
    }

    #[tokio::test]
    async fn composed_table_is_built_ins_plus_plugins_in_order() {
        let mut server = mockito::Server::new_async().await;
        let state = mock_session(&mut server, r#"{"username": "alice", "prompts": []}"#).await;

        let loader = PluginLoader::new(vec![Box::new(PluginA), Box::new(PluginB)]);
        let shell = bootstrap_with(staging_context(), state, loader).await.unwrap();

        let built_ins = pages::built_in_routes().len();
        assert_eq!(shell.route_table().len(), built_ins + 3);

        let paths: Vec<&str> = shell
            .route_table()
            .routes()
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(&paths[built_ins..], &["/a", "/a/detail", "/b"]);
    }

    #[tokio::test]
    async fn plugin_pages_render_and_unknown_paths_fall_through() {
        let mut server = mockito::Server::new_async().await;
        let state = mock_session(&mut server, r#"{"username": "alice", "prompts": []}"#).await;

        let loader = PluginLoader::new(vec![Box::new(PluginA), Box::new(PluginB)]);
        let shell = bootstrap_with(staging_context(), state, loader).await.unwrap();

        assert!(shell.render("/b").contains("page B"));
        assert!(shell.render("/c").contains("404"));
    }

    #[tokio::test]
    async fn root_redirects_to_organizations_list() {
        let mut server = mockito::Server::new_async().await;
        let state = mock_session(&mut server, r#"{"username": "alice", "prompts": []}"#).await;

        let shell = bootstrap(staging_context(), state).await.unwrap();
        let rendered = shell.render("/");
        assert!(rendered.contains("Organizations"));
        assert!(!rendered.contains("404"));
    }

    #[tokio::test]
    async fn pending_confirmation_blocks_all_routes() {
        let mut server = mockito::Server::new_async().await;
        let state = mock_session(
            &mut server,
            r#"{"username": "newbie", "prompts": ["confirm_username"]}"#,
        )
        .await;

        let shell = bootstrap(staging_context(), state).await.unwrap();
        assert_eq!(shell.gate_state(), GateState::Blocked);

        // Router content never mounts, regardless of the requested URL.
        for path in ["/", "/organization", "/npm", "/nope"] {
            let rendered = shell.render(path);
            assert!(rendered.contains("Confirm your username"), "path {path}");
            assert!(!rendered.contains("404"), "path {path}");
            assert!(!rendered.contains("All organizations"), "path {path}");
        }
    }

    #[tokio::test]
    async fn normal_mode_shows_banner_title_and_sidebar() {
        let mut server = mockito::Server::new_async().await;
        let state = mock_session(&mut server, r#"{"username": "alice", "prompts": []}"#).await;

        let shell = bootstrap(staging_context(), state).await.unwrap();
        let rendered = shell.render("/organization");

        assert!(rendered.starts_with("Acme Registry"));
        assert!(rendered.contains("[info]"));
        assert!(rendered.contains("* Organizations (/organization)"));
        // Default plugins appear after built-ins, in load order.
        let model = rendered.find("Model Registry").unwrap();
        let npm = rendered.find("Npm Packages").unwrap();
        let python = rendered.find("Python Packages").unwrap();
        assert!(model < npm && npm < python);
    }

    #[tokio::test]
    async fn session_fetch_failure_renders_error_state() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/config")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/user/")
            .with_status(500)
            .create_async()
            .await;

        let state = Arc::new(ShellState::new(ShellConfig {
            staging_origin: Some(server.url()),
            ..Default::default()
        }));

        let shell = bootstrap(staging_context(), state).await.unwrap();
        assert_eq!(shell.gate_state(), GateState::Gated);

        let rendered = shell.render("/organization");
        assert!(rendered.contains("[error]"));
        assert!(rendered.contains("Could not load the current session"));
    }

    #[tokio::test]
    async fn failing_plugin_aborts_bootstrap() {
        struct Broken;
        impl Plugin for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn register(&self, _registry: &mut NavigationRegistry) -> Result<(), String> {
                Err("boom".to_string())
            }
        }

        let state = Arc::new(ShellState::new(ShellConfig::default()));
        let loader = PluginLoader::new(vec![Box::new(Broken)]);
        let err = bootstrap_with(staging_context(), state, loader)
            .await
            .unwrap_err();
        assert!(err.contains("\"broken\""));
    }

    #[tokio::test]
    async fn non_production_context_talks_to_staging_origin() {
        let mut server = mockito::Server::new_async().await;
        let config_mock = server
            .mock("GET", "/config")
            .with_status(200)
            .with_body(r#"{"config": {}}"#)
            .create_async()
            .await;
        let user_mock = server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body(r#"{"username": "alice", "prompts": []}"#)
            .create_async()
            .await;

        let state = Arc::new(ShellState::new(ShellConfig {
            staging_origin: Some(server.url()),
            production_origin: Some("https://production.invalid".to_string()),
            ..Default::default()
        }));

        let shell = bootstrap(staging_context(), state).await.unwrap();

        // Every outgoing request hit the staging mock, none leaked to the
        // production origin.
        config_mock.assert_async().await;
        user_mock.assert_async().await;
        assert_eq!(
            shell.state().base_origin().unwrap().as_str(),
            format!("{}/", server.url())
        );
    }

    #[tokio::test]
    async fn duplicate_plugin_route_keeps_first_loaded_plugin() {
        struct FirstOwner;
        impl Plugin for FirstOwner {
            fn name(&self) -> &'static str {
                "first"
            }
            fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
                registry.append_routes(vec![RouteEntry::new("/shared", page_a)]);
                Ok(())
            }
        }
        struct SecondOwner;
        impl Plugin for SecondOwner {
            fn name(&self) -> &'static str {
                "second"
            }
            fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
                registry.append_routes(vec![RouteEntry::new("/shared", page_b)]);
                Ok(())
            }
        }

        let mut server = mockito::Server::new_async().await;
        let state = mock_session(&mut server, r#"{"username": "alice", "prompts": []}"#).await;

        let loader = PluginLoader::new(vec![Box::new(FirstOwner), Box::new(SecondOwner)]);
        let shell = bootstrap_with(staging_context(), state, loader).await.unwrap();

        assert!(shell.render("/shared").contains("page A"));
        assert_eq!(shell.route_table().conflicts().len(), 1);

        // The collision is recorded in the session log, not swallowed.
        let warned = shell
            .state()
            .log_entries(0)
            .iter()
            .any(|e| e.source == "router" && e.message.contains("/shared"));
        assert!(warned);
    }
}
