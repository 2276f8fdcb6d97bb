//! Model registry plugin: browse ML models stored as OCI artifacts.

use crate::pages::RenderContext;
use crate::registry::{NavigationRegistry, RouteEntry, SidebarEntry};

use super::Plugin;

pub struct ModelRegistryPlugin;

impl Plugin for ModelRegistryPlugin {
    fn name(&self) -> &'static str {
        "modelregistry"
    }

    fn register(&self, registry: &mut NavigationRegistry) -> Result<(), String> {
        registry.append_sidebar_entries(vec![SidebarEntry::new(
            "/modelregistry",
            "Model Registry",
            models_list,
        )]);
        registry.append_routes(vec![
            RouteEntry::new("/modelregistry", models_list),
            RouteEntry::new("/modelregistry/:modelName", model_detail),
        ]);
        Ok(())
    }
}

fn models_list(_ctx: &RenderContext) -> String {
    "Model Registry\n\nModels published to this registry.".to_string()
}

fn model_detail(ctx: &RenderContext) -> String {
    format!("Model: {}", ctx.param("modelName"))
}
