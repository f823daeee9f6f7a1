//! CLI command implementations.

mod build;
mod loader;
mod render;

pub(crate) use build::BuildArgs;
pub(crate) use loader::LoaderCommand;
pub(crate) use render::RenderArgs;

use lamdocs_config::{ComponentsConfig, Config};
use lamdocs_renderer::directive::{ComponentNames, DirectiveExpander};
use lamdocs_renderer::{MacroSet, MarkdownPipeline, RenderEnv};

/// Markdown pipeline with the configured macros and component names.
pub(crate) fn markdown_pipeline(config: &Config) -> MarkdownPipeline {
    let expander = DirectiveExpander::new().with_components(component_names(&config.components));
    MarkdownPipeline::with_parts(macro_set(config), expander)
}

/// Standard macros followed by the configured literals, in key order.
pub(crate) fn macro_set(config: &Config) -> MacroSet {
    config
        .markdown
        .macros
        .iter()
        .fold(MacroSet::with_standard_rules(), |set, (token, text)| {
            set.with_literal(token, text.as_str())
        })
}

/// Render environment for every page of the build.
pub(crate) fn render_env(config: &Config) -> RenderEnv {
    RenderEnv {
        doc_id: config.markdown.doc_id.clone(),
    }
}

fn component_names(components: &ComponentsConfig) -> ComponentNames {
    ComponentNames {
        static_ref: components.static_ref.clone(),
        definition: components.definition.clone(),
        listing: components.listing.clone(),
        interactive: components.interactive.clone(),
        client_only: components.client_only.clone(),
    }
}
