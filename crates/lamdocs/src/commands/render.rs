//! `lamdocs render` command implementation.

use std::path::PathBuf;

use clap::Args;
use lamdocs_config::{CliSettings, Config};

use lamdocs_renderer::directive::DirectiveExpander;

use super::{macro_set, markdown_pipeline, render_env};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Only expand macros and directives; print the resulting markdown.
    #[arg(long, conflicts_with_all = ["json", "directives"])]
    preprocess: bool,

    /// List the lambda directives in the file as JSON instead of rendering.
    #[arg(long, conflicts_with = "json")]
    directives: bool,

    /// Print HTML, title and table of contents as JSON.
    #[arg(long)]
    json: bool,

    /// Footnote anchor prefix (overrides config).
    #[arg(long)]
    doc_id: Option<String>,

    /// Path to configuration file (default: auto-discover lamdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            doc_id: self.doc_id.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = std::fs::read_to_string(&self.file).map_err(|source| CliError::Page {
            path: self.file.clone(),
            source,
        })?;

        if self.directives {
            let text = macro_set(&config).apply(&source).into_owned();
            let found = DirectiveExpander::new().scan(&text);
            tracing::info!(count = found.len(), file = %self.file.display(), "scanned directives");
            return Ok(output.document(&serde_json::to_string_pretty(&found)?)?);
        }

        let pipeline = markdown_pipeline(&config);
        if self.preprocess {
            return Ok(output.document(&pipeline.preprocess(&source))?);
        }

        let result = pipeline.render(&source, &render_env(&config));
        if self.json {
            output.document(&serde_json::to_string_pretty(&result)?)?;
        } else {
            output.document(&result.html)?;
        }
        Ok(())
    }
}
