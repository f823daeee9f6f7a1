//! `lamdocs build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use glob::Pattern;
use lamdocs_config::{CliSettings, Config};
use lamdocs_renderer::{MarkdownPipeline, RenderEnv};
use rayon::prelude::*;
use serde::Serialize;

use super::{markdown_pipeline, render_env};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover lamdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Footnote anchor prefix (overrides config).
    #[arg(long)]
    doc_id: Option<String>,
}

/// Contents of `manifest.json`.
#[derive(Debug, Serialize)]
struct Manifest {
    title: String,
    description: String,
    /// Installed interpreter version, empty when unknown.
    version: String,
    pages: Vec<PageEntry>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct PageEntry {
    /// Output path relative to the output directory, `/`-separated.
    path: String,
    title: String,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            out_dir: self.output_dir,
            doc_id: self.doc_id,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.docs_resolved.source_dir;
        let out_dir = &config.docs_resolved.out_dir;

        output.highlight(&config.site.title);
        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", out_dir.display()));

        let sources = find_markdown(source_dir)?;
        if sources.is_empty() {
            output.warning(&format!(
                "No markdown files found in {}",
                source_dir.display()
            ));
        }

        let pipeline = markdown_pipeline(&config);
        let env = render_env(&config);
        let pages = sources
            .par_iter()
            .map(|rel| render_page(&pipeline, &env, source_dir, out_dir, rel))
            .collect::<Result<Vec<_>, _>>()?;

        let manifest = Manifest {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            version: config.package_version(),
            pages,
        };
        fs::create_dir_all(out_dir)?;
        fs::write(
            out_dir.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        output.success(&format!(
            "Built {} pages to {}",
            manifest.pages.len(),
            out_dir.display()
        ));
        Ok(())
    }
}

/// Markdown files under `source_dir`, relative to it and sorted.
fn find_markdown(source_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory not found: {}",
            source_dir.display()
        )));
    }
    let pattern = format!(
        "{}/**/*.md",
        Pattern::escape(&source_dir.to_string_lossy())
    );
    let mut found = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(std::io::Error::from)?;
        if let Ok(rel) = path.strip_prefix(source_dir) {
            found.push(rel.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

/// Render one page and write it next to its siblings in `out_dir`.
fn render_page(
    pipeline: &MarkdownPipeline,
    env: &RenderEnv,
    source_dir: &Path,
    out_dir: &Path,
    rel: &Path,
) -> Result<PageEntry, CliError> {
    let src = source_dir.join(rel);
    let source = fs::read_to_string(&src).map_err(|source| CliError::Page {
        path: src.clone(),
        source,
    })?;
    let result = pipeline.render(&source, env);

    let rel_html = rel.with_extension("html");
    let dest = out_dir.join(&rel_html);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, &result.html).map_err(|source| CliError::Page {
        path: dest.clone(),
        source,
    })?;
    tracing::info!(page = %rel.display(), "rendered");

    let title = result
        .title
        .unwrap_or_else(|| titlecase_from_slug(&file_stem(rel)));
    Ok(PageEntry {
        path: rel_html
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        title,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Page title from a file name: `church-numerals` becomes `Church Numerals`.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        "Untitled".to_owned()
    } else {
        result
    }
}
