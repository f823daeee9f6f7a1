//! Directive variants and their component markup.

use std::fmt::Write;

use crate::util::escape_attr;

/// A recognized lambda directive with its typed payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Directive {
    /// `` l`EXPR` ``: static display of an expression.
    StaticRef {
        /// Expression source.
        exp: String,
    },
    /// `` dL`EXPR` ``: a definition display.
    DefinableBlock {
        /// Expression source.
        exp: String,
        /// True when the directive is the only thing on its line.
        block: bool,
    },
    /// A `lambda-defs` fenced block naming a definitions file.
    DefinitionsListing {
        /// Path of the definitions file.
        file: String,
    },
    /// A `lambda-interactive` fenced block.
    InteractiveBlock {
        /// Context identifier or definitions file.
        context: String,
        /// Text after the `---` separator.
        title: String,
        /// Seed expression.
        exp: String,
    },
}

impl Directive {
    /// Short name of the variant, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StaticRef { .. } => "static",
            Self::DefinableBlock { .. } => "definition",
            Self::DefinitionsListing { .. } => "listing",
            Self::InteractiveBlock { .. } => "interactive",
        }
    }

    /// Render the component markup for this directive.
    #[must_use]
    pub fn to_markup(&self, components: &ComponentNames) -> String {
        let mut out = String::new();
        match self {
            Self::StaticRef { exp } => {
                write!(out, r#"<{} exp="{}" />"#, components.static_ref, escape_attr(exp)).unwrap();
            }
            Self::DefinableBlock { exp, block } => {
                write!(
                    out,
                    r#"<{} exp="{}" :block="{block}" />"#,
                    components.definition,
                    escape_attr(exp)
                )
                .unwrap();
            }
            Self::DefinitionsListing { file } => {
                write!(out, r#"<{} file="{}" />"#, components.listing, escape_attr(file)).unwrap();
            }
            Self::InteractiveBlock {
                context,
                title,
                exp,
            } => {
                // The client-only wrapper sits on its own lines so the markdown
                // parser treats the whole thing as one HTML block.
                writeln!(out, "<{}>", components.client_only).unwrap();
                write!(
                    out,
                    r#"<{} file="{}" exp="{}""#,
                    components.interactive,
                    escape_attr(context),
                    escape_attr(exp)
                )
                .unwrap();
                if !title.is_empty() {
                    write!(out, r#" title="{}""#, escape_attr(title)).unwrap();
                }
                out.push_str(" />\n");
                write!(out, "</{}>", components.client_only).unwrap();
            }
        }
        out
    }
}

/// Names of the components the directives expand into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentNames {
    /// Component for `` l`EXPR` ``.
    pub static_ref: String,
    /// Component for `` dL`EXPR` ``.
    pub definition: String,
    /// Component for `lambda-defs` blocks.
    pub listing: String,
    /// Component for `lambda-interactive` blocks.
    pub interactive: String,
    /// Boundary deferring its children until after hydration.
    pub client_only: String,
}

impl Default for ComponentNames {
    fn default() -> Self {
        Self {
            static_ref: "LambdaStatic".to_owned(),
            definition: "LambdaDef".to_owned(),
            listing: "LambdaRaw".to_owned(),
            interactive: "LambdaInteractive".to_owned(),
            client_only: "ClientOnly".to_owned(),
        }
    }
}
