//! `bbcode check` command implementation.

use std::collections::HashSet;
use std::path::PathBuf;

use bbcode_config::{ConfigDocument, TagEntry};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover bbcode.toml or bbcode.xml).
    #[arg(short, long, env = "BBCODE_CONFIG")]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or built.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let source = match &self.config {
            Some(path) => path.display().to_string(),
            None => bbcode_config::discover()
                .map_or_else(|| "built-in".to_owned(), |p| p.display().to_string()),
        };
        let document = bbcode_config::resolve(self.config.as_deref())?;
        document.build()?;

        output.field("Configuration", &source);
        output.field("Tags", document.tags.len());
        output.field("Replacements", document.replacements.len());
        output.field("Literal replacements", document.literal_replacements.len());
        for tag in &document.tags {
            output.info(&format!("  {}", describe(tag)));
        }

        if document.tags.is_empty() {
            output.warning("No tags defined: input will only be escaped");
        }
        for tag in shadowed_tags(&document) {
            output.warning(&format!(
                "Tag `{}` ({}) is defined more than once; only the first definition is used",
                tag.name,
                if tag.parameterized {
                    "parameterized"
                } else {
                    "plain"
                },
            ));
        }

        output.success("Configuration is valid");
        Ok(())
    }
}

/// One-line summary of a tag: `[name]` or `[name=]` plus its kind.
fn describe(tag: &TagEntry) -> String {
    let suffix = if tag.parameterized { "=" } else { "" };
    format!("[{}{suffix}] {}", tag.name, tag.kind)
}

/// Tags hidden by an earlier definition with the same name and parameterization.
fn shadowed_tags(document: &ConfigDocument) -> Vec<&TagEntry> {
    let mut seen = HashSet::new();
    document
        .tags
        .iter()
        .filter(|tag| !seen.insert((tag.name.to_uppercase(), tag.parameterized)))
        .collect()
}
