//! `bbcode render` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use bbcode_core::Interpreter;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// BBCode input file (default: read stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover bbcode.toml or bbcode.xml).
    #[arg(short, long, env = "BBCODE_CONFIG")]
    config: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or I/O fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let interpreter = bbcode_config::resolve(self.config.as_deref())?.build()?;

        let input = match &self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                render_to(&interpreter, &input, &mut file)?;
                Output::new().success(&format!("Rendered to {}", path.display()));
            }
            None => render_to(&interpreter, &input, &mut std::io::stdout().lock())?,
        }

        Ok(())
    }
}

/// Interpret `input` and write the result to `writer`.
fn render_to(
    interpreter: &Interpreter,
    input: &str,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let html = interpreter.interpret(input);
    tracing::debug!(input_len = input.len(), output_len = html.len(), "Rendered");
    writer.write_all(html.as_bytes())?;
    writer.flush()?;
    Ok(())
}
