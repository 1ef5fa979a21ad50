//! Console output in the resolved output format.

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use pingctl_config::{keys, ConfigContext, OutputFormat};

/// Writes command results to stdout as text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Use the resolved `pingctl.outputFormat`; the unset sentinel means text.
    ///
    /// A value that fails to resolve also falls back to text, so commands
    /// that repair it still run.
    pub fn from_context(context: &ConfigContext) -> Self {
        let format = match context.resolve(keys::OUTPUT_FORMAT) {
            Ok(resolved) => resolved.value.as_output_format(),
            Err(e) => {
                warn!("Ignoring output format: {}", e);
                None
            }
        };
        Self::new(format.unwrap_or(OutputFormat::Text))
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `text` in text mode or `value` as pretty JSON.
    pub fn emit<T: Serialize>(&self, value: &T, text: &str) -> Result<()> {
        println!("{}", self.render(value, text)?);
        Ok(())
    }

    fn render<T: Serialize>(&self, value: &T, text: &str) -> Result<String> {
        if self.is_json() {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text.to_string())
        }
    }
}
