//! Line-oriented renderer backing the `watch` command.

use std::io::Write;

use cleango_dashboard::{DashboardView, Renderer};
use tracing::warn;

use crate::cli::OutputFormat;
use crate::output::dashboard_text;

const FRAME_RULE: &str = "----------------------------------------";

/// Writes one frame per distinct view; identical consecutive views are skipped.
pub(crate) struct TerminalRenderer<W: Write + Send> {
    out: W,
    format: OutputFormat,
    last: Option<DashboardView>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub(crate) const fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            last: None,
        }
    }

    fn write_frame(&mut self, view: &DashboardView) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(self.out, "{FRAME_RULE}")?;
                writeln!(self.out, "{}", dashboard_text(view))?;
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(view).map_err(std::io::Error::other)?;
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &DashboardView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        if let Err(err) = self.write_frame(view) {
            warn!(error = %err, "failed to write dashboard frame");
            return;
        }
        self.last = Some(view.clone());
    }
}
