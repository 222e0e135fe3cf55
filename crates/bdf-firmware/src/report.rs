//! Diagnostic output of interrupts
//!
//! Every interrupt produces one report on the firmware's console: the
//! protective actions taken and the resulting snapshot. Reports go to a
//! separate sink from logs so they can be piped on their own.

use std::io::{self, Write};

use bdf_core::{InterruptReport, ProtectiveAction, Snapshot};
use serde::Serialize;

/// How interrupt reports are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    interrupt: u64,
    actions: &'a [ProtectiveAction],
    snapshot: &'a Snapshot,
}

/// Writes interrupt reports to a sink.
pub struct Reporter<W: Write> {
    format: ReportFormat,
    sink: W,
    count: u64,
}

impl Reporter<io::Stdout> {
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(format: ReportFormat, sink: W) -> Self {
        Self {
            format,
            sink,
            count: 0,
        }
    }

    /// Interrupts reported so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    pub fn interrupt(&mut self, report: &InterruptReport) -> io::Result<()> {
        self.count += 1;
        match self.format {
            ReportFormat::Text => {
                writeln!(self.sink, "server interrupt")?;
                for action in &report.actions {
                    match action {
                        ProtectiveAction::BreakerTripped { breaker, .. } => {
                            let label = breaker.to_string().replace('_', " ");
                            writeln!(self.sink, "*** PROTECTED: {label} tripped")?;
                        }
                    }
                }
                write!(self.sink, "{}", report.snapshot)?;
            }
            ReportFormat::Json => {
                let json = JsonReport {
                    interrupt: self.count,
                    actions: &report.actions,
                    snapshot: &report.snapshot,
                };
                serde_json::to_writer(&mut self.sink, &json)?;
                writeln!(self.sink)?;
            }
        }
        self.sink.flush()
    }
}
