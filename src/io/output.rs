//! Validation report writers.

use crate::validation::{Severity, ValidationReport};
use colored::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// What one bootstrap produced, in a report-friendly shape
#[derive(Debug, Serialize)]
pub struct BootstrapSummary {
    pub classes: usize,
    pub members: usize,
    pub facets: usize,
    pub report: ValidationReport,
}

pub trait ReportWriter {
    fn write_summary(&mut self, summary: &BootstrapSummary) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_summary(&mut self, summary: &BootstrapSummary) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_summary(&mut self, summary: &BootstrapSummary) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} classes, {} members, {} facets",
            "metamodel:".bold(),
            summary.classes,
            summary.members,
            summary.facets
        )?;

        if summary.report.is_empty() {
            writeln!(self.writer, "{}", "validation: clean".green())?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "validation: {} error(s), {} warning(s)",
            summary.report.error_count().to_string().red(),
            summary.report.warning_count().to_string().yellow()
        )?;
        for failure in summary.report.failures() {
            let tag = match failure.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            writeln!(
                self.writer,
                "  {tag} [{}] {}",
                failure.feature, failure.message
            )?;
        }
        Ok(())
    }
}

pub fn create_writer<W: Write + 'static>(format: OutputFormat, writer: W) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
