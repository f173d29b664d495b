pub mod output;

pub use output::{create_writer, BootstrapSummary, OutputFormat, ReportWriter};
