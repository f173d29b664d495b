//! The `validate` command: build the metamodel from a model file and
//! surface the validation report.

use crate::config::FacetmapConfig;
use crate::context::MetamodelContext;
use crate::core::ClassRegistry;
use crate::io::output::{create_writer, BootstrapSummary, OutputFormat};
use anyhow::{bail, Context as _, Result};
use std::fs::File;
use std::path::PathBuf;

pub struct ValidateConfig {
    pub model: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub config: Option<PathBuf>,
}

pub fn validate_model(cmd: ValidateConfig) -> Result<()> {
    let mut config = FacetmapConfig::load(cmd.config.as_deref())?;
    if cmd.strict {
        config.strict = true;
    }

    let registry = ClassRegistry::from_model_file(&cmd.model)
        .with_context(|| format!("failed to load model from {}", cmd.model.display()))?;

    let mut context = MetamodelContext::new(registry).with_config(config);
    let report = context.bootstrap()?;
    let summary = summarize(&context, report.clone());

    let mut writer: Box<dyn crate::io::output::ReportWriter> = match &cmd.output {
        Some(path) => create_writer(cmd.format, File::create(path)?),
        None => create_writer(cmd.format, std::io::stdout()),
    };
    writer.write_summary(&summary)?;

    if context.config().report_is_fatal(&report) {
        bail!(
            "validation failed with {} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        );
    }
    Ok(())
}

fn summarize(
    context: &MetamodelContext,
    report: crate::validation::ValidationReport,
) -> BootstrapSummary {
    let specs = context.specs();
    let entities: Vec<_> = specs.iter().filter(|s| !s.is_value()).collect();
    let members: usize = entities.iter().map(|s| s.member_count()).sum();
    let facets: usize = entities
        .iter()
        .map(|s| {
            s.holder().facet_count()
                + s.members()
                    .map(|m| {
                        m.holder.facet_count()
                            + m.parameters
                                .iter()
                                .map(|p| p.holder.facet_count())
                                .sum::<usize>()
                    })
                    .sum::<usize>()
        })
        .sum();
    BootstrapSummary {
        classes: entities.len(),
        members,
        facets,
        report,
    }
}
