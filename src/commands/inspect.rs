//! The `inspect` command: dump one specification.

use crate::config::FacetmapConfig;
use crate::context::MetamodelContext;
use crate::core::ClassRegistry;
use anyhow::{Context as _, Result};
use colored::*;
use std::io::Write;
use std::path::PathBuf;

pub struct InspectConfig {
    pub model: PathBuf,
    pub class: String,
    pub config: Option<PathBuf>,
}

pub fn inspect_class(cmd: InspectConfig) -> Result<()> {
    let config = FacetmapConfig::load(cmd.config.as_deref())?;
    let registry = ClassRegistry::from_model_file(&cmd.model)
        .with_context(|| format!("failed to load model from {}", cmd.model.display()))?;

    let mut context = MetamodelContext::new(registry).with_config(config);
    context.bootstrap()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_spec(&mut out, &context, &cmd.class)
}

fn write_spec(out: &mut impl Write, context: &MetamodelContext, class: &str) -> Result<()> {
    let spec = context.spec_for(class)?;

    writeln!(out, "{} {}", "class".bold(), spec.class_name().cyan())?;
    if let Some(sup) = spec.superclass().and_then(|id| context.spec(id)) {
        writeln!(out, "  extends {}", sup.class_name())?;
    }
    for (capability, precedence) in spec.holder().capabilities() {
        writeln!(out, "  {} ({})", capability.green(), precedence)?;
    }

    for member in spec.members() {
        let element = context
            .spec(member.element)
            .map(|e| e.class_name().to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "  {:?} {}: {}",
            member.kind,
            member.name.bold(),
            element
        )?;
        for (capability, precedence) in member.holder.capabilities() {
            writeln!(out, "    {} ({})", capability.green(), precedence)?;
        }
        for parameter in &member.parameters {
            writeln!(out, "    param {} {}", parameter.index, parameter.name)?;
            for (capability, precedence) in parameter.holder.capabilities() {
                writeln!(out, "      {} ({})", capability.green(), precedence)?;
            }
        }
    }
    Ok(())
}
