//! Meta-model validation: a final pass that walks every completed
//! specification and *accumulates* semantic failures instead of throwing,
//! so one bootstrap surfaces the complete set of modeling errors at once.

use crate::core::{FeatureIdentifier, MemberKind};
use crate::facets::{AttachmentOutcome, HiddenFacet, Precedence, ProjectionFacet, RegexFacet};
use crate::loader::{ObjectSpecification, SpecificationLoader};
use crate::registry::ProgrammingModel;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One accumulated failure: severity, message, offending feature
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    pub severity: Severity,
    pub feature: FeatureIdentifier,
    pub message: String,
}

/// Accumulates failures during introspection and validation
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Vec<ValidationFailure>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, feature: FeatureIdentifier, message: impl Into<String>) {
        self.failures.push(ValidationFailure {
            severity: Severity::Error,
            feature,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, feature: FeatureIdentifier, message: impl Into<String>) {
        self.failures.push(ValidationFailure {
            severity: Severity::Warning,
            feature,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, failures: impl IntoIterator<Item = ValidationFailure>) {
        self.failures.extend(failures);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }
}

/// The flat, ordered outcome of one bootstrap's validation pass.
///
/// A non-empty report means the metamodel built but is semantically suspect;
/// whether that aborts startup is the caller's policy, not this engine's.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn from_collector(collector: FailureCollector) -> Self {
        Self {
            failures: collector.into_failures(),
        }
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn error_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Read access to the completed batch during validation
pub struct ValidationContext<'a> {
    loader: &'a SpecificationLoader,
}

impl<'a> ValidationContext<'a> {
    pub fn new(loader: &'a SpecificationLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &SpecificationLoader {
        self.loader
    }
}

/// A strategy that inspects one specification for semantic errors.
///
/// Returning `false` short-circuits the *remaining* validators for this
/// specification only; other specifications are always still visited.
pub trait MetamodelValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn visit(
        &self,
        spec: &ObjectSpecification,
        ctx: &ValidationContext<'_>,
        collector: &mut FailureCollector,
    ) -> bool;
}

/// Runs every validator over every completed specification.
///
/// Specs are walked in parallel (the batch is complete and read-only by
/// now); result order stays deterministic because the per-spec failure lists
/// are concatenated in completion order.
pub fn run_validators(
    model: &ProgrammingModel,
    loader: &SpecificationLoader,
    specs: &[Arc<ObjectSpecification>],
) -> Vec<ValidationFailure> {
    specs
        .par_iter()
        .map(|spec| {
            let ctx = ValidationContext::new(loader);
            let mut collector = FailureCollector::new();
            for validator in model.validators() {
                if !validator.visit(spec, &ctx, &mut collector) {
                    log::debug!(
                        "validator '{}' short-circuited remaining checks for '{}'",
                        validator.name(),
                        spec.class_name()
                    );
                    break;
                }
            }
            collector.into_failures()
        })
        .flatten()
        .collect()
}

/// Two or more explicit title sources on one class is a modeling conflict.
pub struct ConflictingTitleValidator;

impl MetamodelValidator for ConflictingTitleValidator {
    fn name(&self) -> &'static str {
        "conflicting-title"
    }

    fn visit(
        &self,
        spec: &ObjectSpecification,
        _ctx: &ValidationContext<'_>,
        collector: &mut FailureCollector,
    ) -> bool {
        let explicit_titles = spec
            .holder()
            .attachment_log()
            .iter()
            .filter(|r| {
                r.capability == "title"
                    && r.precedence == Precedence::Explicit
                    && r.outcome != AttachmentOutcome::Frozen
            })
            .count();
        if explicit_titles > 1 {
            collector.error(
                spec.identifier().clone(),
                format!("{explicit_titles} explicit title sources declared; at most one is allowed"),
            );
        }
        true
    }
}

/// The projection target must exist and must not be hidden.
pub struct ProjectionTargetValidator;

impl MetamodelValidator for ProjectionTargetValidator {
    fn name(&self) -> &'static str {
        "projection-target"
    }

    fn visit(
        &self,
        spec: &ObjectSpecification,
        _ctx: &ValidationContext<'_>,
        collector: &mut FailureCollector,
    ) -> bool {
        let Some(projection) = spec.facet::<ProjectionFacet>() else {
            return true;
        };
        match spec.member(&projection.member) {
            None => {
                collector.error(
                    spec.identifier().clone(),
                    format!("projection names unknown member '{}'", projection.member),
                );
                // No point checking the target further
                return false;
            }
            Some(member) if member.contains_facet::<HiddenFacet>() => {
                collector.error(
                    member.identifier().clone(),
                    "projection target must not be hidden",
                );
            }
            Some(_) => {}
        }
        true
    }
}

/// A regex facet only makes sense on a string-valued property.
pub struct RegexOnNonStringValidator;

impl MetamodelValidator for RegexOnNonStringValidator {
    fn name(&self) -> &'static str {
        "regex-on-non-string"
    }

    fn visit(
        &self,
        spec: &ObjectSpecification,
        ctx: &ValidationContext<'_>,
        collector: &mut FailureCollector,
    ) -> bool {
        for member in spec.members_of_kind(MemberKind::Property) {
            if !member.contains_facet::<RegexFacet>() {
                continue;
            }
            let element_name = ctx
                .loader()
                .get(member.element)
                .map(|element| element.class_name().to_string());
            if element_name.as_deref() != Some("String") {
                collector.error(
                    member.identifier().clone(),
                    format!(
                        "regex declared on non-string property of type '{}'",
                        element_name.as_deref().unwrap_or("?")
                    ),
                );
            }
        }
        true
    }
}

/// Supporting methods that match a recognized prefix but were never claimed
/// are probably typos (`validateReff`), worth a warning.
pub struct OrphanedSupportingMethodValidator;

impl MetamodelValidator for OrphanedSupportingMethodValidator {
    fn name(&self) -> &'static str {
        "orphaned-supporting-method"
    }

    fn visit(
        &self,
        spec: &ObjectSpecification,
        _ctx: &ValidationContext<'_>,
        collector: &mut FailureCollector,
    ) -> bool {
        for method in spec.orphaned_methods() {
            collector.warning(
                spec.identifier().clone(),
                format!("supporting method '{method}' matches no member and was never claimed"),
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Annotation, AnnotationValue, ClassDeclaration, ClassRegistry, MemberDeclaration,
    };

    fn build_and_validate(registry: &ClassRegistry) -> ValidationReport {
        let loader = SpecificationLoader::new();
        let model = ProgrammingModel::default_model();
        let mut collector = FailureCollector::new();
        let names: Vec<String> = registry.names().map(str::to_string).collect();
        for name in names {
            loader.load(registry, &model, &name, &mut collector).unwrap();
        }
        let specs = loader.completed();
        collector.extend(run_validators(&model, &loader, &specs));
        ValidationReport::from_collector(collector)
    }

    #[test]
    fn failures_accumulate_across_classes() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Alpha").with_annotation(Annotation::single(
                    "projection",
                    AnnotationValue::Str("missing".into()),
                )),
            )
            .unwrap();
        registry
            .register(
                ClassDeclaration::new("Beta").with_member(
                    MemberDeclaration::property("count", "Integer").with_annotation(
                        Annotation::single("regex", AnnotationValue::Str("\\d+".into())),
                    ),
                ),
            )
            .unwrap();

        let report = build_and_validate(&registry);
        // One failure for each invalid class, not just the first
        assert_eq!(report.error_count(), 2);
        let classes: Vec<_> = report
            .failures()
            .iter()
            .map(|f| f.feature.class_name().to_string())
            .collect();
        assert!(classes.contains(&"Alpha".to_string()));
        assert!(classes.contains(&"Beta".to_string()));
    }

    #[test]
    fn hidden_projection_target_is_an_error() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Summary")
                    .with_annotation(Annotation::single(
                        "projection",
                        AnnotationValue::Str("key".into()),
                    ))
                    .with_member(
                        MemberDeclaration::property("key", "String")
                            .with_annotation(Annotation::marker("hidden")),
                    ),
            )
            .unwrap();

        let report = build_and_validate(&registry);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.failures()[0].feature.to_string(), "Summary#key");
    }

    #[test]
    fn orphaned_supporting_method_is_a_warning() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Order")
                    .with_member(MemberDeclaration::property("ref", "String"))
                    .with_supporting_method("validateReff"),
            )
            .unwrap();

        let report = build_and_validate(&registry);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.has_errors());
        assert!(report.failures()[0].message.contains("validateReff"));
    }

    #[test]
    fn clean_model_yields_empty_report() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Order")
                    .with_member(MemberDeclaration::property("ref", "String"))
                    .with_supporting_method("title"),
            )
            .unwrap();

        let report = build_and_validate(&registry);
        assert!(report.is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let mut collector = FailureCollector::new();
        collector.error(FeatureIdentifier::member("Order", "ref"), "bad");
        let report = ValidationReport::from_collector(collector);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("Order"));
    }
}
