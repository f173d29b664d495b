//! The metamodel context: the explicitly owned registry replacing the
//! original framework's process-wide singleton cache.
//!
//! Constructed once, bootstrapped once, then threaded through consumers.
//! Bootstrap is a single logical pass: load every declared class, run the
//! post-processors over the structurally complete batch, run the
//! validators, freeze. Build failures abort with `Err`; validation
//! failures come back as data and the caller picks the policy.

use crate::config::FacetmapConfig;
use crate::core::ClassRegistry;
use crate::errors::{BuildError, Result};
use crate::loader::{ObjectSpecification, SpecId, SpecificationLoader};
use crate::postprocess::PostProcessContext;
use crate::registry::ProgrammingModel;
use crate::validation::{run_validators, FailureCollector, ValidationReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct MetamodelContext {
    config: FacetmapConfig,
    model: ProgrammingModel,
    registry: ClassRegistry,
    loader: SpecificationLoader,
    frozen: AtomicBool,
    /// Failures collected by pre-bootstrap lazy loads; the loader caches
    /// those specs as Complete, so bootstrap would never see the failures
    /// again without this carry-over
    pending_failures: parking_lot::Mutex<FailureCollector>,
    report: parking_lot::RwLock<Option<ValidationReport>>,
}

impl MetamodelContext {
    pub fn new(registry: ClassRegistry) -> Self {
        Self::with_model(registry, ProgrammingModel::default_model())
    }

    pub fn with_model(registry: ClassRegistry, model: ProgrammingModel) -> Self {
        Self {
            config: FacetmapConfig::default(),
            model,
            registry,
            loader: SpecificationLoader::new(),
            frozen: AtomicBool::new(false),
            pending_failures: parking_lot::Mutex::new(FailureCollector::new()),
            report: parking_lot::RwLock::new(None),
        }
    }

    pub fn with_config(mut self, config: FacetmapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FacetmapConfig {
        &self.config
    }

    /// The extension point: mutable access to the programming model before
    /// bootstrap freezes it.
    pub fn programming_model_mut(&mut self) -> &mut ProgrammingModel {
        &mut self.model
    }

    pub fn programming_model(&self) -> &ProgrammingModel {
        &self.model
    }

    /// Build the whole metamodel. Returns the accumulated validation report;
    /// build failures (as opposed to validation failures) return `Err`.
    pub fn bootstrap(&mut self) -> Result<ValidationReport> {
        self.model
            .disable_factories(&self.config.disabled_factories.clone())?;
        self.model.freeze();

        // Any class introspected lazily before bootstrap already ran its
        // factories; its failures count toward this report
        let mut collector = std::mem::take(&mut *self.pending_failures.lock());

        let names: Vec<String> = self.registry.names().map(str::to_string).collect();
        log::info!("bootstrapping metamodel for {} class(es)", names.len());
        for name in &names {
            self.loader
                .load(&self.registry, &self.model, name, &mut collector)?;
        }

        // The batch is structurally complete; cross-spec derivation is safe
        let specs = self.loader.completed();
        let post_ctx = PostProcessContext::new(&self.loader);
        for spec in &specs {
            for processor in self.model.post_processors() {
                processor.post_process(spec, &post_ctx);
            }
        }

        let failures = run_validators(&self.model, &self.loader, &specs);
        collector.extend(failures);

        self.loader.freeze_all();
        self.frozen.store(true, Ordering::Release);

        let report = ValidationReport::from_collector(collector);
        if report.is_empty() {
            log::info!("metamodel bootstrap clean: {} specification(s)", specs.len());
        } else {
            log::warn!(
                "metamodel bootstrap finished with {} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            );
        }
        *self.report.write() = Some(report.clone());
        Ok(report)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// The specification for a class name.
    ///
    /// Before freeze this may lazily introspect an unseen class; afterwards
    /// unseen classes are an error, since the metamodel no longer grows.
    pub fn spec_for(&self, name: &str) -> Result<Arc<ObjectSpecification>> {
        if let Some(spec) = self.loader.spec_by_name(name) {
            return Ok(spec);
        }
        if self.is_frozen() {
            return Err(BuildError::ContextFrozen(name.to_string()));
        }
        let mut collector = FailureCollector::new();
        let result = self
            .loader
            .load(&self.registry, &self.model, name, &mut collector);
        self.pending_failures.lock().extend(collector.into_failures());
        self.loader
            .get(result?)
            .ok_or_else(|| BuildError::introspection(name, "specification did not complete"))
    }

    pub fn spec(&self, id: SpecId) -> Option<Arc<ObjectSpecification>> {
        self.loader.get(id)
    }

    /// All completed specifications, in completion order
    pub fn specs(&self) -> Vec<Arc<ObjectSpecification>> {
        self.loader.completed()
    }

    /// Subtype query usable for polymorphic dispatch
    pub fn is_of_type(&self, sub: &ObjectSpecification, sup: &ObjectSpecification) -> bool {
        self.loader.is_of_type(sub.id(), sup.id())
    }

    pub fn validation_report(&self) -> Option<ValidationReport> {
        self.report.read().clone()
    }

    pub fn loader(&self) -> &SpecificationLoader {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Annotation, AnnotationValue, ClassDeclaration, MemberDeclaration};
    use crate::facets::{Precedence, TitleFacet, TitleSource};

    fn order_registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Order")
                    .with_annotation(Annotation::single(
                        "title",
                        AnnotationValue::Str("Order#".into()),
                    ))
                    .with_member(
                        MemberDeclaration::property("ref", "String")
                            .with_annotation(Annotation::marker("title")),
                    )
                    .with_member(MemberDeclaration::property("cost", "BigDecimal")),
            )
            .unwrap();
        registry
    }

    #[test]
    fn explicit_title_wins_over_member_title() {
        let mut context = MetamodelContext::new(order_registry());
        let report = context.bootstrap().unwrap();
        assert!(report.is_empty());

        let order = context.spec_for("Order").unwrap();
        let title = order.facet::<TitleFacet>().unwrap();
        assert_eq!(title.precedence, Precedence::Explicit);
        assert_eq!(title.source, TitleSource::Static("Order#".into()));
    }

    #[test]
    fn frozen_context_rejects_unseen_classes() {
        let mut context = MetamodelContext::new(order_registry());
        context.bootstrap().unwrap();
        assert!(context.is_frozen());

        let err = context.spec_for("Unseen").unwrap_err();
        assert!(matches!(err, BuildError::ContextFrozen(name) if name == "Unseen"));
        // Known specs remain reachable
        assert!(context.spec_for("Order").is_ok());
    }

    #[test]
    fn attaches_after_freeze_are_rejected() {
        let mut context = MetamodelContext::new(order_registry());
        context.bootstrap().unwrap();

        let order = context.spec_for("Order").unwrap();
        let outcome = order.holder().attach(crate::facets::NamedFacet {
            precedence: Precedence::Explicit,
            name: "Late".into(),
        });
        assert_eq!(outcome, crate::facets::AttachmentOutcome::Frozen);
    }

    #[test]
    fn bootstrap_report_is_retained() {
        let mut registry = ClassRegistry::new();
        registry
            .register(ClassDeclaration::new("Bad").with_annotation(Annotation::single(
                "projection",
                AnnotationValue::Str("nope".into()),
            )))
            .unwrap();

        let mut context = MetamodelContext::new(registry);
        let report = context.bootstrap().unwrap();
        assert!(report.has_errors());
        assert_eq!(
            context.validation_report().unwrap().error_count(),
            report.error_count()
        );
    }

    #[test]
    fn lazy_load_failures_reach_the_bootstrap_report() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Order").with_member(
                    MemberDeclaration::property("ref", "String").with_annotation(
                        Annotation::single("regex", AnnotationValue::Str("[unclosed".into())),
                    ),
                ),
            )
            .unwrap();

        let mut context = MetamodelContext::new(registry);
        // Lazy introspection runs the factories once; the cached spec means
        // bootstrap will not re-run them
        context.spec_for("Order").unwrap();
        let report = context.bootstrap().unwrap();

        assert_eq!(report.error_count(), 1);
        assert!(report.failures()[0].message.contains("invalid regex"));
        assert_eq!(report.failures()[0].feature.to_string(), "Order#ref");
    }

    #[test]
    fn disabled_factory_produces_no_facets() {
        let config = FacetmapConfig {
            disabled_factories: vec!["regex-annotation".into()],
            ..Default::default()
        };
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDeclaration::new("Order").with_member(
                    MemberDeclaration::property("ref", "String").with_annotation(
                        Annotation::single("regex", AnnotationValue::Str("[A-Z]+".into())),
                    ),
                ),
            )
            .unwrap();

        let mut context = MetamodelContext::new(registry).with_config(config);
        context.bootstrap().unwrap();
        let order = context.spec_for("Order").unwrap();
        assert!(!order
            .member("ref")
            .unwrap()
            .contains_facet::<crate::facets::RegexFacet>());
    }
}
