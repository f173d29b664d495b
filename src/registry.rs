//! The programming model: the ordered registry of facet factories,
//! post-processors and meta-model validators.
//!
//! Registration order is a total order and is load-bearing: it is the
//! tie-break for equal-precedence facets (the earlier factory's facet wins).
//! The registry freezes at bootstrap; registering afterwards is a hard
//! error, not a silent no-op.

use crate::core::FeatureType;
use crate::errors::{BuildError, Result};
use crate::factories::{self, FacetFactory};
use crate::postprocess::{ImmutablePropagationPostProcessor, SpecPostProcessor, TitleFromProjectionPostProcessor};
use crate::validation::{
    ConflictingTitleValidator, MetamodelValidator, OrphanedSupportingMethodValidator,
    ProjectionTargetValidator, RegexOnNonStringValidator,
};
use std::sync::Arc;

/// Append-ordered, de-duplicated registry. Immutable once frozen.
pub struct ProgrammingModel {
    factories: Vec<Arc<dyn FacetFactory>>,
    post_processors: Vec<Arc<dyn SpecPostProcessor>>,
    validators: Vec<Arc<dyn MetamodelValidator>>,
    frozen: bool,
}

impl ProgrammingModel {
    /// An empty model; useful for tests that register factories one by one
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
            post_processors: Vec::new(),
            validators: Vec::new(),
            frozen: false,
        }
    }

    /// The default factory line-up. Order matters: fallback facets first so
    /// anything else outranks or ties ahead of them, supporting-method
    /// conventions before their annotation-driven overrides.
    pub fn default_model() -> Self {
        let mut model = Self::empty();
        model.factories = vec![
            Arc::new(factories::FallbackFacetFactory),
            Arc::new(factories::TitleViaMethodFactory),
            Arc::new(factories::TitleFromPropertyFactory),
            Arc::new(factories::TitleAnnotationFactory),
            Arc::new(factories::HiddenAnnotationFactory),
            Arc::new(factories::DisabledAnnotationFactory),
            Arc::new(factories::ImmutableClassFactory),
            Arc::new(factories::NamedAnnotationFactory),
            Arc::new(factories::DescribedAsAnnotationFactory),
            Arc::new(factories::RegexAnnotationFactory),
            Arc::new(factories::MaxLengthAnnotationFactory),
            Arc::new(factories::ValidateViaMethodFactory),
            Arc::new(factories::DefaultedViaMethodFactory),
            Arc::new(factories::DefaultAnnotationFactory),
            Arc::new(factories::TypeOfFactory),
            Arc::new(factories::MemberOrderAnnotationFactory),
            Arc::new(factories::ProjectionAnnotationFactory),
        ];
        model.post_processors = vec![
            Arc::new(TitleFromProjectionPostProcessor),
            Arc::new(ImmutablePropagationPostProcessor),
        ];
        model.validators = vec![
            Arc::new(ConflictingTitleValidator),
            Arc::new(ProjectionTargetValidator),
            Arc::new(RegexOnNonStringValidator),
            Arc::new(OrphanedSupportingMethodValidator),
        ];
        model
    }

    /// Append a factory. Duplicates (by name) keep the first registration;
    /// registering after freeze fails fast.
    pub fn register_factory(&mut self, factory: Arc<dyn FacetFactory>) -> Result<()> {
        self.insert_factory(self.factories.len(), factory)
    }

    /// Register a factory ahead of the named one, so it wins
    /// equal-precedence ties against it. The anchor is an ordering hint: an
    /// unknown name appends instead.
    pub fn register_factory_before(
        &mut self,
        anchor: &str,
        factory: Arc<dyn FacetFactory>,
    ) -> Result<()> {
        let index = match self.factories.iter().position(|f| f.name() == anchor) {
            Some(index) => index,
            None => {
                log::warn!(
                    "no factory named '{anchor}' to insert '{}' before; appending",
                    factory.name()
                );
                self.factories.len()
            }
        };
        self.insert_factory(index, factory)
    }

    fn insert_factory(&mut self, index: usize, factory: Arc<dyn FacetFactory>) -> Result<()> {
        if self.frozen {
            return Err(BuildError::RegistryFrozen(factory.name().to_string()));
        }
        if self.factories.iter().any(|f| f.name() == factory.name()) {
            log::warn!(
                "facet factory '{}' registered twice; keeping the first registration",
                factory.name()
            );
            return Ok(());
        }
        log::debug!("registered facet factory '{}'", factory.name());
        self.factories.insert(index, factory);
        Ok(())
    }

    pub fn register_post_processor(&mut self, processor: Arc<dyn SpecPostProcessor>) -> Result<()> {
        if self.frozen {
            return Err(BuildError::RegistryFrozen(processor.name().to_string()));
        }
        self.post_processors.push(processor);
        Ok(())
    }

    pub fn register_validator(&mut self, validator: Arc<dyn MetamodelValidator>) -> Result<()> {
        if self.frozen {
            return Err(BuildError::RegistryFrozen(validator.name().to_string()));
        }
        self.validators.push(validator);
        Ok(())
    }

    /// Drop factories by name (configuration-driven). Pre-freeze only.
    pub fn disable_factories(&mut self, names: &[String]) -> Result<()> {
        if self.frozen {
            return Err(BuildError::RegistryFrozen(names.join(",")));
        }
        self.factories.retain(|f| {
            let keep = !names.iter().any(|n| n == f.name());
            if !keep {
                log::info!("facet factory '{}' disabled by configuration", f.name());
            }
            keep
        });
        Ok(())
    }

    /// Freeze the registry. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::debug!(
                "programming model frozen with {} factories, {} post-processors, {} validators",
                self.factories.len(),
                self.post_processors.len(),
                self.validators.len()
            );
            self.frozen = true;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// All factories in registration order
    pub fn stream_factories(&self) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.factories.iter()
    }

    /// Factories applicable to one feature type, preserving registration order
    pub fn factories_for(
        &self,
        feature_type: FeatureType,
    ) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.factories
            .iter()
            .filter(move |f| f.feature_types().contains(&feature_type))
    }

    pub fn post_processors(&self) -> &[Arc<dyn SpecPostProcessor>] {
        &self.post_processors
    }

    pub fn validators(&self) -> &[Arc<dyn MetamodelValidator>] {
        &self.validators
    }

    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }
}

impl Default for ProgrammingModel {
    fn default() -> Self {
        Self::default_model()
    }
}
