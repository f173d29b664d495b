//! Facet factories: stateless strategies that inspect declarations and
//! conditionally attach facets.
//!
//! A factory declaring no interest in a feature simply attaches nothing —
//! that is the normal path for most (factory × feature) pairs. Genuine model
//! inconsistencies go to the failure collector, never panic, so one
//! malformed class cannot abort the whole build.

pub mod annotation;
pub mod collection;
pub mod defaults;
pub mod fallback;
pub mod hide;
pub mod title;
pub mod validate;

use crate::core::{ClassDeclaration, FeatureType, MemberDeclaration, ParameterDeclaration};
use crate::facets::FacetHolder;
use crate::validation::FailureCollector;

pub use annotation::{
    DescribedAsAnnotationFactory, MemberOrderAnnotationFactory, NamedAnnotationFactory,
    ProjectionAnnotationFactory,
};
pub use collection::TypeOfFactory;
pub use defaults::{DefaultAnnotationFactory, DefaultedViaMethodFactory};
pub use fallback::FallbackFacetFactory;
pub use hide::{DisabledAnnotationFactory, HiddenAnnotationFactory, ImmutableClassFactory};
pub use title::{TitleAnnotationFactory, TitleFromPropertyFactory, TitleViaMethodFactory};
pub use validate::{MaxLengthAnnotationFactory, RegexAnnotationFactory, ValidateViaMethodFactory};

/// Tracks which supporting methods remain unclaimed during one class's
/// introspection.
///
/// The remaining set is an immutable `im::HashSet`; each removal produces a
/// structurally shared copy, so the pass history stays cheap to snapshot and
/// later factories can never observe a method an earlier factory consumed.
#[derive(Debug, Clone)]
pub struct MethodRemover {
    remaining: im::HashSet<String>,
    consumed: Vec<String>,
}

impl MethodRemover {
    pub fn new(supporting_methods: &[String]) -> Self {
        Self {
            remaining: supporting_methods.iter().cloned().collect(),
            consumed: Vec::new(),
        }
    }

    /// True if the method is still on offer
    pub fn contains(&self, name: &str) -> bool {
        self.remaining.contains(name)
    }

    /// Claim a method as supporting infrastructure. Returns false if it was
    /// never declared or already claimed.
    pub fn remove(&mut self, name: &str) -> bool {
        if !self.remaining.contains(name) {
            return false;
        }
        self.remaining = self.remaining.without(name);
        self.consumed.push(name.to_string());
        true
    }

    pub fn remaining(&self) -> &im::HashSet<String> {
        &self.remaining
    }

    pub fn consumed(&self) -> &[String] {
        &self.consumed
    }
}

/// Introspection context for class-scope processing
pub struct ClassContext<'a> {
    pub declaration: &'a ClassDeclaration,
    pub holder: &'a FacetHolder,
    pub methods: &'a mut MethodRemover,
    pub failures: &'a mut FailureCollector,
}

/// Introspection context for one member
pub struct MemberContext<'a> {
    pub class: &'a ClassDeclaration,
    pub member: &'a MemberDeclaration,
    /// Holder of the owning class, for facets a member derives onto its class
    pub class_holder: &'a FacetHolder,
    pub holder: &'a FacetHolder,
    pub methods: &'a mut MethodRemover,
    pub failures: &'a mut FailureCollector,
}

/// Introspection context for one action parameter
pub struct ParameterContext<'a> {
    pub class: &'a ClassDeclaration,
    pub action: &'a MemberDeclaration,
    pub parameter: &'a ParameterDeclaration,
    pub index: usize,
    pub holder: &'a FacetHolder,
    pub failures: &'a mut FailureCollector,
}

/// A stateless strategy that inspects a declaration and optionally attaches
/// facets.
///
/// Determinism contract: given the same declaration and the same programming
/// model ordering, a factory must produce the same facet set. Factories hold
/// no mutable state beyond construction-time configuration.
pub trait FacetFactory: Send + Sync {
    /// Unique name; the programming model de-duplicates on it
    fn name(&self) -> &'static str;

    /// Feature types this factory is dispatched for
    fn feature_types(&self) -> &[FeatureType];

    fn process_class(&self, _ctx: &mut ClassContext<'_>) {}

    fn process_member(&self, _ctx: &mut MemberContext<'_>) {}

    fn process_parameter(&self, _ctx: &mut ParameterContext<'_>) {}
}
