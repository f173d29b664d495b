//! Post-processors: a second pass over the batch once every specification is
//! structurally complete.
//!
//! Safe to read facets across specifications here; attached facets go
//! through the ordinary precedence rule, so a derived facet can fill a gap
//! or displace a fallback but never an explicit one.

use crate::core::MemberKind;
use crate::facets::{
    DisabledFacet, ImmutableFacet, Precedence, ProjectionFacet, TitleFacet, TitleSource,
};
use crate::loader::{ObjectSpecification, SpecificationLoader};

/// Read access to the completed batch during post-processing
pub struct PostProcessContext<'a> {
    loader: &'a SpecificationLoader,
}

impl<'a> PostProcessContext<'a> {
    pub fn new(loader: &'a SpecificationLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &SpecificationLoader {
        self.loader
    }
}

/// A strategy run once per specification after the whole batch is complete
pub trait SpecPostProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn post_process(&self, spec: &ObjectSpecification, ctx: &PostProcessContext<'_>);
}

/// Derives a title from the projection target when no stronger title source
/// exists. Attached at `Inferred`, so it displaces at most a fallback.
pub struct TitleFromProjectionPostProcessor;

impl SpecPostProcessor for TitleFromProjectionPostProcessor {
    fn name(&self) -> &'static str {
        "title-from-projection"
    }

    fn post_process(&self, spec: &ObjectSpecification, _ctx: &PostProcessContext<'_>) {
        let Some(projection) = spec.facet::<ProjectionFacet>() else {
            return;
        };
        if spec.member(&projection.member).is_none() {
            // Left for the projection-target validator to report
            return;
        }
        spec.holder().attach(TitleFacet {
            precedence: Precedence::Inferred,
            source: TitleSource::Member(projection.member.clone()),
        });
    }
}

/// Propagates a class-level `ImmutableFacet` to every property as a
/// `DisabledFacet`, unless the property already carries a stronger one.
pub struct ImmutablePropagationPostProcessor;

impl SpecPostProcessor for ImmutablePropagationPostProcessor {
    fn name(&self) -> &'static str {
        "immutable-propagation"
    }

    fn post_process(&self, spec: &ObjectSpecification, _ctx: &PostProcessContext<'_>) {
        if !spec.contains_facet::<ImmutableFacet>() {
            return;
        }
        for member in spec.members_of_kind(MemberKind::Property) {
            member.holder.attach(DisabledFacet {
                precedence: Precedence::Inferred,
                reason: Some("immutable class".to_string()),
            });
        }
    }
}
