//! Straightforward annotation-to-facet factories: naming, description,
//! member ordering and projection.

use super::{ClassContext, FacetFactory, MemberContext, ParameterContext};
use crate::core::{Annotation, FeatureType};
use crate::facets::{
    DescribedAsFacet, MemberOrderFacet, NamedFacet, Precedence, ProjectionFacet,
};

fn named_facet(annotation: &Annotation) -> Option<NamedFacet> {
    annotation.value().and_then(|v| v.as_str()).map(|name| NamedFacet {
        precedence: Precedence::Explicit,
        name: name.to_string(),
    })
}

/// `named` annotation on any feature
pub struct NamedAnnotationFactory;

impl FacetFactory for NamedAnnotationFactory {
    fn name(&self) -> &'static str {
        "named-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &FeatureType::ALL
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        if let Some(facet) = ctx.declaration.annotation("named").and_then(named_facet) {
            ctx.holder.attach(facet);
        }
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if let Some(facet) = ctx.member.annotation("named").and_then(named_facet) {
            ctx.holder.attach(facet);
        }
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        if let Some(facet) = ctx.parameter.annotation("named").and_then(named_facet) {
            ctx.holder.attach(facet);
        }
    }
}

/// `describedAs` annotation on a class or member
pub struct DescribedAsAnnotationFactory;

impl FacetFactory for DescribedAsAnnotationFactory {
    fn name(&self) -> &'static str {
        "described-as-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[
            FeatureType::Object,
            FeatureType::Property,
            FeatureType::Collection,
            FeatureType::Action,
        ]
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        if let Some(text) = ctx
            .declaration
            .annotation("describedAs")
            .and_then(|a| a.value())
            .and_then(|v| v.as_str())
        {
            ctx.holder.attach(DescribedAsFacet {
                precedence: Precedence::Explicit,
                description: text.to_string(),
            });
        }
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if let Some(text) = ctx
            .member
            .annotation("describedAs")
            .and_then(|a| a.value())
            .and_then(|v| v.as_str())
        {
            ctx.holder.attach(DescribedAsFacet {
                precedence: Precedence::Explicit,
                description: text.to_string(),
            });
        }
    }
}

/// `order` annotation giving a member its UI sequence
pub struct MemberOrderAnnotationFactory;

impl FacetFactory for MemberOrderAnnotationFactory {
    fn name(&self) -> &'static str {
        "member-order-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[
            FeatureType::Property,
            FeatureType::Collection,
            FeatureType::Action,
        ]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        let Some(annotation) = ctx.member.annotation("order") else {
            return;
        };
        match annotation.value().and_then(|v| v.as_int()) {
            Some(sequence) => {
                ctx.holder.attach(MemberOrderFacet {
                    precedence: Precedence::Explicit,
                    sequence,
                });
            }
            None => ctx.failures.error(
                ctx.holder.identifier().clone(),
                "order annotation requires an integer value",
            ),
        }
    }
}

/// Class-level `projection` annotation naming the projected property
pub struct ProjectionAnnotationFactory;

impl FacetFactory for ProjectionAnnotationFactory {
    fn name(&self) -> &'static str {
        "projection-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        let Some(annotation) = ctx.declaration.annotation("projection") else {
            return;
        };
        match annotation.value().and_then(|v| v.as_str()) {
            Some(member) => {
                ctx.holder.attach(ProjectionFacet {
                    precedence: Precedence::Explicit,
                    member: member.to_string(),
                });
            }
            None => ctx.failures.error(
                ctx.holder.identifier().clone(),
                "projection annotation requires a member name",
            ),
        }
    }
}
