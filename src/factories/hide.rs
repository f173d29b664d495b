//! Visibility and editability factories.

use super::{ClassContext, FacetFactory, MemberContext};
use crate::core::{supporting_method_name, FeatureType};
use crate::facets::{DisabledFacet, HiddenFacet, HideViaMethodFacet, ImmutableFacet, Precedence};

/// `hidden` marker annotation on any member, plus the `hide<Member>`
/// supporting-method convention.
pub struct HiddenAnnotationFactory;

impl FacetFactory for HiddenAnnotationFactory {
    fn name(&self) -> &'static str {
        "hidden-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[
            FeatureType::Property,
            FeatureType::Collection,
            FeatureType::Action,
        ]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if ctx.member.has_annotation("hidden") {
            ctx.holder.attach(HiddenFacet {
                precedence: Precedence::Explicit,
            });
        }
        let method = supporting_method_name("hide", &ctx.member.name);
        if ctx.methods.remove(&method) {
            ctx.holder.attach(HideViaMethodFacet {
                precedence: Precedence::Default,
                method,
            });
        }
    }
}

/// `disabled` annotation, optionally carrying a reason
pub struct DisabledAnnotationFactory;

impl FacetFactory for DisabledAnnotationFactory {
    fn name(&self) -> &'static str {
        "disabled-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[
            FeatureType::Property,
            FeatureType::Collection,
            FeatureType::Action,
        ]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if let Some(annotation) = ctx.member.annotation("disabled") {
            ctx.holder.attach(DisabledFacet {
                precedence: Precedence::Explicit,
                reason: annotation
                    .get("reason")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            });
        }
    }
}

/// Class-level `immutable` marker. A post-processor later propagates this to
/// every property as a `DisabledFacet`.
pub struct ImmutableClassFactory;

impl FacetFactory for ImmutableClassFactory {
    fn name(&self) -> &'static str {
        "immutable-class"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        if ctx.declaration.has_annotation("immutable") {
            ctx.holder.attach(ImmutableFacet {
                precedence: Precedence::Explicit,
            });
        }
    }
}
