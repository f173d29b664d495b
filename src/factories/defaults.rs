//! Default-value factories.

use super::{FacetFactory, MemberContext, ParameterContext};
use crate::core::{supporting_method_name, FeatureType};
use crate::facets::{DefaultSource, DefaultedFacet, Precedence};

/// Claims `default<Member>` supporting methods as default-value providers.
pub struct DefaultedViaMethodFactory;

impl FacetFactory for DefaultedViaMethodFactory {
    fn name(&self) -> &'static str {
        "defaulted-via-method"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property, FeatureType::Collection]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        let method = supporting_method_name("default", &ctx.member.name);
        if ctx.methods.remove(&method) {
            ctx.holder.attach(DefaultedFacet {
                precedence: Precedence::Default,
                source: DefaultSource::SupportingMethod(method),
            });
        }
    }
}

/// `default` annotation carrying a literal value. Explicit, so it wins over
/// the supporting-method convention.
pub struct DefaultAnnotationFactory;

impl FacetFactory for DefaultAnnotationFactory {
    fn name(&self) -> &'static str {
        "default-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property, FeatureType::Parameter]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if let Some(value) = ctx.member.annotation("default").and_then(|a| a.value()) {
            ctx.holder.attach(DefaultedFacet {
                precedence: Precedence::Explicit,
                source: DefaultSource::Static(value.clone()),
            });
        }
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        if let Some(value) = ctx.parameter.annotation("default").and_then(|a| a.value()) {
            ctx.holder.attach(DefaultedFacet {
                precedence: Precedence::Explicit,
                source: DefaultSource::Static(value.clone()),
            });
        }
    }
}
