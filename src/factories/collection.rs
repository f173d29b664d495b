//! Collection element-type factory.

use super::{FacetFactory, MemberContext};
use crate::core::FeatureType;
use crate::facets::{Precedence, TypeOfFacet};

/// Attaches a `TypeOfFacet` to every collection: inferred from the declared
/// element type, or explicit when a `typeOf` annotation overrides it.
pub struct TypeOfFactory;

impl FacetFactory for TypeOfFactory {
    fn name(&self) -> &'static str {
        "type-of"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Collection]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        ctx.holder.attach(TypeOfFacet {
            precedence: Precedence::Inferred,
            element_type: ctx.member.type_name.clone(),
        });

        if let Some(explicit) = ctx
            .member
            .annotation("typeOf")
            .and_then(|a| a.value())
            .and_then(|v| v.as_str())
        {
            ctx.holder.attach(TypeOfFacet {
                precedence: Precedence::Explicit,
                element_type: explicit.to_string(),
            });
        }
    }
}
