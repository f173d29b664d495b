//! Baseline facets attached to every feature at `Fallback` precedence.

use super::{ClassContext, FacetFactory, MemberContext, ParameterContext};
use crate::core::FeatureType;
use crate::facets::{NamedFacet, Precedence};

/// Derive a natural-language name from a camelCase identifier:
/// `firstName` -> `First Name`.
pub fn natural_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    for (i, ch) in identifier.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}

/// Attaches a `NamedFacet` derived from the feature identifier to every
/// feature, at `Fallback` precedence so any annotation-driven name wins.
pub struct FallbackFacetFactory;

impl FacetFactory for FallbackFacetFactory {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &FeatureType::ALL
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        ctx.holder.attach(NamedFacet {
            precedence: Precedence::Fallback,
            name: natural_name(&ctx.declaration.name),
        });
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        ctx.holder.attach(NamedFacet {
            precedence: Precedence::Fallback,
            name: natural_name(&ctx.member.name),
        });
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        ctx.holder.attach(NamedFacet {
            precedence: Precedence::Fallback,
            name: natural_name(&ctx.parameter.name),
        });
    }
}
