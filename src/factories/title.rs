//! Title facet factories.
//!
//! Three sources, in increasing precedence: a conventional `title`
//! supporting method (`Default`), a property marked with the `title`
//! annotation (`Default`, attached onto the class holder), and a class-level
//! `title` annotation with a fixed string (`Explicit`).

use super::{ClassContext, FacetFactory, MemberContext};
use crate::core::FeatureType;
use crate::facets::{Precedence, TitleFacet, TitleSource};

/// Consumes a `title` supporting method and turns it into the class title.
pub struct TitleViaMethodFactory;

impl FacetFactory for TitleViaMethodFactory {
    fn name(&self) -> &'static str {
        "title-via-method"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        if ctx.methods.remove("title") {
            ctx.holder.attach(TitleFacet {
                precedence: Precedence::Default,
                source: TitleSource::SupportingMethod("title".into()),
            });
        }
    }
}

/// A property annotated `title` becomes the class title source.
pub struct TitleFromPropertyFactory;

impl FacetFactory for TitleFromPropertyFactory {
    fn name(&self) -> &'static str {
        "title-from-property"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        if ctx.member.has_annotation("title") {
            ctx.class_holder.attach(TitleFacet {
                precedence: Precedence::Default,
                source: TitleSource::Member(ctx.member.name.clone()),
            });
        }
    }
}

/// Class-level `title` annotation carrying a fixed string.
pub struct TitleAnnotationFactory;

impl FacetFactory for TitleAnnotationFactory {
    fn name(&self) -> &'static str {
        "title-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Object]
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) {
        let Some(annotation) = ctx.declaration.annotation("title") else {
            return;
        };
        match annotation.value().and_then(|v| v.as_str()) {
            Some(text) => {
                ctx.holder.attach(TitleFacet {
                    precedence: Precedence::Explicit,
                    source: TitleSource::Static(text.to_string()),
                });
            }
            None => {
                ctx.failures.error(
                    ctx.holder.identifier().clone(),
                    "title annotation requires a string value",
                );
            }
        }
    }
}
