//! Input-validation factories: regex patterns, maximum lengths, and the
//! `validate<Member>` supporting-method convention.

use super::{FacetFactory, MemberContext, ParameterContext};
use crate::core::{supporting_method_name, FeatureType};
use crate::facets::{MaxLengthFacet, Precedence, RegexFacet, ValidateFacet};
use regex::Regex;

/// `regex` annotation on a property or parameter.
///
/// An unparseable pattern is a model inconsistency, not a build failure: it
/// is registered with the failure collector and no facet is attached.
pub struct RegexAnnotationFactory;

impl RegexAnnotationFactory {
    fn compile(
        pattern: &str,
        message: Option<&str>,
        holder: &crate::facets::FacetHolder,
        failures: &mut crate::validation::FailureCollector,
    ) {
        match Regex::new(pattern) {
            Ok(regex) => {
                holder.attach(RegexFacet {
                    precedence: Precedence::Explicit,
                    pattern: regex,
                    message: message.map(str::to_string),
                });
            }
            Err(err) => {
                failures.error(
                    holder.identifier().clone(),
                    format!("invalid regex pattern '{pattern}': {err}"),
                );
            }
        }
    }
}

impl FacetFactory for RegexAnnotationFactory {
    fn name(&self) -> &'static str {
        "regex-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property, FeatureType::Parameter]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        let Some(annotation) = ctx.member.annotation("regex") else {
            return;
        };
        if let Some(pattern) = annotation.value().and_then(|v| v.as_str()) {
            let message = annotation.get("message").and_then(|v| v.as_str());
            Self::compile(pattern, message, ctx.holder, ctx.failures);
        }
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        let Some(annotation) = ctx.parameter.annotation("regex") else {
            return;
        };
        if let Some(pattern) = annotation.value().and_then(|v| v.as_str()) {
            let message = annotation.get("message").and_then(|v| v.as_str());
            Self::compile(pattern, message, ctx.holder, ctx.failures);
        }
    }
}

/// `maxLength` annotation on a property or parameter
pub struct MaxLengthAnnotationFactory;

impl FacetFactory for MaxLengthAnnotationFactory {
    fn name(&self) -> &'static str {
        "max-length-annotation"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property, FeatureType::Parameter]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        let Some(annotation) = ctx.member.annotation("maxLength") else {
            return;
        };
        match annotation.value().and_then(|v| v.as_int()) {
            Some(max) if max > 0 => {
                ctx.holder.attach(MaxLengthFacet {
                    precedence: Precedence::Explicit,
                    max: max as usize,
                });
            }
            _ => ctx.failures.error(
                ctx.holder.identifier().clone(),
                "maxLength annotation requires a positive integer value",
            ),
        }
    }
}

/// Claims `validate<Member>` supporting methods
pub struct ValidateViaMethodFactory;

impl FacetFactory for ValidateViaMethodFactory {
    fn name(&self) -> &'static str {
        "validate-via-method"
    }

    fn feature_types(&self) -> &[FeatureType] {
        &[FeatureType::Property, FeatureType::Action]
    }

    fn process_member(&self, ctx: &mut MemberContext<'_>) {
        let method = supporting_method_name("validate", &ctx.member.name);
        if ctx.methods.remove(&method) {
            ctx.holder.attach(ValidateFacet {
                precedence: Precedence::Default,
                method,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Annotation, AnnotationValue, ClassDeclaration, FeatureIdentifier, MemberDeclaration,
    };
    use crate::facets::FacetHolder;
    use crate::factories::MethodRemover;
    use crate::validation::FailureCollector;

    fn member_ctx_fixture(
        member: MemberDeclaration,
    ) -> (ClassDeclaration, FacetHolder, FacetHolder) {
        let decl = ClassDeclaration::new("Order").with_member(member);
        let class_holder = FacetHolder::new(FeatureIdentifier::class("Order"));
        let holder = FacetHolder::new(FeatureIdentifier::member(
            "Order",
            &decl.members[0].name,
        ));
        (decl, class_holder, holder)
    }

    #[test]
    fn valid_regex_attaches_facet() {
        let (decl, class_holder, holder) = member_ctx_fixture(
            MemberDeclaration::property("ref", "String").with_annotation(Annotation::single(
                "regex",
                AnnotationValue::Str(r"[A-Z]+-\d+".into()),
            )),
        );
        let mut methods = MethodRemover::new(&[]);
        let mut failures = FailureCollector::new();

        RegexAnnotationFactory.process_member(&mut MemberContext {
            class: &decl,
            member: &decl.members[0],
            class_holder: &class_holder,
            holder: &holder,
            methods: &mut methods,
            failures: &mut failures,
        });

        let facet = holder.facet::<RegexFacet>().unwrap();
        assert!(facet.pattern.is_match("ORD-42"));
        assert!(failures.is_empty());
    }

    #[test]
    fn invalid_regex_is_a_failure_not_a_panic() {
        let (decl, class_holder, holder) = member_ctx_fixture(
            MemberDeclaration::property("ref", "String").with_annotation(Annotation::single(
                "regex",
                AnnotationValue::Str("[unclosed".into()),
            )),
        );
        let mut methods = MethodRemover::new(&[]);
        let mut failures = FailureCollector::new();

        RegexAnnotationFactory.process_member(&mut MemberContext {
            class: &decl,
            member: &decl.members[0],
            class_holder: &class_holder,
            holder: &holder,
            methods: &mut methods,
            failures: &mut failures,
        });

        assert!(holder.facet::<RegexFacet>().is_none());
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn validate_method_is_claimed() {
        let (mut decl, class_holder, holder) =
            member_ctx_fixture(MemberDeclaration::property("ref", "String"));
        decl.supporting_methods.push("validateRef".into());
        let mut methods = MethodRemover::new(&decl.supporting_methods);
        let mut failures = FailureCollector::new();

        ValidateViaMethodFactory.process_member(&mut MemberContext {
            class: &decl,
            member: &decl.members[0],
            class_holder: &class_holder,
            holder: &holder,
            methods: &mut methods,
            failures: &mut failures,
        });

        assert!(!methods.contains("validateRef"));
        assert_eq!(holder.facet::<ValidateFacet>().unwrap().method, "validateRef");
    }
}
