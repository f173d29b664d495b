//! The built-in facet set.
//!
//! Enough capabilities to exercise every engine path (titles, naming,
//! visibility, editability, validation, defaults, collections, ordering,
//! projection). Reproducing the full facet catalogue of the original
//! framework is a non-goal.

use super::{impl_facet, Precedence};
use crate::core::AnnotationValue;
use regex::Regex;

/// Where a title comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TitleSource {
    /// A fixed string
    Static(String),
    /// The value of a named property
    Member(String),
    /// A conventional `title` supporting method
    SupportingMethod(String),
}

/// Provides the object's title (class-level)
#[derive(Debug)]
pub struct TitleFacet {
    pub precedence: Precedence,
    pub source: TitleSource,
}

impl_facet!(TitleFacet, "title");

/// Friendly name for a feature
#[derive(Debug)]
pub struct NamedFacet {
    pub precedence: Precedence,
    pub name: String,
}

impl_facet!(NamedFacet, "named");

/// Longer description of a feature
#[derive(Debug)]
pub struct DescribedAsFacet {
    pub precedence: Precedence,
    pub description: String,
}

impl_facet!(DescribedAsFacet, "describedAs");

/// Feature is hidden from all viewers
#[derive(Debug)]
pub struct HiddenFacet {
    pub precedence: Precedence,
}

impl_facet!(HiddenFacet, "hidden");

/// Feature is visible but not editable/invokable
#[derive(Debug)]
pub struct DisabledFacet {
    pub precedence: Precedence,
    pub reason: Option<String>,
}

impl_facet!(DisabledFacet, "disabled");

/// Class-level marker: no property is editable. Propagated to properties as
/// `DisabledFacet` by a post-processor.
#[derive(Debug)]
pub struct ImmutableFacet {
    pub precedence: Precedence,
}

impl_facet!(ImmutableFacet, "immutable");

/// Validates property input against a pattern
#[derive(Debug)]
pub struct RegexFacet {
    pub precedence: Precedence,
    pub pattern: Regex,
    pub message: Option<String>,
}

impl_facet!(RegexFacet, "regex");

/// Maximum input length for a property
#[derive(Debug)]
pub struct MaxLengthFacet {
    pub precedence: Precedence,
    pub max: usize,
}

impl_facet!(MaxLengthFacet, "maxLength");

/// Where a default value comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultSource {
    /// A fixed value from an annotation
    Static(AnnotationValue),
    /// A conventional `default<Member>` supporting method
    SupportingMethod(String),
}

/// Provides a default value for a property or parameter
#[derive(Debug)]
pub struct DefaultedFacet {
    pub precedence: Precedence,
    pub source: DefaultSource,
}

impl_facet!(DefaultedFacet, "defaulted");

/// Element type of a collection
#[derive(Debug)]
pub struct TypeOfFacet {
    pub precedence: Precedence,
    pub element_type: String,
}

impl_facet!(TypeOfFacet, "typeOf");

/// Relative ordering of a member in the UI
#[derive(Debug)]
pub struct MemberOrderFacet {
    pub precedence: Precedence,
    pub sequence: i64,
}

impl_facet!(MemberOrderFacet, "memberOrder");

/// Class-level: names the property this object projects through
#[derive(Debug)]
pub struct ProjectionFacet {
    pub precedence: Precedence,
    pub member: String,
}

impl_facet!(ProjectionFacet, "projection");

/// Validation is delegated to a `validate<Member>` supporting method
#[derive(Debug)]
pub struct ValidateFacet {
    pub precedence: Precedence,
    pub method: String,
}

impl_facet!(ValidateFacet, "validate");

/// Visibility is delegated to a `hide<Member>` supporting method
#[derive(Debug)]
pub struct HideViaMethodFacet {
    pub precedence: Precedence,
    pub method: String,
}

impl_facet!(HideViaMethodFacet, "hideViaMethod");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FeatureIdentifier;
    use crate::facets::FacetHolder;

    #[test]
    fn distinct_capabilities_coexist() {
        let holder = FacetHolder::new(FeatureIdentifier::member("Order", "ref"));
        holder.attach(NamedFacet {
            precedence: Precedence::Fallback,
            name: "Ref".into(),
        });
        holder.attach(RegexFacet {
            precedence: Precedence::Explicit,
            pattern: Regex::new("[A-Z]+").unwrap(),
            message: None,
        });
        assert_eq!(holder.facet_count(), 2);
        assert!(holder.contains_facet::<NamedFacet>());
        assert!(holder.contains_facet::<RegexFacet>());
        assert!(!holder.contains_facet::<HiddenFacet>());
    }

    #[test]
    fn capabilities_are_sorted() {
        let holder = FacetHolder::new(FeatureIdentifier::class("Order"));
        holder.attach(TitleFacet {
            precedence: Precedence::Default,
            source: TitleSource::Member("ref".into()),
        });
        holder.attach(ImmutableFacet {
            precedence: Precedence::Explicit,
        });
        let caps: Vec<_> = holder.capabilities().iter().map(|(n, _)| *n).collect();
        assert_eq!(caps, vec!["immutable", "title"]);
    }
}
