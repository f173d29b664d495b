//! Feature kinds and identifiers.
//!
//! Every node that can carry facets is a *feature*: the class itself, one of
//! its properties, collections or actions, or a single action parameter.

use serde::Serialize;
use std::fmt;

/// The kind of feature a facet factory can apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Object,
    Property,
    Collection,
    Action,
    Parameter,
}

impl FeatureType {
    /// All feature types, in dispatch order
    pub const ALL: [FeatureType; 5] = [
        FeatureType::Object,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::Parameter,
    ];

    /// Members are properties, collections and actions (not the object or
    /// its parameters)
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            FeatureType::Property | FeatureType::Collection | FeatureType::Action
        )
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureType::Object => "object",
            FeatureType::Property => "property",
            FeatureType::Collection => "collection",
            FeatureType::Action => "action",
            FeatureType::Parameter => "parameter",
        };
        write!(f, "{s}")
    }
}

/// Fully qualified identifier of one feature.
///
/// Renders as `Order`, `Order#ref` or `Order#place(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureIdentifier {
    class: String,
    member: Option<String>,
    parameter: Option<usize>,
}

impl FeatureIdentifier {
    /// Identifier for a class-level feature
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            member: None,
            parameter: None,
        }
    }

    /// Identifier for a member of a class
    pub fn member(class: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            member: Some(member.into()),
            parameter: None,
        }
    }

    /// Identifier for one parameter of an action
    pub fn parameter(class: impl Into<String>, action: impl Into<String>, index: usize) -> Self {
        Self {
            class: class.into(),
            member: Some(action.into()),
            parameter: Some(index),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn member_name(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn parameter_index(&self) -> Option<usize> {
        self.parameter
    }
}

impl fmt::Display for FeatureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.member, self.parameter) {
            (Some(m), Some(p)) => write!(f, "{}#{}({})", self.class, m, p),
            (Some(m), None) => write!(f, "{}#{}", self.class, m),
            _ => write!(f, "{}", self.class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rendering() {
        assert_eq!(FeatureIdentifier::class("Order").to_string(), "Order");
        assert_eq!(
            FeatureIdentifier::member("Order", "ref").to_string(),
            "Order#ref"
        );
        assert_eq!(
            FeatureIdentifier::parameter("Order", "place", 1).to_string(),
            "Order#place(1)"
        );
    }

    #[test]
    fn member_feature_types() {
        assert!(FeatureType::Property.is_member());
        assert!(FeatureType::Collection.is_member());
        assert!(FeatureType::Action.is_member());
        assert!(!FeatureType::Object.is_member());
        assert!(!FeatureType::Parameter.is_member());
    }
}
