//! Core feature model: explicit class declarations and feature identity.

pub mod declaration;
pub mod feature;

pub use declaration::{
    Annotation, AnnotationValue, ClassDeclaration, ClassRegistry, MemberDeclaration, MemberKind,
    ModelFile, ParameterDeclaration,
};
pub use feature::{FeatureIdentifier, FeatureType};

/// Derive the conventional supporting-method name for a member, e.g.
/// `("default", "cost") -> "defaultCost"`.
pub fn supporting_method_name(prefix: &str, member: &str) -> String {
    let mut chars = member.chars();
    match chars.next() {
        Some(first) => format!("{prefix}{}{}", first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Supporting-method prefixes recognized by the built-in factories
pub const SUPPORTING_PREFIXES: [&str; 3] = ["default", "validate", "hide"];

/// True if a leftover method name looks like a supporting method (and should
/// therefore not be surfaced as an action)
pub fn has_supporting_prefix(name: &str) -> bool {
    SUPPORTING_PREFIXES.iter().any(|prefix| {
        name.len() > prefix.len()
            && name.starts_with(prefix)
            && name[prefix.len()..].starts_with(char::is_uppercase)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supporting_method_names() {
        assert_eq!(supporting_method_name("default", "cost"), "defaultCost");
        assert_eq!(supporting_method_name("validate", "ref"), "validateRef");
        assert_eq!(supporting_method_name("hide", ""), "hide");
    }

    #[test]
    fn prefix_detection() {
        assert!(has_supporting_prefix("defaultCost"));
        assert!(has_supporting_prefix("validateRef"));
        assert!(!has_supporting_prefix("defaults"));
        assert!(!has_supporting_prefix("title"));
        assert!(!has_supporting_prefix("validate"));
    }
}
