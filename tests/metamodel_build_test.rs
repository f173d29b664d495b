//! End-to-end metamodel construction: caching, cyclic type graphs and
//! fallback behavior.

use facetmap::core::{ClassDeclaration, ClassRegistry, MemberDeclaration};
use facetmap::facets::{NamedFacet, TitleFacet};
use facetmap::MetamodelContext;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn bootstrap(registry: ClassRegistry) -> MetamodelContext {
    let mut context = MetamodelContext::new(registry);
    context.bootstrap().expect("bootstrap should succeed");
    context
}

#[test]
fn repeated_lookups_return_the_same_instance() {
    let mut registry = ClassRegistry::new();
    registry
        .register(
            ClassDeclaration::new("Order")
                .with_member(MemberDeclaration::property("ref", "String")),
        )
        .unwrap();

    let context = bootstrap(registry);
    let first = context.spec_for("Order").unwrap();
    let second = context.spec_for("Order").unwrap();
    let third = context.spec_for("Order").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &third));

    // Factories ran exactly once: a single fallback "named" attach attempt
    assert_eq!(first.holder().attachment_attempts("named"), 1);
}

#[test]
fn self_referential_node_builds_to_completion() {
    let mut registry = ClassRegistry::new();
    registry
        .register(
            ClassDeclaration::new("Node")
                .with_member(MemberDeclaration::property("parent", "Node"))
                .with_member(MemberDeclaration::collection("children", "Node")),
        )
        .unwrap();

    let context = bootstrap(registry);
    let node = context.spec_for("Node").unwrap();

    // Both member types resolve to this same specification, not to a
    // distinct placeholder copy
    assert_eq!(node.member("parent").unwrap().element, node.id());
    assert_eq!(node.member("children").unwrap().element, node.id());
    assert!(Arc::ptr_eq(
        &context.spec(node.member("parent").unwrap().element).unwrap(),
        &node
    ));
}

#[test]
fn mutually_referential_classes_build_without_duplicates() {
    let mut registry = ClassRegistry::new();
    registry
        .register(
            ClassDeclaration::new("Parent")
                .with_member(MemberDeclaration::property("child", "Child")),
        )
        .unwrap();
    registry
        .register(
            ClassDeclaration::new("Child")
                .with_member(MemberDeclaration::property("parent", "Parent")),
        )
        .unwrap();

    let context = bootstrap(registry);
    let parent = context.spec_for("Parent").unwrap();
    let child = context.spec_for("Child").unwrap();

    assert_eq!(parent.member("child").unwrap().element, child.id());
    assert_eq!(child.member("parent").unwrap().element, parent.id());

    // Exactly one entity specification per class in the whole batch
    let entity_names: Vec<_> = context
        .specs()
        .iter()
        .filter(|s| !s.is_value())
        .map(|s| s.class_name().to_string())
        .collect();
    assert_eq!(entity_names, vec!["Child", "Parent"]);
}

#[test]
fn absent_title_is_not_an_error() {
    let mut registry = ClassRegistry::new();
    registry
        .register(
            ClassDeclaration::new("Plain")
                .with_member(MemberDeclaration::property("value", "String")),
        )
        .unwrap();

    let context = bootstrap(registry);
    let plain = context.spec_for("Plain").unwrap();

    // No title-producing source anywhere: absence, not failure
    assert!(plain.facet::<TitleFacet>().is_none());
    // The specification otherwise completed normally, with fallback naming
    assert_eq!(plain.facet::<NamedFacet>().unwrap().name, "Plain");
    assert_eq!(plain.member_count(), 1);
}

#[test]
fn subtype_queries_span_the_hierarchy() {
    let mut registry = ClassRegistry::new();
    registry.register(ClassDeclaration::new("Party")).unwrap();
    registry
        .register(ClassDeclaration::new("Person").with_superclass("Party"))
        .unwrap();
    registry
        .register(ClassDeclaration::new("Company").with_superclass("Party"))
        .unwrap();

    let context = bootstrap(registry);
    let party = context.spec_for("Party").unwrap();
    let person = context.spec_for("Person").unwrap();
    let company = context.spec_for("Company").unwrap();

    assert!(context.is_of_type(&person, &party));
    assert!(context.is_of_type(&company, &party));
    assert!(!context.is_of_type(&person, &company));
    assert_eq!(party.subclasses().len(), 2);
}
