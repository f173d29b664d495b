//! The facet processor: drives the applicable factories, in registration
//! order, over one class and its members.
//!
//! Processing within a class is deliberately sequential: later factories
//! must observe the supporting methods earlier factories consumed.

use crate::core::{ClassDeclaration, FeatureType, MemberDeclaration, MemberKind};
use crate::facets::FacetHolder;
use crate::factories::{ClassContext, MemberContext, MethodRemover, ParameterContext};
use crate::registry::ProgrammingModel;
use crate::validation::FailureCollector;

pub struct FacetProcessor<'a> {
    model: &'a ProgrammingModel,
}

impl<'a> FacetProcessor<'a> {
    pub fn new(model: &'a ProgrammingModel) -> Self {
        Self { model }
    }

    /// Run all object-scope factories over the class declaration
    pub fn process_class(
        &self,
        declaration: &ClassDeclaration,
        holder: &FacetHolder,
        methods: &mut MethodRemover,
        failures: &mut FailureCollector,
    ) {
        for factory in self.model.factories_for(FeatureType::Object) {
            factory.process_class(&mut ClassContext {
                declaration,
                holder,
                methods,
                failures,
            });
        }
    }

    /// Run all factories applicable to the member's kind
    pub fn process_member(
        &self,
        class: &ClassDeclaration,
        member: &MemberDeclaration,
        class_holder: &FacetHolder,
        holder: &FacetHolder,
        methods: &mut MethodRemover,
        failures: &mut FailureCollector,
    ) {
        let feature_type = match member.kind {
            MemberKind::Property => FeatureType::Property,
            MemberKind::Collection => FeatureType::Collection,
            MemberKind::Action => FeatureType::Action,
        };
        for factory in self.model.factories_for(feature_type) {
            factory.process_member(&mut MemberContext {
                class,
                member,
                class_holder,
                holder,
                methods,
                failures,
            });
        }
    }

    /// Run all parameter-scope factories over one action parameter
    pub fn process_parameter(
        &self,
        class: &ClassDeclaration,
        action: &MemberDeclaration,
        index: usize,
        holder: &FacetHolder,
        failures: &mut FailureCollector,
    ) {
        let parameter = &action.parameters[index];
        for factory in self.model.factories_for(FeatureType::Parameter) {
            factory.process_parameter(&mut ParameterContext {
                class,
                action,
                parameter,
                index,
                holder,
                failures,
            });
        }
    }
}
