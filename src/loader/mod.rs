//! The specification loader: metamodel cache plus two-phase cyclic
//! construction.
//!
//! Specifications live in a dense arena indexed by [`SpecId`]. A placeholder
//! slot is allocated and published *before* a class's members are
//! introspected, so a recursive request for the same class (self-referential
//! trees, mutually referential pairs) resolves to the already-allocated index
//! instead of recursing forever. The slot then moves
//! `Placeholder -> Introspecting -> Complete`, or to `Failed` — a terminal
//! state that is reported once and never silently retried.
//!
//! A build mutex guarantees at most one introspection in flight per context;
//! recursion re-enters through the same `&mut` build state rather than
//! re-locking. Readers only ever observe `Complete` slots.

pub mod spec;

pub use spec::{ObjectActionParameter, ObjectMember, ObjectSpecification, SpecId, SpecKind};

use crate::core::{
    has_supporting_prefix, ClassDeclaration, ClassRegistry, FeatureIdentifier, MemberDeclaration,
};
use crate::errors::{BuildError, Result};
use crate::facets::FacetHolder;
use crate::factories::MethodRemover;
use crate::processor::FacetProcessor;
use crate::registry::ProgrammingModel;
use crate::validation::FailureCollector;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Lifecycle state of one arena slot
#[derive(Debug)]
enum SpecSlot {
    /// Registered in the cache, members not yet visited
    Placeholder { name: String },
    /// The facet processor is running over this class
    Introspecting { name: String },
    /// Ready for post-processing and reads
    Complete(Arc<ObjectSpecification>),
    /// Terminal error state; cached so the failure is not re-run
    Failed { name: String, message: String },
}

#[derive(Default)]
struct BuildState {
    /// Completion order of this context's specs
    order: Vec<SpecId>,
    /// Subclass back-links deferred until the superclass is complete
    pending_links: Vec<(SpecId, SpecId)>,
}

/// Process-lifetime cache of specifications, keyed by class name.
pub struct SpecificationLoader {
    slots: RwLock<Vec<SpecSlot>>,
    by_name: DashMap<String, SpecId>,
    build: Mutex<BuildState>,
}

impl Default for SpecificationLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecificationLoader {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            by_name: DashMap::new(),
            build: Mutex::new(BuildState::default()),
        }
    }

    /// Load (or return the cached) specification for a declared class.
    ///
    /// Idempotent: repeated calls return the same `SpecId` without re-running
    /// any factory. Concurrent first requests serialize on the build mutex.
    pub fn load(
        &self,
        registry: &ClassRegistry,
        model: &ProgrammingModel,
        name: &str,
        failures: &mut FailureCollector,
    ) -> Result<SpecId> {
        let mut state = self.build.lock();
        let result = self.build_spec(&mut state, registry, model, name, None, false, failures);
        self.apply_pending_links(&mut state);
        result
    }

    /// The completed specification at `id`, if it has reached `Complete`.
    /// Callers never observe a partially introspected specification.
    pub fn get(&self, id: SpecId) -> Option<Arc<ObjectSpecification>> {
        match self.slots.read().get(id.index()) {
            Some(SpecSlot::Complete(spec)) => Some(Arc::clone(spec)),
            _ => None,
        }
    }

    /// The id a class name resolves to, if any build has begun for it
    pub fn lookup(&self, name: &str) -> Option<SpecId> {
        self.by_name.get(name).map(|entry| *entry.value())
    }

    pub fn spec_by_name(&self, name: &str) -> Option<Arc<ObjectSpecification>> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    /// Completed specifications, in completion order
    pub fn completed(&self) -> Vec<Arc<ObjectSpecification>> {
        let state = self.build.lock();
        state.order.iter().filter_map(|id| self.get(*id)).collect()
    }

    /// Subtype query: walks the superclass chain of `sub`
    pub fn is_of_type(&self, sub: SpecId, sup: SpecId) -> bool {
        let mut current = Some(sub);
        while let Some(id) = current {
            if id == sup {
                return true;
            }
            current = self.get(id).and_then(|spec| spec.superclass());
        }
        false
    }

    /// Freeze every completed holder; attaches after this are rejected
    pub fn freeze_all(&self) {
        for slot in self.slots.read().iter() {
            if let SpecSlot::Complete(spec) = slot {
                spec.freeze_holders();
            }
        }
    }

    fn alloc_placeholder(&self, name: &str) -> SpecId {
        let mut slots = self.slots.write();
        let id = SpecId(slots.len() as u32);
        slots.push(SpecSlot::Placeholder {
            name: name.to_string(),
        });
        drop(slots);
        self.by_name.insert(name.to_string(), id);
        log::debug!("allocated placeholder {id} for '{name}'");
        id
    }

    fn set_slot(&self, id: SpecId, slot: SpecSlot) {
        self.slots.write()[id.index()] = slot;
    }

    #[allow(clippy::too_many_arguments)]
    fn build_spec(
        &self,
        state: &mut BuildState,
        registry: &ClassRegistry,
        model: &ProgrammingModel,
        name: &str,
        referenced_from: Option<&str>,
        allow_value: bool,
        failures: &mut FailureCollector,
    ) -> Result<SpecId> {
        if let Some(id) = self.lookup(name) {
            let slots = self.slots.read();
            return match &slots[id.index()] {
                SpecSlot::Complete(_) => Ok(id),
                // Recursive re-entry during this build: hand back the
                // placeholder's identity, which is all a type reference needs
                SpecSlot::Placeholder { .. } | SpecSlot::Introspecting { .. } => Ok(id),
                SpecSlot::Failed { name, message } => Err(BuildError::FailedSpecification {
                    class: name.clone(),
                    message: message.clone(),
                }),
            };
        }

        let Some(declaration) = registry.get(name) else {
            if allow_value {
                return Ok(self.build_value_spec(state, name));
            }
            return Err(BuildError::UnknownClass {
                name: name.to_string(),
                referenced_from: referenced_from.map(str::to_string),
            });
        };

        let id = self.alloc_placeholder(name);

        let superclass = match &declaration.superclass {
            Some(sup) => {
                match self.build_spec(state, registry, model, sup, Some(name), false, failures) {
                    Ok(sup_id) => Some(sup_id),
                    Err(err) => {
                        self.fail_slot(id, name, &err);
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        self.set_slot(
            id,
            SpecSlot::Introspecting {
                name: name.to_string(),
            },
        );

        match self.introspect(state, registry, model, declaration, id, superclass, failures) {
            Ok(spec) => {
                self.set_slot(id, SpecSlot::Complete(Arc::new(spec)));
                state.order.push(id);
                if let Some(sup_id) = superclass {
                    state.pending_links.push((sup_id, id));
                }
                log::debug!("specification for '{name}' complete as {id}");
                Ok(id)
            }
            Err(err) => {
                self.fail_slot(id, name, &err);
                Err(err)
            }
        }
    }

    fn build_value_spec(&self, state: &mut BuildState, name: &str) -> SpecId {
        let id = self.alloc_placeholder(name);
        let spec = ObjectSpecification::new(
            id,
            name.to_string(),
            SpecKind::Value,
            FacetHolder::new(FeatureIdentifier::class(name)),
            Vec::new(),
            None,
            Vec::new(),
        );
        self.set_slot(id, SpecSlot::Complete(Arc::new(spec)));
        state.order.push(id);
        log::debug!("synthesized value specification for '{name}' as {id}");
        id
    }

    fn fail_slot(&self, id: SpecId, name: &str, err: &BuildError) {
        // Reported here, once; later lookups surface the cached state
        // without re-running the failed introspection
        log::error!("specification for '{name}' failed to build: {err}");
        self.set_slot(
            id,
            SpecSlot::Failed {
                name: name.to_string(),
                message: err.brief(),
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn introspect(
        &self,
        state: &mut BuildState,
        registry: &ClassRegistry,
        model: &ProgrammingModel,
        declaration: &ClassDeclaration,
        id: SpecId,
        superclass: Option<SpecId>,
        failures: &mut FailureCollector,
    ) -> Result<ObjectSpecification> {
        let class_name = declaration.name.as_str();
        let holder = FacetHolder::new(FeatureIdentifier::class(class_name));
        let mut methods = MethodRemover::new(&declaration.supporting_methods);
        let processor = FacetProcessor::new(model);

        processor.process_class(declaration, &holder, &mut methods, failures);

        let mut members = Vec::with_capacity(declaration.members.len());
        for member_decl in &declaration.members {
            members.push(self.introspect_member(
                state,
                registry,
                model,
                declaration,
                member_decl,
                &holder,
                &mut methods,
                failures,
            )?);
        }

        // Leftover supporting methods: recognized prefixes are likely typos
        // (kept for validation), anything else surfaces as an action
        let mut orphaned = Vec::new();
        let leftovers: Vec<String> = declaration
            .supporting_methods
            .iter()
            .filter(|name| methods.contains(name))
            .cloned()
            .collect();
        for leftover in leftovers {
            if has_supporting_prefix(&leftover) {
                orphaned.push(leftover);
                continue;
            }
            let synthesized = MemberDeclaration::action(&leftover, "void");
            members.push(self.introspect_member(
                state,
                registry,
                model,
                declaration,
                &synthesized,
                &holder,
                &mut methods,
                failures,
            )?);
        }

        Ok(ObjectSpecification::new(
            id,
            class_name.to_string(),
            SpecKind::Entity,
            holder,
            members,
            superclass,
            orphaned,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn introspect_member(
        &self,
        state: &mut BuildState,
        registry: &ClassRegistry,
        model: &ProgrammingModel,
        declaration: &ClassDeclaration,
        member_decl: &MemberDeclaration,
        class_holder: &FacetHolder,
        methods: &mut MethodRemover,
        failures: &mut FailureCollector,
    ) -> Result<ObjectMember> {
        let class_name = declaration.name.as_str();

        // Recursive descent: the member's type may be this very class or a
        // mutual reference; the placeholder mechanism terminates the cycle
        let element = self.build_spec(
            state,
            registry,
            model,
            &member_decl.type_name,
            Some(class_name),
            true,
            failures,
        )?;

        let member_holder =
            FacetHolder::new(FeatureIdentifier::member(class_name, &member_decl.name));
        let processor = FacetProcessor::new(model);
        processor.process_member(
            declaration,
            member_decl,
            class_holder,
            &member_holder,
            methods,
            failures,
        );

        let mut parameters = Vec::with_capacity(member_decl.parameters.len());
        for (index, param_decl) in member_decl.parameters.iter().enumerate() {
            let param_element = self.build_spec(
                state,
                registry,
                model,
                &param_decl.type_name,
                Some(class_name),
                true,
                failures,
            )?;
            let param_holder = FacetHolder::new(FeatureIdentifier::parameter(
                class_name,
                &member_decl.name,
                index,
            ));
            processor.process_parameter(declaration, member_decl, index, &param_holder, failures);
            parameters.push(ObjectActionParameter {
                name: param_decl.name.clone(),
                index,
                element: param_element,
                holder: param_holder,
            });
        }

        Ok(ObjectMember {
            name: member_decl.name.clone(),
            kind: member_decl.kind,
            element,
            holder: member_holder,
            parameters,
        })
    }

    fn apply_pending_links(&self, state: &mut BuildState) {
        for (sup, sub) in state.pending_links.drain(..) {
            if let Some(spec) = self.get(sup) {
                spec.register_subclass(sub);
            }
        }
    }
}
