//! The introspected shape of one domain class.

use crate::core::{FeatureIdentifier, MemberKind};
use crate::facets::FacetHolder;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

/// Dense arena index of a specification.
///
/// Specifications reference each other by `SpecId` rather than by pointer, so
/// cyclic type graphs need no shared mutable aliasing: a recursive lookup
/// resolves to the index of the (eventually complete) specification the
/// moment its placeholder is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpecId(pub(crate) u32);

impl SpecId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spec#{}", self.0)
    }
}

/// Entity specs come from declarations; value specs are synthesized for
/// type names with no declaration (String, BigDecimal, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    Entity,
    Value,
}

/// One parameter of an action member
#[derive(Debug)]
pub struct ObjectActionParameter {
    pub name: String,
    pub index: usize,
    pub element: SpecId,
    pub holder: FacetHolder,
}

impl ObjectActionParameter {
    pub fn facet<F: crate::facets::Facet>(&self) -> Option<std::sync::Arc<F>> {
        self.holder.facet::<F>()
    }
}

/// One property, collection or action of a specification
#[derive(Debug)]
pub struct ObjectMember {
    pub name: String,
    pub kind: MemberKind,
    /// Property type, collection element type, or action return type
    pub element: SpecId,
    pub holder: FacetHolder,
    pub parameters: Vec<ObjectActionParameter>,
}

impl ObjectMember {
    pub fn facet<F: crate::facets::Facet>(&self) -> Option<std::sync::Arc<F>> {
        self.holder.facet::<F>()
    }

    pub fn contains_facet<F: crate::facets::Facet>(&self) -> bool {
        self.holder.contains_facet::<F>()
    }

    pub fn identifier(&self) -> &FeatureIdentifier {
        self.holder.identifier()
    }
}

/// The fully introspected model of one domain class.
///
/// Structurally immutable once complete; the subclass back-link list is the
/// one exception, appended to as later-loaded specs register themselves with
/// their superclass.
#[derive(Debug)]
pub struct ObjectSpecification {
    id: SpecId,
    class_name: String,
    kind: SpecKind,
    holder: FacetHolder,
    members: Vec<ObjectMember>,
    superclass: Option<SpecId>,
    subclasses: RwLock<Vec<SpecId>>,
    /// Supporting methods left unclaimed that match a recognized prefix;
    /// surfaced by a validator as likely typos
    orphaned_methods: Vec<String>,
}

impl ObjectSpecification {
    pub(crate) fn new(
        id: SpecId,
        class_name: String,
        kind: SpecKind,
        holder: FacetHolder,
        members: Vec<ObjectMember>,
        superclass: Option<SpecId>,
        orphaned_methods: Vec<String>,
    ) -> Self {
        Self {
            id,
            class_name,
            kind,
            holder,
            members,
            superclass,
            subclasses: RwLock::new(Vec::new()),
            orphaned_methods,
        }
    }

    pub fn id(&self) -> SpecId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    pub fn is_value(&self) -> bool {
        self.kind == SpecKind::Value
    }

    pub fn identifier(&self) -> &FeatureIdentifier {
        self.holder.identifier()
    }

    pub fn holder(&self) -> &FacetHolder {
        &self.holder
    }

    /// The winning class-level facet for capability `F`
    pub fn facet<F: crate::facets::Facet>(&self) -> Option<std::sync::Arc<F>> {
        self.holder.facet::<F>()
    }

    pub fn contains_facet<F: crate::facets::Facet>(&self) -> bool {
        self.holder.contains_facet::<F>()
    }

    /// All members in declaration order
    pub fn members(&self) -> impl Iterator<Item = &ObjectMember> {
        self.members.iter()
    }

    /// Members of one kind, in declaration order
    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &ObjectMember> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    pub fn member(&self, name: &str) -> Option<&ObjectMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn superclass(&self) -> Option<SpecId> {
        self.superclass
    }

    /// Known subclasses, populated incrementally as they are loaded
    pub fn subclasses(&self) -> Vec<SpecId> {
        self.subclasses.read().clone()
    }

    pub(crate) fn register_subclass(&self, id: SpecId) {
        let mut subclasses = self.subclasses.write();
        if !subclasses.contains(&id) {
            subclasses.push(id);
        }
    }

    pub fn orphaned_methods(&self) -> &[String] {
        &self.orphaned_methods
    }

    /// Reject all further facet attaches, on this holder and every member's
    pub(crate) fn freeze_holders(&self) {
        self.holder.freeze();
        for member in &self.members {
            member.holder.freeze();
            for parameter in &member.parameters {
                parameter.holder.freeze();
            }
        }
    }
}
