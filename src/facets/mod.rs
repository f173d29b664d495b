//! Facets: typed units of behavior attached to feature holders.
//!
//! A facet's capability is its concrete Rust type; the `getFacet(Class)`
//! contract of the original framework becomes `holder.facet::<TitleFacet>()`.
//! At most one facet per capability survives on a holder; competing
//! candidates are resolved by [`Precedence`], with ties going to the
//! incumbent (i.e. to the earlier-registered factory).

pub mod builtin;

use crate::core::FeatureIdentifier;
use parking_lot::RwLock;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use builtin::*;

/// Ranking used to resolve competing facets for the same capability.
///
/// Ordering is load-bearing: `Fallback < Inferred < Default < High <
/// Explicit`. An attach replaces the incumbent only when strictly higher, so
/// an `Explicit` facet is never displaced by anything weaker and equal
/// precedence keeps whichever arrived first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    Fallback,
    Inferred,
    Default,
    High,
    Explicit,
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Precedence::Fallback => "fallback",
            Precedence::Inferred => "inferred",
            Precedence::Default => "default",
            Precedence::High => "high",
            Precedence::Explicit => "explicit",
        };
        write!(f, "{s}")
    }
}

/// A single unit of attached behavior/metadata. Immutable once constructed.
pub trait Facet: Any + Send + Sync + fmt::Debug {
    /// Precedence of this particular instance
    fn precedence(&self) -> Precedence;

    /// Stable capability name, for diagnostics and reports
    fn capability(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Outcome of attempting to attach a facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentOutcome {
    /// No incumbent; the facet was attached
    Attached,
    /// The facet replaced a lower-precedence incumbent
    Replaced,
    /// An equal-or-higher incumbent won; the facet was discarded
    Rejected,
    /// The holder was frozen; the facet was discarded
    Frozen,
}

/// Diagnostic record of one attach attempt
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentRecord {
    pub capability: &'static str,
    pub precedence: Precedence,
    pub outcome: AttachmentOutcome,
}

/// Anything that can carry facets: a class specification, a member, or an
/// action parameter.
///
/// The winner map holds at most one facet per capability. Every attach
/// attempt, winning or losing, is appended to the attachment log so that
/// validators can see the full history.
#[derive(Debug)]
pub struct FacetHolder {
    identifier: FeatureIdentifier,
    facets: RwLock<HashMap<TypeId, Arc<dyn Facet>>>,
    log: RwLock<Vec<AttachmentRecord>>,
    frozen: AtomicBool,
}

impl FacetHolder {
    pub fn new(identifier: FeatureIdentifier) -> Self {
        Self {
            identifier,
            facets: RwLock::new(HashMap::new()),
            log: RwLock::new(Vec::new()),
            frozen: AtomicBool::new(false),
        }
    }

    pub fn identifier(&self) -> &FeatureIdentifier {
        &self.identifier
    }

    /// Attach a facet, resolving precedence against any incumbent of the same
    /// capability. Never fails; losing candidates are discarded and logged.
    pub fn attach<F: Facet>(&self, facet: F) -> AttachmentOutcome {
        self.attach_arc(Arc::new(facet))
    }

    pub fn attach_arc(&self, facet: Arc<dyn Facet>) -> AttachmentOutcome {
        let capability = facet.capability();
        let precedence = facet.precedence();

        let outcome = if self.frozen.load(Ordering::Acquire) {
            log::error!(
                "attach of {} facet to frozen holder {} rejected",
                capability,
                self.identifier
            );
            AttachmentOutcome::Frozen
        } else {
            let type_id = facet.as_any().type_id();
            let mut facets = self.facets.write();
            match facets.get(&type_id) {
                None => {
                    facets.insert(type_id, facet);
                    AttachmentOutcome::Attached
                }
                Some(incumbent) if precedence > incumbent.precedence() => {
                    log::debug!(
                        "{}: {} facet at {} displaces incumbent at {}",
                        self.identifier,
                        capability,
                        precedence,
                        incumbent.precedence()
                    );
                    facets.insert(type_id, facet);
                    AttachmentOutcome::Replaced
                }
                Some(_) => AttachmentOutcome::Rejected,
            }
        };

        self.log.write().push(AttachmentRecord {
            capability,
            precedence,
            outcome,
        });
        outcome
    }

    /// The winning facet for capability `F`, if any. Absence is the normal
    /// state for optional capabilities, not an error.
    pub fn facet<F: Facet>(&self) -> Option<Arc<F>> {
        let facets = self.facets.read();
        let facet = facets.get(&TypeId::of::<F>())?.clone();
        drop(facets);
        facet.as_any_arc().downcast::<F>().ok()
    }

    pub fn contains_facet<F: Facet>(&self) -> bool {
        self.facets.read().contains_key(&TypeId::of::<F>())
    }

    pub fn facet_count(&self) -> usize {
        self.facets.read().len()
    }

    /// Capability names of all winning facets, sorted for stable output
    pub fn capabilities(&self) -> Vec<(&'static str, Precedence)> {
        let mut names: Vec<_> = self
            .facets
            .read()
            .values()
            .map(|f| (f.capability(), f.precedence()))
            .collect();
        names.sort();
        names
    }

    /// Full attach history, including rejected candidates
    pub fn attachment_log(&self) -> Vec<AttachmentRecord> {
        self.log.read().clone()
    }

    /// Count of attach attempts for one capability, any outcome
    pub fn attachment_attempts(&self, capability: &str) -> usize {
        self.log
            .read()
            .iter()
            .filter(|r| r.capability == capability)
            .count()
    }

    /// Make the holder reject all further attaches. Called when the
    /// metamodel context freezes after bootstrap.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

/// Implements [`Facet`] for a struct carrying a `precedence` field.
macro_rules! impl_facet {
    ($ty:ty, $capability:literal) => {
        impl crate::facets::Facet for $ty {
            fn precedence(&self) -> crate::facets::Precedence {
                self.precedence
            }

            fn capability(&self) -> &'static str {
                $capability
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_arc(
                self: std::sync::Arc<Self>,
            ) -> std::sync::Arc<dyn std::any::Any + Send + Sync> {
                self
            }
        }
    };
}

pub(crate) use impl_facet;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FeatureIdentifier;

    #[derive(Debug)]
    struct MarkerFacet {
        precedence: Precedence,
        tag: &'static str,
    }

    impl_facet!(MarkerFacet, "marker");

    fn holder() -> FacetHolder {
        FacetHolder::new(FeatureIdentifier::member("Order", "ref"))
    }

    #[test]
    fn first_attach_wins_on_equal_precedence() {
        let holder = holder();
        assert_eq!(
            holder.attach(MarkerFacet {
                precedence: Precedence::Default,
                tag: "first",
            }),
            AttachmentOutcome::Attached
        );
        assert_eq!(
            holder.attach(MarkerFacet {
                precedence: Precedence::Default,
                tag: "second",
            }),
            AttachmentOutcome::Rejected
        );
        assert_eq!(holder.facet::<MarkerFacet>().unwrap().tag, "first");
    }

    #[test]
    fn higher_precedence_replaces() {
        let holder = holder();
        holder.attach(MarkerFacet {
            precedence: Precedence::Fallback,
            tag: "fallback",
        });
        assert_eq!(
            holder.attach(MarkerFacet {
                precedence: Precedence::Explicit,
                tag: "explicit",
            }),
            AttachmentOutcome::Replaced
        );
        assert_eq!(holder.facet::<MarkerFacet>().unwrap().tag, "explicit");
    }

    #[test]
    fn explicit_is_never_displaced() {
        let holder = holder();
        holder.attach(MarkerFacet {
            precedence: Precedence::Explicit,
            tag: "explicit",
        });
        for precedence in [
            Precedence::Fallback,
            Precedence::Inferred,
            Precedence::Default,
            Precedence::High,
            Precedence::Explicit,
        ] {
            assert_eq!(
                holder.attach(MarkerFacet {
                    precedence,
                    tag: "late",
                }),
                AttachmentOutcome::Rejected
            );
        }
        assert_eq!(holder.facet::<MarkerFacet>().unwrap().tag, "explicit");
    }

    #[test]
    fn absence_is_not_an_error() {
        let holder = holder();
        assert!(holder.facet::<MarkerFacet>().is_none());
        assert!(!holder.contains_facet::<MarkerFacet>());
    }

    #[test]
    fn losing_attaches_are_logged() {
        let holder = holder();
        holder.attach(MarkerFacet {
            precedence: Precedence::Default,
            tag: "a",
        });
        holder.attach(MarkerFacet {
            precedence: Precedence::Default,
            tag: "b",
        });
        let log = holder.attachment_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].outcome, AttachmentOutcome::Attached);
        assert_eq!(log[1].outcome, AttachmentOutcome::Rejected);
        assert_eq!(holder.facet_count(), 1);
    }

    #[test]
    fn frozen_holder_rejects_attaches() {
        let holder = holder();
        holder.freeze();
        assert_eq!(
            holder.attach(MarkerFacet {
                precedence: Precedence::Explicit,
                tag: "late",
            }),
            AttachmentOutcome::Frozen
        );
        assert!(holder.facet::<MarkerFacet>().is_none());
    }

    #[test]
    fn precedence_ordering() {
        assert!(Precedence::Fallback < Precedence::Inferred);
        assert!(Precedence::Inferred < Precedence::Default);
        assert!(Precedence::Default < Precedence::High);
        assert!(Precedence::High < Precedence::Explicit);
    }
}
