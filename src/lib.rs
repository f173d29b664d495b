// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod facets;
pub mod factories;
pub mod io;
pub mod loader;
pub mod postprocess;
pub mod processor;
pub mod registry;
pub mod validation;

// Re-export commonly used types
pub use crate::config::FacetmapConfig;
pub use crate::context::MetamodelContext;
pub use crate::core::{
    Annotation, AnnotationValue, ClassDeclaration, ClassRegistry, FeatureIdentifier, FeatureType,
    MemberDeclaration, MemberKind, ParameterDeclaration,
};
pub use crate::errors::{BuildError, Result};
pub use crate::facets::{AttachmentOutcome, Facet, FacetHolder, Precedence};
pub use crate::factories::{FacetFactory, MethodRemover};
pub use crate::loader::{ObjectMember, ObjectSpecification, SpecId, SpecificationLoader};
pub use crate::postprocess::SpecPostProcessor;
pub use crate::registry::ProgrammingModel;
pub use crate::validation::{
    FailureCollector, MetamodelValidator, Severity, ValidationFailure, ValidationReport,
};
