//! Explicit domain class declarations.
//!
//! In the original naked-objects idea the framework reflects over a class at
//! runtime. Here the shape of a domain class is stated explicitly: either
//! built in code through the fluent constructors, or deserialized from a
//! model file (TOML or JSON). Factories introspect these declarations the
//! way the reflective engine would introspect a raw class.

use crate::errors::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// A single annotation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Named metadata attached to a declaration, the stand-in for a source-level
/// annotation. Values are keyed; a bare marker annotation has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    /// A marker annotation with no values
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Annotation with a single "value" entry
    pub fn single(name: impl Into<String>, value: AnnotationValue) -> Self {
        let mut values = BTreeMap::new();
        values.insert("value".to_string(), value);
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn value(&self) -> Option<&AnnotationValue> {
        self.values.get("value")
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }
}

/// Whether a member is a single-valued property, a multi-valued collection,
/// or an invokable action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Collection,
    Action,
}

/// Declaration of one action parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// Declaration of one member of a class.
///
/// `type_name` is the property type, the collection *element* type, or the
/// action return type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    pub kind: MemberKind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDeclaration>,
}

impl MemberDeclaration {
    pub fn property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Property, type_name)
    }

    pub fn collection(name: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Collection, element_type)
    }

    pub fn action(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Action, return_type)
    }

    fn new(name: impl Into<String>, kind: MemberKind, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
            annotations: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

/// Declaration of one domain class.
///
/// `supporting_methods` lists conventionally named methods (`title`,
/// `defaultCost`, `validateRef`, ...) that factories may claim during
/// introspection. Unclaimed names without a recognized prefix surface as
/// zero-parameter actions, mirroring how the reflective engine treats
/// leftover public methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supporting_methods: Vec<String>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            annotations: Vec::new(),
            members: Vec::new(),
            supporting_methods: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_supporting_method(mut self, name: impl Into<String>) -> Self {
        self.supporting_methods.push(name.into());
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn member(&self, name: &str) -> Option<&MemberDeclaration> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// On-disk shape of a model file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

/// The set of declarations known to one bootstrap, keyed by class name.
///
/// The specification loader resolves every type reference against this
/// registry; names that do not resolve are treated as value types.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    by_name: HashMap<String, ClassDeclaration>,
    order: Vec<String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one declaration. Duplicate names are an error.
    pub fn register(&mut self, declaration: ClassDeclaration) -> Result<()> {
        if self.by_name.contains_key(&declaration.name) {
            return Err(BuildError::DuplicateClass(declaration.name));
        }
        self.order.push(declaration.name.clone());
        self.by_name.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ClassDeclaration> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Class names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Load a registry from a `.toml` or `.json` model file
    pub fn from_model_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let model: ModelFile = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(BuildError::model_file(
                    format!("unsupported model file extension: {other:?}"),
                    path,
                ))
            }
        };
        log::debug!(
            "loaded {} class declaration(s) from {}",
            model.classes.len(),
            path.display()
        );
        Self::from_model(model)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let model: ModelFile = toml::from_str(content)?;
        Self::from_model(model)
    }

    pub fn from_model(model: ModelFile) -> Result<Self> {
        let mut registry = Self::new();
        for class in model.classes {
            registry.register(class)?;
        }
        Ok(registry)
    }
}
