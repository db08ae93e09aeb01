//! Core type definitions for the entity graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Coarse grouping of a dotted taxonomy string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum TypeCategory {
    Person,
    Organization,
    Event,
    Relationship,
    Other,
}

impl TypeCategory {
    /// Classify a taxonomy string such as `Entity.Organization.Company`
    pub fn of(type_name: &str) -> Self {
        if type_name.starts_with("Entity.Person") {
            TypeCategory::Person
        } else if type_name.starts_with("Entity.Organization") {
            TypeCategory::Organization
        } else if type_name.starts_with("Event") {
            TypeCategory::Event
        } else if type_name.starts_with("Relationship") {
            TypeCategory::Relationship
        } else {
            TypeCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Person => "Person",
            TypeCategory::Organization => "Organization",
            TypeCategory::Event => "Event",
            TypeCategory::Relationship => "Relationship",
            TypeCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity type (e.g., "Entity.Organization.Company", "Entity.Person.CEO")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(entity_type: impl Into<String>) -> Self {
        EntityType(entity_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Organizations are matched anywhere in the taxonomy path
    pub fn is_organization(&self) -> bool {
        self.0.contains("Entity.Organization")
    }

    pub fn is_person(&self) -> bool {
        self.0.starts_with("Entity.Person")
    }

    pub fn category(&self) -> TypeCategory {
        TypeCategory::of(&self.0)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        EntityType(s)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType(s.to_string())
    }
}

/// Link type (e.g., "Event.Owns.Shareholdership", "Event.WorksFor")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LinkType(String);

impl LinkType {
    pub fn new(link_type: impl Into<String>) -> Self {
        LinkType(link_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> TypeCategory {
        TypeCategory::of(&self.0)
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LinkType {
    fn from(s: String) -> Self {
        LinkType(s)
    }
}

impl From<&str> for LinkType {
    fn from(s: &str) -> Self {
        LinkType(s.to_string())
    }
}
