//! Entity node record
//!
//! Nodes are organizations and people. Every field except `id` is optional in
//! the source data; accessors apply the documented defaults.

use super::attribute::{lenient_number, lenient_string, NodeAttribute, UNKNOWN_ATTRIBUTE, UNKNOWN_COUNTRY};
use super::types::{EntityType, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node in the entity graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Dotted taxonomy, e.g. `Entity.Organization.Company`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    /// Display name, falls back to the id
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub country: Option<String>,

    /// Parsed revenue; absent or non-numeric input is `None`
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub founding_date: Option<String>,

    #[serde(
        rename = "ProductServices",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub product_services: Option<String>,

    #[serde(
        rename = "PointOfContact",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub point_of_contact: Option<String>,

    #[serde(
        rename = "HeadOfOrg",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub head_of_org: Option<String>,

    #[serde(
        rename = "TradeDescription",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub trade_description: Option<String>,

    /// Any other keys, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Node {
    /// Create a new node with a type and no attributes
    pub fn new(id: impl Into<NodeId>, entity_type: impl Into<EntityType>) -> Self {
        Node {
            id: id.into(),
            entity_type: Some(entity_type.into()),
            name: None,
            country: None,
            revenue: None,
            founding_date: None,
            product_services: None,
            point_of_contact: None,
            head_of_org: None,
            trade_description: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue).filter(|v| v.is_finite());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Revenue with missing values treated as zero
    pub fn revenue(&self) -> f64 {
        self.revenue.unwrap_or(0.0)
    }

    /// Country, `"Unknown"` when missing
    pub fn country(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN_COUNTRY)
    }

    /// Display name, the id when missing
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Type string, `None` when the record carries no type
    pub fn type_str(&self) -> Option<&str> {
        self.entity_type.as_ref().map(EntityType::as_str)
    }

    pub fn is_organization(&self) -> bool {
        self.entity_type.as_ref().is_some_and(EntityType::is_organization)
    }

    pub fn is_person(&self) -> bool {
        self.entity_type.as_ref().is_some_and(EntityType::is_person)
    }

    /// Raw attribute value, if present
    pub fn attribute_value(&self, attribute: NodeAttribute) -> Option<&str> {
        match attribute {
            NodeAttribute::Country => self.country.as_deref(),
            NodeAttribute::ProductServices => self.product_services.as_deref(),
            NodeAttribute::PointOfContact => self.point_of_contact.as_deref(),
            NodeAttribute::HeadOfOrg => self.head_of_org.as_deref(),
            NodeAttribute::TradeDescription => self.trade_description.as_deref(),
            NodeAttribute::FoundingDate => self.founding_date.as_deref(),
            NodeAttribute::Type => self.type_str(),
        }
    }

    /// Attribute value with `"UNKNOWN"` for missing entries
    pub fn attribute(&self, attribute: NodeAttribute) -> &str {
        self.attribute_value(attribute).unwrap_or(UNKNOWN_ATTRIBUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let node: Node = serde_json::from_str(r#"{"id": "Hauser Ltd"}"#).unwrap();
        assert_eq!(node.id, NodeId::new("Hauser Ltd"));
        assert_eq!(node.revenue(), 0.0);
        assert_eq!(node.country(), "Unknown");
        assert_eq!(node.display_name(), "Hauser Ltd");
        assert_eq!(node.attribute(NodeAttribute::HeadOfOrg), "UNKNOWN");
        assert_eq!(node.attribute(NodeAttribute::Type), "UNKNOWN");
        assert!(!node.is_organization());
    }

    #[test]
    fn test_source_field_names() {
        let node: Node = serde_json::from_str(
            r#"{
                "id": "Oceanfront Oasis Inc",
                "type": "Entity.Organization.FishingCompany",
                "country": "Oceanus",
                "revenue": "125000.5",
                "founding_date": "1998-03-11T00:00:00",
                "ProductServices": "Fish",
                "PointOfContact": null,
                "HeadOfOrg": "Jane Doe",
                "TradeDescription": 7,
                "dataset": "MC3"
            }"#,
        )
        .unwrap();

        assert!(node.is_organization());
        assert_eq!(node.revenue(), 125000.5);
        assert_eq!(node.country(), "Oceanus");
        assert_eq!(node.attribute(NodeAttribute::ProductServices), "Fish");
        assert_eq!(node.attribute(NodeAttribute::PointOfContact), "UNKNOWN");
        assert_eq!(node.attribute(NodeAttribute::TradeDescription), "7");
        assert_eq!(node.attribute(NodeAttribute::FoundingDate), "1998-03-11T00:00:00");
        assert_eq!(node.extra.get("dataset"), Some(&Value::from("MC3")));
    }

    #[test]
    fn test_non_numeric_revenue_is_zero() {
        let node: Node = serde_json::from_str(r#"{"id": "x", "revenue": null}"#).unwrap();
        assert_eq!(node.revenue, None);
        assert_eq!(node.revenue(), 0.0);

        let node = Node::new("y", "Entity.Person").with_revenue(f64::NAN);
        assert_eq!(node.revenue(), 0.0);
    }

    #[test]
    fn test_builder() {
        let node = Node::new("A", "Entity.Organization.Company")
            .with_revenue(100.0)
            .with_country("Oceanus")
            .with_name("Alpha");
        assert_eq!(node.revenue(), 100.0);
        assert_eq!(node.display_name(), "Alpha");
        assert_eq!(node.type_str(), Some("Entity.Organization.Company"));
    }
}
