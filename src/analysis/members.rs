//! Per-node link counts within one subgraph

use crate::graph::{Node, Subgraph};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which members to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    All,
    /// Type starts with `Entity.Person`
    Persons,
    /// Type starts with `Entity.Organization`
    Companies,
}

impl MemberKind {
    fn admits(self, node: &Node) -> bool {
        let ty = node.type_str().unwrap_or_default();
        match self {
            MemberKind::All => true,
            MemberKind::Persons => ty.starts_with("Entity.Person"),
            MemberKind::Companies => ty.starts_with("Entity.Organization"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrder {
    /// Case-insensitive id
    Id,
    #[default]
    Degree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A node with its link count inside the subgraph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow<'g> {
    pub node: &'g Node,
    /// Links where the node is source or target; self-loops count twice
    pub degree: usize,
}

/// List the members of a subgraph, filtered by kind and stably sorted.
pub fn rank_members<'g>(
    subgraph: &Subgraph<'g>,
    kind: MemberKind,
    order_by: MemberOrder,
    direction: SortDirection,
) -> Vec<MemberRow<'g>> {
    let mut degree: FxHashMap<&str, usize> = FxHashMap::default();
    for link in &subgraph.links {
        *degree.entry(link.source.as_str()).or_insert(0) += 1;
        *degree.entry(link.target.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<MemberRow<'g>> = subgraph
        .nodes
        .iter()
        .copied()
        .filter(|n| kind.admits(n))
        .map(|node| MemberRow {
            node,
            degree: degree.get(node.id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let compare = |a: &MemberRow<'_>, b: &MemberRow<'_>| -> Ordering {
        match order_by {
            MemberOrder::Id => a
                .node
                .id
                .as_str()
                .to_lowercase()
                .cmp(&b.node.id.as_str().to_lowercase()),
            MemberOrder::Degree => a.degree.cmp(&b.degree),
        }
    };

    match direction {
        SortDirection::Asc => rows.sort_by(compare),
        SortDirection::Desc => rows.sort_by(|a, b| compare(b, a)),
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Link;

    fn fixture() -> (Vec<Node>, Vec<Link>) {
        let nodes = vec![
            Node::new("beta", "Entity.Organization.Company"),
            Node::new("Alpha", "Entity.Organization.FishingCompany"),
            Node::new("gus", "Entity.Person.CEO"),
            Node::new("hub", "Entity.Person"),
        ];
        let links = vec![
            Link::new("beta", "hub", "Event.WorksFor", "2020-01-01"),
            Link::new("Alpha", "hub", "Event.WorksFor", "2020-01-01"),
            Link::new("gus", "hub", "Event.WorksFor", "2020-01-01"),
            Link::new("hub", "hub", "Relationship.FamilyRelationship", "2020-01-01"),
        ];
        (nodes, links)
    }

    fn view<'a>(nodes: &'a [Node], links: &'a [Link]) -> Subgraph<'a> {
        Subgraph {
            nodes: nodes.iter().collect(),
            links: links.iter().collect(),
        }
    }

    #[test]
    fn test_degree_counts_both_ends() {
        let (nodes, links) = fixture();
        let rows = rank_members(&view(&nodes, &links), MemberKind::All, MemberOrder::Degree, SortDirection::Desc);

        assert_eq!(rows[0].node.id.as_str(), "hub");
        assert_eq!(rows[0].degree, 5);
        // equal degrees keep subgraph order
        let rest: Vec<&str> = rows[1..].iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(rest, vec!["beta", "Alpha", "gus"]);
    }

    #[test]
    fn test_kind_filters() {
        let (nodes, links) = fixture();
        let sub = view(&nodes, &links);

        let persons = rank_members(&sub, MemberKind::Persons, MemberOrder::Id, SortDirection::Asc);
        assert_eq!(persons.len(), 2);

        let companies = rank_members(&sub, MemberKind::Companies, MemberOrder::Id, SortDirection::Asc);
        let ids: Vec<&str> = companies.iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(ids, vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_id_order_is_case_insensitive() {
        let (nodes, links) = fixture();
        let rows = rank_members(&view(&nodes, &links), MemberKind::All, MemberOrder::Id, SortDirection::Desc);
        let ids: Vec<&str> = rows.iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(ids, vec!["hub", "gus", "beta", "Alpha"]);
    }
}
