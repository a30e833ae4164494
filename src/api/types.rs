//! Wire types for the backend's JSON responses.
//!
//! Field names mirror the backend schemas exactly; everything is a plain
//! value record, created fresh per fetch and never mutated afterwards.

use std::cmp::Ordering;

use serde::Deserialize;

/// One ranked community. Scores are nullable on the wire; a missing score
/// renders as "N/A" and sorts below every present score.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Subreddit {
	pub subreddit_name: String,
	pub engagement_score: Option<f64>,
	pub freshness_score: Option<f64>,
	pub frequency_score: Option<f64>,
	pub relevance_score: Option<f64>,
}

/// A named node in the relationship graph with directional groups:
/// `left_relationships` are incoming (entity is the object),
/// `right_relationships` are outgoing (entity is the subject).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Entity {
	pub entity_name: String,
	pub left_relationships: Vec<GroupedRelationship>,
	pub right_relationships: Vec<GroupedRelationship>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GroupedRelationship {
	pub relationship_type: String,
	pub details: Vec<RelationshipDetail>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RelationshipDetail {
	pub related_entity: String,
	pub evidences: Vec<String>,
	pub post_urls: Vec<String>,
}

/// Node of the force-graph payload. `val` is a size hint, `group` picks
/// the palette color (absent means group 0).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	#[serde(default = "default_val")]
	pub val: f64,
	#[serde(default)]
	pub group: Option<u32>,
}

fn default_val() -> f64 {
	1.0
}

/// A link endpoint as sent by the backend: either a bare node id or an
/// already-embedded node object. Collapsed to the id once at ingestion;
/// nothing downstream branches on the variant.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
	Id(String),
	Node { id: String },
}

impl NodeRef {
	pub fn id(&self) -> &str {
		match self {
			NodeRef::Id(id) => id,
			NodeRef::Node { id } => id,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub source: NodeRef,
	pub target: NodeRef,
	pub relationships: Vec<String>,
	pub evidences: Vec<String>,
	pub post_urls: Vec<String>,
	#[serde(default)]
	pub curvature: f64,
}

impl GraphLink {
	pub fn source_id(&self) -> &str {
		self.source.id()
	}

	pub fn target_id(&self) -> &str {
		self.target.id()
	}
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Descending by relevance, nulls last. Ties keep arrival order.
pub fn sort_by_relevance(subreddits: &mut [Subreddit]) {
	subreddits.sort_by(|a, b| compare_relevance(b, a));
}

fn compare_relevance(a: &Subreddit, b: &Subreddit) -> Ordering {
	match (a.relevance_score, b.relevance_score) {
		(Some(x), Some(y)) => x.total_cmp(&y),
		(Some(_), None) => Ordering::Greater,
		(None, Some(_)) => Ordering::Less,
		(None, None) => Ordering::Equal,
	}
}

impl Entity {
	/// Total number of relationship details across both directions.
	pub fn relationship_total(&self) -> usize {
		let count = |groups: &[GroupedRelationship]| {
			groups.iter().map(|g| g.details.len()).sum::<usize>()
		};
		count(&self.left_relationships) + count(&self.right_relationships)
	}
}

/// Descending by total relationship count.
pub fn sort_by_relationship_total(entities: &mut [Entity]) {
	entities.sort_by(|a, b| b.relationship_total().cmp(&a.relationship_total()));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn subreddit(name: &str, relevance: Option<f64>) -> Subreddit {
		Subreddit {
			subreddit_name: name.to_string(),
			engagement_score: None,
			freshness_score: None,
			frequency_score: None,
			relevance_score: relevance,
		}
	}

	fn detail(related: &str) -> RelationshipDetail {
		RelationshipDetail {
			related_entity: related.to_string(),
			evidences: Vec::new(),
			post_urls: Vec::new(),
		}
	}

	fn entity(name: &str, incoming: usize, outgoing: usize) -> Entity {
		let group = |n: usize| GroupedRelationship {
			relationship_type: "mentions".to_string(),
			details: (0..n).map(|i| detail(&format!("e{i}"))).collect(),
		};
		Entity {
			entity_name: name.to_string(),
			left_relationships: vec![group(incoming)],
			right_relationships: vec![group(outgoing)],
		}
	}

	#[test]
	fn relevance_sort_puts_nulls_last() {
		let mut subs = vec![
			subreddit("mid", Some(0.9)),
			subreddit("unscored", None),
			subreddit("low", Some(0.3)),
		];
		sort_by_relevance(&mut subs);
		let names: Vec<&str> = subs.iter().map(|s| s.subreddit_name.as_str()).collect();
		assert_eq!(names, vec!["mid", "low", "unscored"]);
	}

	#[test]
	fn entity_sort_uses_total_detail_count() {
		let mut entities = vec![entity("small", 1, 1), entity("big", 3, 2)];
		sort_by_relationship_total(&mut entities);
		assert_eq!(entities[0].entity_name, "big");
		assert_eq!(entities[0].relationship_total(), 5);
		assert_eq!(entities[1].relationship_total(), 2);
	}

	#[test]
	fn node_ref_decodes_bare_id_and_embedded_object() {
		let bare: GraphLink = serde_json::from_str(
			r#"{"source":"a","target":"b","relationships":["uses"],"evidences":[],"post_urls":[]}"#,
		)
		.unwrap();
		assert_eq!(bare.source_id(), "a");
		assert_eq!(bare.target_id(), "b");
		assert_eq!(bare.curvature, 0.0);

		let embedded: GraphLink = serde_json::from_str(
			r#"{"source":{"id":"a","name":"A","val":3},"target":{"id":"b"},
			    "relationships":[],"evidences":[],"post_urls":[],"curvature":0.2}"#,
		)
		.unwrap();
		assert_eq!(embedded.source_id(), "a");
		assert_eq!(embedded.target_id(), "b");
		assert_eq!(embedded.curvature, 0.2);
	}

	#[test]
	fn graph_node_defaults() {
		let node: GraphNode = serde_json::from_str(r#"{"id":"x","name":"X"}"#).unwrap();
		assert_eq!(node.val, 1.0);
		assert_eq!(node.group, None);
	}

	#[test]
	fn subreddit_decodes_null_scores() {
		let sub: Subreddit = serde_json::from_str(
			r#"{"subreddit_name":"r/electricvehicles","engagement_score":0.7,
			    "freshness_score":null,"frequency_score":null,"relevance_score":0.95}"#,
		)
		.unwrap();
		assert_eq!(sub.freshness_score, None);
		assert_eq!(sub.relevance_score, Some(0.95));
	}
}
