use std::collections::{HashMap, HashSet, VecDeque};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::api::types::GraphData;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const MARGIN: f64 = 80.0;
const LAYER_GAP: f64 = 170.0;
const ROW_GAP: f64 = 52.0;

/// World-space tolerance for edge hit-testing.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;

/// Palette color for a node group; absent group falls back to group 0.
pub fn color_for_group(group: Option<u32>) -> &'static str {
	COLORS[group.unwrap_or(0) as usize % COLORS.len()]
}

/// Node radius from the backend's size hint (relationship count).
pub fn node_radius(val: f64) -> f64 {
	(4.0 + val.max(0.0).sqrt() * 1.5).min(14.0)
}

/// Left-to-right layer per node id: breadth-first from the nodes with no
/// incoming links, so the settled graph reads source -> target. Nodes only
/// reachable through a cycle start a fresh column at 0.
pub fn assign_layers(ids: &[String], links: &[(String, String)]) -> HashMap<String, usize> {
	let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
	let mut incoming: HashMap<&str, usize> = ids.iter().map(|id| (id.as_str(), 0)).collect();
	for (source, target) in links {
		outgoing.entry(source).or_default().push(target);
		if let Some(count) = incoming.get_mut(target.as_str()) {
			*count += 1;
		}
	}

	let mut layers: HashMap<String, usize> = HashMap::new();
	let mut queue: VecDeque<(&str, usize)> = ids
		.iter()
		.filter(|id| incoming.get(id.as_str()) == Some(&0))
		.map(|id| (id.as_str(), 0))
		.collect();

	// Second pass seeds cycle-only components once the acyclic part is done.
	let mut seeds = ids.iter().map(String::as_str);
	loop {
		while let Some((id, layer)) = queue.pop_front() {
			if layers.contains_key(id) {
				continue;
			}
			layers.insert(id.to_string(), layer);
			for &next in outgoing.get(id).into_iter().flatten() {
				if !layers.contains_key(next) {
					queue.push_back((next, layer + 1));
				}
			}
		}
		match seeds.find(|id| !layers.contains_key(*id)) {
			Some(id) => queue.push_back((id, 0)),
			None => break,
		}
	}
	layers
}

/// Distance from a point to a line segment, all in world coordinates.
pub fn point_segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
	let (dx, dy) = (bx - ax, by - ay);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq == 0.0 {
		0.0
	} else {
		(((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (ax + t * dx, ay + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Control point of the quadratic curve used for a link with a curvature
/// hint: the midpoint pushed perpendicular by `curvature * length`.
pub fn curve_control(x1: f64, y1: f64, x2: f64, y2: f64, curvature: f64) -> (f64, f64) {
	let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
	let (dx, dy) = (x2 - x1, y2 - y1);
	(mx - dy * curvature, my + dx * curvature)
}

fn bezier_point(t: f64, p0: (f64, f64), c: (f64, f64), p1: (f64, f64)) -> (f64, f64) {
	let u = 1.0 - t;
	(
		u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
		u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
	)
}

/// What an edge click hands to the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSelection {
	pub source: String,
	pub target: String,
	pub relationships: Vec<String>,
	pub evidences: Vec<String>,
	pub post_urls: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: String,
	pub color: String,
	pub radius: f64,
}

pub struct GraphEdge {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub curvature: f64,
	pub selection: EdgeSelection,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

pub struct RelationshipGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<GraphEdge>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl RelationshipGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		// Link endpoints arrive as ids or embedded objects; collapse once
		// here and never look at the variant again.
		let ids: Vec<String> = data.nodes.iter().map(|n| n.id.clone()).collect();
		let pairs: Vec<(String, String)> = data
			.links
			.iter()
			.map(|l| (l.source_id().to_string(), l.target_id().to_string()))
			.collect();
		let layers = assign_layers(&ids, &pairs);

		let mut id_to_idx = HashMap::new();
		let mut rows_per_layer: HashMap<usize, usize> = HashMap::new();
		for node in &data.nodes {
			let layer = layers.get(&node.id).copied().unwrap_or(0);
			let row = rows_per_layer.entry(layer).or_insert(0);
			let (x, y) = (
				(MARGIN + layer as f64 * LAYER_GAP) as f32,
				(MARGIN + *row as f64 * ROW_GAP) as f32,
			);
			*row += 1;

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.name.clone(),
					color: color_for_group(node.group).to_string(),
					radius: node_radius(node.val),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		for link in &data.links {
			let (Some(&from), Some(&to)) = (
				id_to_idx.get(link.source_id()),
				id_to_idx.get(link.target_id()),
			) else {
				// Dangling endpoint: backend contract violation, drop the link.
				continue;
			};
			graph.add_edge(from, to, EdgeData::default());
			edges.push(GraphEdge {
				from,
				to,
				curvature: link.curvature,
				selection: EdgeSelection {
					source: link.source_id().to_string(),
					target: link.target_id().to_string(),
					relationships: link.relationships.clone(),
					evidences: link.evidences.clone(),
					post_urls: link.post_urls.clone(),
				},
			});
		}

		Self {
			graph,
			edges,
			transform: ViewTransform { x: 0.0, y: 0.0, k: 1.0 },
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + 4.0 {
				found = Some(node.index());
			}
		});
		found
	}

	/// The edge under a screen position, if any. Curved edges are sampled
	/// as short segments along their quadratic path.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.node_positions();

		let mut best: Option<(usize, f64)> = None;
		for (i, edge) in self.edges.iter().enumerate() {
			let (Some(&p0), Some(&p1)) = (positions.get(&edge.from), positions.get(&edge.to))
			else {
				continue;
			};
			let control = curve_control(p0.0, p0.1, p1.0, p1.1, edge.curvature);

			const SAMPLES: usize = 16;
			let mut prev = p0;
			let mut min_dist = f64::MAX;
			for step in 1..=SAMPLES {
				let t = step as f64 / SAMPLES as f64;
				let point = bezier_point(t, p0, control, p1);
				let d = point_segment_distance(gx, gy, prev.0, prev.1, point.0, point.1);
				min_dist = min_dist.min(d);
				prev = point;
			}

			if min_dist < EDGE_HIT_TOLERANCE && best.is_none_or(|(_, d)| min_dist < d) {
				best = Some((i, min_dist));
			}
		}
		best.map(|(i, _)| i)
	}

	/// Edge-click payload for the detail panel.
	pub fn selection_at(&self, sx: f64, sy: f64) -> Option<EdgeSelection> {
		self.edge_at_position(sx, sy)
			.map(|i| self.edges[i].selection.clone())
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.from == idx {
					self.hover.neighbors.insert(edge.to);
				} else if edge.to == idx {
					self.hover.neighbors.insert(edge.from);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn node_positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::types::{GraphLink, GraphNode, NodeRef};

	fn node(id: &str, val: f64, group: Option<u32>) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			name: id.to_uppercase(),
			val,
			group,
		}
	}

	fn link(source: NodeRef, target: NodeRef) -> GraphLink {
		GraphLink {
			source,
			target,
			relationships: vec!["partners_with".to_string()],
			evidences: vec!["seen in a thread".to_string()],
			post_urls: vec!["https://reddit.com/x".to_string()],
			curvature: 0.0,
		}
	}

	#[test]
	fn groups_pick_palette_colors_with_wraparound() {
		assert_eq!(color_for_group(Some(0)), COLORS[0]);
		assert_eq!(color_for_group(Some(1)), COLORS[1]);
		assert_eq!(color_for_group(Some(10)), COLORS[0]);
		assert_eq!(color_for_group(None), COLORS[0]);
	}

	#[test]
	fn layers_follow_link_direction() {
		let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
		let links = vec![
			("a".to_string(), "b".to_string()),
			("b".to_string(), "c".to_string()),
			("a".to_string(), "d".to_string()),
		];
		let layers = assign_layers(&ids, &links);
		assert_eq!(layers["a"], 0);
		assert_eq!(layers["b"], 1);
		assert_eq!(layers["c"], 2);
		assert_eq!(layers["d"], 1);
	}

	#[test]
	fn cycles_still_get_a_layer() {
		let ids: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
		let links = vec![
			("a".to_string(), "b".to_string()),
			("b".to_string(), "a".to_string()),
		];
		let layers = assign_layers(&ids, &links);
		assert_eq!(layers.len(), 2);
		assert_eq!(layers["a"], 0);
		assert_eq!(layers["b"], 1);
	}

	#[test]
	fn endpoints_resolve_for_ids_and_embedded_objects() {
		let data = GraphData {
			nodes: vec![node("a", 1.0, Some(0)), node("b", 1.0, Some(1))],
			links: vec![link(
				NodeRef::Node { id: "a".to_string() },
				NodeRef::Id("b".to_string()),
			)],
		};
		let state = RelationshipGraphState::new(&data, 800.0, 600.0);
		assert_eq!(state.edges.len(), 1);
		assert_eq!(state.edges[0].selection.source, "a");
		assert_eq!(state.edges[0].selection.target, "b");
	}

	#[test]
	fn dangling_links_are_dropped() {
		let data = GraphData {
			nodes: vec![node("a", 1.0, None)],
			links: vec![link(
				NodeRef::Id("a".to_string()),
				NodeRef::Id("ghost".to_string()),
			)],
		};
		let state = RelationshipGraphState::new(&data, 800.0, 600.0);
		assert!(state.edges.is_empty());
	}

	#[test]
	fn edge_click_returns_the_exact_link_payload() {
		let data = GraphData {
			nodes: vec![node("a", 1.0, None), node("b", 1.0, None)],
			links: vec![link(
				NodeRef::Id("a".to_string()),
				NodeRef::Id("b".to_string()),
			)],
		};
		let state = RelationshipGraphState::new(&data, 800.0, 600.0);

		// Both nodes sit at y = MARGIN; the midpoint lies on the edge.
		let mid_x = MARGIN + LAYER_GAP / 2.0;
		let selection = state.selection_at(mid_x, MARGIN).expect("edge under cursor");
		assert_eq!(selection.relationships, vec!["partners_with"]);
		assert_eq!(selection.evidences, vec!["seen in a thread"]);
		assert_eq!(selection.post_urls, vec!["https://reddit.com/x"]);

		// Far away from the edge there is nothing to select.
		assert_eq!(state.selection_at(mid_x, MARGIN + 300.0), None);
	}

	#[test]
	fn segment_distance() {
		assert_eq!(point_segment_distance(0.0, 5.0, 0.0, 0.0, 10.0, 0.0), 5.0);
		assert_eq!(point_segment_distance(-3.0, 0.0, 0.0, 0.0, 10.0, 0.0), 3.0);
		assert_eq!(point_segment_distance(5.0, 0.0, 0.0, 0.0, 10.0, 0.0), 0.0);
	}

	#[test]
	fn radius_grows_with_val_but_is_capped() {
		assert!(node_radius(1.0) < node_radius(9.0));
		assert_eq!(node_radius(10_000.0), 14.0);
	}
}
