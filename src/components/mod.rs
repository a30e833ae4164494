pub mod relationship_graph;
