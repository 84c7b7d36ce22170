//! Undirected similarity graph for layout and visualisation.
//!
//! Nodes are the samples that appear in at least one edge, in ascending key
//! order; edges keep the edge-list order. Both orders are stable, so a
//! seeded layout is reproducible.

use std::collections::BTreeMap;

use forensim_common::entities::SampleKey;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::edges::Edge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: SampleKey,
    pub degree: usize,
    /// Sum of incident edge weights
    pub weighted_degree: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: SampleKey,
    pub target: SampleKey,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl SimilarityGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut degrees: BTreeMap<&SampleKey, (usize, f64)> = BTreeMap::new();
        let mut graph_edges = Vec::with_capacity(edges.len());

        for e in edges {
            if e.sample_a == e.sample_b {
                warn!("Skipping self-loop on sample {}", e.sample_a);
                continue;
            }
            for end in [&e.sample_a, &e.sample_b] {
                let d = degrees.entry(end).or_insert((0, 0.0));
                d.0 += 1;
                d.1 += e.score;
            }
            graph_edges.push(GraphEdge {
                source: e.sample_a.clone(),
                target: e.sample_b.clone(),
                weight: e.score,
            });
        }

        let nodes = degrees
            .into_iter()
            .map(|(id, (degree, weighted_degree))| GraphNode {
                id: id.clone(),
                degree,
                weighted_degree,
            })
            .collect();

        Self { nodes, edges: graph_edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Convert to a petgraph graph. Node and edge indices follow this
    /// graph's node and edge order.
    pub fn to_petgraph(&self) -> UnGraph<SampleKey, f64> {
        let mut g = UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let index: BTreeMap<&SampleKey, NodeIndex> = self
            .nodes
            .iter()
            .map(|n| (&n.id, g.add_node(n.id.clone())))
            .collect();
        for e in &self.edges {
            if let (Some(&a), Some(&b)) = (index.get(&e.source), index.get(&e.target)) {
                g.add_edge(a, b, e.weight);
            }
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edge(a: &str, b: &str, score: f64) -> Edge {
        Edge {
            sample_a: SampleKey::from(a),
            sample_b: SampleKey::from(b),
            score,
            shared_substances: String::new(),
        }
    }

    #[test]
    fn test_nodes_are_sorted_union_of_endpoints() {
        let g = SimilarityGraph::from_edges(&[edge("C", "A", 0.9), edge("B", "C", 0.6)]);
        let ids: Vec<String> = g.nodes.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        let c = &g.nodes[2];
        assert_eq!(c.degree, 2);
        assert!((c.weighted_degree - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_self_loops_never_added() {
        let g = SimilarityGraph::from_edges(&[edge("A", "A", 1.0), edge("A", "B", 0.7)]);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_petgraph_preserves_order_and_weights() {
        let edges = [edge("B", "C", 0.8), edge("A", "B", 0.6)];
        let g = SimilarityGraph::from_edges(&edges);
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        assert_eq!(pg[NodeIndex::new(0)], SampleKey::from("A"));
        let weights: Vec<f64> = pg.edge_indices().map(|i| pg[i]).collect();
        assert_eq!(weights, vec![0.8, 0.6]);
    }

    #[test]
    fn test_same_edges_same_graph() {
        let edges = [edge("B", "C", 0.8), edge("A", "B", 0.6), edge("A", "C", 0.5)];
        assert_eq!(SimilarityGraph::from_edges(&edges), SimilarityGraph::from_edges(&edges));
    }

    #[test]
    fn test_empty_edges_empty_graph() {
        assert!(SimilarityGraph::from_edges(&[]).is_empty());
    }
}
