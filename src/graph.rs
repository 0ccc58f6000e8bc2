// 🌊 Flow Graph - Sankey nodes and edges for an income statement
//
// Edge order is a contract with the renderer (left-to-right layout):
//   sources → Total Revenue → COGS / Gross Profit → expenses / Net Income
// Only positive flows are emitted. Nodes exist only once an edge references them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::aggregate::{sum_values, Aggregates};
use crate::locale::AggregateLabels;
use crate::registry::LabelRegistry;
use crate::statement::LineItem;

// ============================================================================
// GRAPH TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Broken graph invariants. These are programming errors, never input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Edge {edge} references missing node {node} (graph has {node_count} nodes)")]
    DanglingEdge {
        edge: usize,
        node: usize,
        node_count: usize,
    },

    #[error("Edge {edge} has non-positive value {value}")]
    NonPositiveEdge { edge: usize, value: f64 },

    #[error("Node at position {position} carries index {index}")]
    MisnumberedNode { position: usize, index: usize },
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node_label(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|n| n.label.as_str())
    }

    /// Edges as (source label, target label, value)
    pub fn labeled_edges(&self) -> Vec<(&str, &str, f64)> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.node_label(e.source)?, self.node_label(e.target)?, e.value)))
            .collect()
    }

    // Column-oriented views, the shape chart libraries take directly

    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    pub fn sources(&self) -> Vec<usize> {
        self.edges.iter().map(|e| e.source).collect()
    }

    pub fn targets(&self) -> Vec<usize> {
        self.edges.iter().map(|e| e.target).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.value).collect()
    }

    /// Check index and positivity invariants
    pub fn validate(&self) -> Result<(), GraphError> {
        let node_count = self.nodes.len();

        for (position, node) in self.nodes.iter().enumerate() {
            if node.index != position {
                return Err(GraphError::MisnumberedNode {
                    position,
                    index: node.index,
                });
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            for node in [edge.source, edge.target] {
                if node >= node_count {
                    return Err(GraphError::DanglingEdge {
                        edge: i,
                        node,
                        node_count,
                    });
                }
            }
            if !(edge.value > 0.0) {
                return Err(GraphError::NonPositiveEdge {
                    edge: i,
                    value: edge.value,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// GRAPH BUILDER
// ============================================================================

/// Builds one FlowGraph. Owns the LabelRegistry for that single build.
pub struct GraphBuilder<'a> {
    labels: &'a AggregateLabels,
    registry: LabelRegistry,
    edges: Vec<Edge>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(labels: &'a AggregateLabels) -> Self {
        GraphBuilder {
            labels,
            registry: LabelRegistry::new(),
            edges: Vec::new(),
        }
    }

    /// Build the graph for one statement. Totals are derived from the inputs.
    pub fn build(
        revenue_items: &[LineItem],
        cost_of_revenue: f64,
        expense_items: &[LineItem],
        labels: &AggregateLabels,
    ) -> FlowGraph {
        let aggregates = Aggregates::from_totals(
            sum_values(revenue_items),
            cost_of_revenue,
            sum_values(expense_items),
        );

        GraphBuilder::new(labels).emit(revenue_items, expense_items, &aggregates)
    }

    /// Emit edges for precomputed aggregates
    pub fn emit(
        mut self,
        revenue_items: &[LineItem],
        expense_items: &[LineItem],
        aggregates: &Aggregates,
    ) -> FlowGraph {
        let labels = self.labels;

        // 1. Sources → Total Revenue (aggregate node registered first)
        for item in revenue_items.iter().filter(|i| i.is_positive()) {
            let target = self.registry.index_of(&labels.total_revenue);
            let source = self.registry.index_of(&item.name);
            self.push(source, target, item.value);
        }

        // 2. Total Revenue → COGS
        if aggregates.cost_of_revenue > 0.0 {
            self.link(&labels.total_revenue, &labels.cost_of_revenue, aggregates.cost_of_revenue);
        }

        // 3. Total Revenue → Gross Profit; everything downstream hangs off this edge
        if aggregates.has_gross_profit() {
            self.link(&labels.total_revenue, &labels.gross_profit, aggregates.gross_profit);

            // 4. Gross Profit → each expense
            for item in expense_items.iter().filter(|i| i.is_positive()) {
                self.link(&labels.gross_profit, &item.name, item.value);
            }

            // 5. Gross Profit → Net Income
            if aggregates.net_income > 0.0 {
                self.link(&labels.gross_profit, &labels.net_income, aggregates.net_income);
            }
        } else {
            debug!(gross_profit = aggregates.gross_profit, "no gross profit, omitting downstream flows");
        }

        self.finish()
    }

    fn link(&mut self, source: &str, target: &str, value: f64) {
        let source = self.registry.index_of(source);
        let target = self.registry.index_of(target);
        self.push(source, target, value);
    }

    fn push(&mut self, source: usize, target: usize, value: f64) {
        debug_assert!(value > 0.0, "non-positive flow {value}");
        self.edges.push(Edge {
            source,
            target,
            value,
        });
    }

    fn finish(self) -> FlowGraph {
        let graph = FlowGraph {
            nodes: self.registry.into_nodes(),
            edges: self.edges,
        };

        debug_assert!(graph.validate().is_ok(), "invalid flow graph: {:?}", graph.validate());
        debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "flow graph built");
        graph
    }
}

// ============================================================================
// TESTS
// ============================================================================
