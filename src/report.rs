// 📊 Flow Report - Everything the renderer needs for one statement
// classify → aggregate → build graph, plus advisories for loss / no-data cases

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::aggregate::{aggregate, Aggregates};
use crate::classifier::KeywordTable;
use crate::graph::{FlowGraph, GraphBuilder};
use crate::locale::Locale;
use crate::parser::{RowImport, RowIssue};
use crate::statement::{ClassifiedStatement, LineItem, SkippedRow};

// ============================================================================
// ADVISORIES
// ============================================================================

/// Non-fatal observations about a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Total revenue is zero or negative: nothing meaningful to draw
    NoRevenue,

    /// Cost of revenue consumes all revenue; the gross profit branch is omitted
    GrossLoss { amount: f64 },

    /// Expenses exceed gross profit; the net income edge is omitted
    NetLoss { amount: f64 },
}

impl Advisory {
    pub fn from_aggregates(aggregates: &Aggregates) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        if aggregates.total_revenue <= 0.0 {
            advisories.push(Advisory::NoRevenue);
        } else if aggregates.is_gross_loss() {
            advisories.push(Advisory::GrossLoss {
                amount: aggregates.cost_of_revenue - aggregates.total_revenue,
            });
        }
        if aggregates.is_net_loss() {
            advisories.push(Advisory::NetLoss {
                amount: -aggregates.net_income,
            });
        }

        advisories
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NoRevenue => write!(f, "No revenue: enter data or upload a file to see the diagram"),
            Advisory::GrossLoss { amount } => {
                write!(
                    f,
                    "Cost of revenue exceeds revenue by {:.2}; gross profit, expense and net income flows omitted",
                    amount
                )
            }
            Advisory::NetLoss { amount } => {
                write!(f, "Expenses exceed gross profit by {:.2}; net income flow omitted", amount)
            }
        }
    }
}

// ============================================================================
// FLOW REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    pub graph: FlowGraph,
    pub aggregates: Aggregates,

    /// Rows that landed in a known category
    pub classified_count: usize,

    /// Rows whose type matched no keyword
    pub unclassified: Vec<SkippedRow>,

    pub advisories: Vec<Advisory>,
}

impl FlowReport {
    /// True when there is at least one flow to draw
    pub fn has_diagram(&self) -> bool {
        !self.graph.is_empty()
    }

    pub fn has_advisory(&self, advisory: &Advisory) -> bool {
        self.advisories
            .iter()
            .any(|a| std::mem::discriminant(a) == std::mem::discriminant(advisory))
    }

    /// Human-readable totals block
    pub fn summary(&self) -> String {
        let a = &self.aggregates;
        format!(
            "Revenue: {:.2}, COGS: {:.2}, Gross Profit: {:.2}, Expenses: {:.2}, Net Income: {:.2} ({} nodes, {} flows, {} rows skipped)",
            a.total_revenue,
            a.cost_of_revenue,
            a.gross_profit,
            a.total_expenses,
            a.net_income,
            self.graph.nodes.len(),
            self.graph.edges.len(),
            self.unclassified.len()
        )
    }
}

/// Full pipeline for one statement. Every call uses fresh engine state.
pub fn generate(
    items: impl IntoIterator<Item = LineItem>,
    locale: &Locale,
    table: &KeywordTable,
) -> FlowReport {
    FlowReport::from_statement(ClassifiedStatement::classify(items, table), locale)
}

impl FlowReport {
    /// Aggregate and build the graph for an already classified statement
    pub fn from_statement(statement: ClassifiedStatement, locale: &Locale) -> FlowReport {
        let aggregates = aggregate(&statement.entries);

        let graph = GraphBuilder::new(&locale.labels).emit(
            &statement.revenue_items(),
            &statement.expense_items(),
            &aggregates,
        );

        let advisories = Advisory::from_aggregates(&aggregates);
        for advisory in &advisories {
            warn!("{}", advisory);
        }

        info!(
            classified = statement.entries.len(),
            skipped = statement.skipped_count(),
            flows = graph.edges.len(),
            "flow report generated"
        );

        FlowReport {
            graph,
            aggregates,
            classified_count: statement.entries.len(),
            unclassified: statement.unclassified,
            advisories,
        }
    }
}

/// Report for a file import: the flow report plus rows the reader rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedReport {
    #[serde(flatten)]
    pub report: FlowReport,

    pub row_issues: Vec<RowIssue>,
}

pub fn generate_from_import(import: RowImport, locale: &Locale, table: &KeywordTable) -> ImportedReport {
    ImportedReport {
        report: generate(import.items, locale, table),
        row_issues: import.issues,
    }
}
