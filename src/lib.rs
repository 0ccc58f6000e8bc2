// Sankey Flow - Core Library
// Income statement rows → classified entries → Sankey flow graph

pub mod classifier;
pub mod locale;
pub mod config;
pub mod statement;
pub mod aggregate;
pub mod registry;
pub mod graph;
pub mod report;
pub mod parser;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use classifier::{classify, Category, KeywordTable};
pub use locale::{AggregateLabels, CategoryKeywords, Language, Locale};
pub use config::EngineConfig;
pub use statement::{ClassifiedEntry, ClassifiedStatement, LineItem, SkippedRow};
pub use aggregate::{aggregate, Aggregates};
pub use registry::LabelRegistry;
pub use graph::{Edge, FlowGraph, GraphBuilder, GraphError, Node};
pub use report::{generate, generate_from_import, Advisory, FlowReport, ImportedReport};
pub use parser::{
    detect_format, load_rows, write_template,
    DelimitedReader, InputFormat, RowError, RowImport, RowIssue, StatementReader,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
