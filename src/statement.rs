// 📄 Statement - Line items and their classification
// One LineItem per input row; classification buckets them by Category

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{Category, KeywordTable};

// ============================================================================
// LINE ITEM
// ============================================================================

/// One input row: `name, value, type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,

    /// Expected >= 0, but bad input may carry negatives
    pub value: f64,

    /// Free-text type column ("Revenue", "COGS", "Gider", ...)
    #[serde(rename = "type")]
    pub raw_type: String,
}

impl LineItem {
    pub fn new(name: impl Into<String>, value: f64, raw_type: impl Into<String>) -> Self {
        LineItem {
            name: name.into(),
            value,
            raw_type: raw_type.into(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEntry {
    pub item: LineItem,
    pub category: Category,
}

impl ClassifiedEntry {
    /// Entry whose category is already known; the type column records it
    pub fn categorized(name: impl Into<String>, value: f64, category: Category) -> Self {
        ClassifiedEntry {
            item: LineItem::new(name, value, category.as_str()),
            category,
        }
    }
}

/// Row dropped because its type matched no keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Position in the input sequence (0-based)
    pub position: usize,
    pub name: String,
    pub raw_type: String,
}

// ============================================================================
// CLASSIFIED STATEMENT
// ============================================================================

/// Known-category entries in input order, plus what was skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedStatement {
    pub entries: Vec<ClassifiedEntry>,
    pub unclassified: Vec<SkippedRow>,
}

impl ClassifiedStatement {
    /// Classify every item; Unknown items are recorded and dropped
    pub fn classify(items: impl IntoIterator<Item = LineItem>, table: &KeywordTable) -> Self {
        let mut statement = ClassifiedStatement::default();

        for (position, item) in items.into_iter().enumerate() {
            let category = table.classify(&item.raw_type);

            if category.is_known() {
                statement.entries.push(ClassifiedEntry { item, category });
            } else {
                debug!(position, name = %item.name, raw_type = %item.raw_type, "skipping unclassified row");
                statement.unclassified.push(SkippedRow {
                    position,
                    name: item.name,
                    raw_type: item.raw_type,
                });
            }
        }

        statement
    }

    /// Statement from rows the caller has already categorized
    pub fn from_entries(entries: impl IntoIterator<Item = ClassifiedEntry>) -> Self {
        ClassifiedStatement {
            entries: entries.into_iter().filter(|e| e.category.is_known()).collect(),
            unclassified: Vec::new(),
        }
    }

    pub fn items(&self, category: Category) -> impl Iterator<Item = &LineItem> {
        self.entries
            .iter()
            .filter(move |e| e.category == category)
            .map(|e| &e.item)
    }

    pub fn revenue_items(&self) -> Vec<LineItem> {
        self.items(Category::Revenue).cloned().collect()
    }

    pub fn expense_items(&self) -> Vec<LineItem> {
        self.items(Category::Expense).cloned().collect()
    }

    pub fn skipped_count(&self) -> usize {
        self.unclassified.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LineItem> {
        vec![
            LineItem::new("iPhone", 46.2, "Revenue"),
            LineItem::new("Dividends", 3.0, "Other"),
            LineItem::new("Cost of Sales", 51.0, "COGS"),
            LineItem::new("Services", 25.0, "Gelir"),
            LineItem::new("Tax", 13.8, "Expense"),
        ]
    }

    #[test]
    fn test_classify_buckets_in_input_order() {
        let statement = ClassifiedStatement::classify(sample(), &KeywordTable::default());

        assert_eq!(statement.entries.len(), 4);
        let revenue: Vec<&str> = statement
            .items(Category::Revenue)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(revenue, vec!["iPhone", "Services"]);
        assert_eq!(statement.expense_items()[0].name, "Tax");
        assert_eq!(statement.items(Category::CostOfRevenue).count(), 1);
    }

    #[test]
    fn test_unknown_rows_are_observable() {
        let statement = ClassifiedStatement::classify(sample(), &KeywordTable::default());

        assert_eq!(statement.skipped_count(), 1);
        assert_eq!(
            statement.unclassified[0],
            SkippedRow {
                position: 1,
                name: "Dividends".to_string(),
                raw_type: "Other".to_string(),
            }
        );
        assert_eq!(statement.items(Category::Unknown).count(), 0);
    }

    #[test]
    fn test_from_entries_keeps_given_categories() {
        let statement = ClassifiedStatement::from_entries(vec![
            ClassifiedEntry::categorized("Revenue share", 10.0, Category::Expense),
            ClassifiedEntry::categorized("Misc", 1.0, Category::Unknown),
        ]);

        assert_eq!(statement.entries.len(), 1);
        assert_eq!(statement.expense_items()[0].name, "Revenue share");
        assert_eq!(statement.skipped_count(), 0);
    }

    #[test]
    fn test_line_item_serde_uses_type_field() {
        let item: LineItem =
            serde_json::from_str(r#"{"name":"R&D","value":8.3,"type":"Expense"}"#).unwrap();
        assert_eq!(item, LineItem::new("R&D", 8.3, "Expense"));
        assert!(item.is_positive());
        assert!(!LineItem::new("x", 0.0, "Revenue").is_positive());
    }
}
