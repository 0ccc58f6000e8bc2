// 🏷️ Classifier - Keyword table as data
// Maps free-text row types ("Revenue", "Gider", "COGS") onto the fixed statement categories

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::locale::{CategoryKeywords, Locale};

// ============================================================================
// CATEGORY
// ============================================================================

/// Financial category of an input row. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Money coming in (product sales, services)
    Revenue,

    /// Direct cost of producing the revenue (COGS)
    CostOfRevenue,

    /// Operating expenses and tax
    Expense,

    /// Type string matched no keyword
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "Revenue",
            Category::CostOfRevenue => "CostOfRevenue",
            Category::Expense => "Expense",
            Category::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Category::Unknown
    }
}

/// Lower-case a type string for matching.
///
/// Lower-casing Turkish `İ` yields `i` plus U+0307; the combining dot is dropped
/// so "GELİR" and "gelir" compare equal.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{307}', "")
}

// ============================================================================
// KEYWORD TABLE
// ============================================================================

/// Ordered (Category, keywords) table. Row order is match priority.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordTable {
    /// Fixed priority: Revenue → CostOfRevenue → Expense
    pub const PRIORITY: [Category; 3] = [
        Category::Revenue,
        Category::CostOfRevenue,
        Category::Expense,
    ];

    /// Table with the priority rows and no keywords
    pub fn empty() -> Self {
        KeywordTable {
            entries: Self::PRIORITY
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
        }
    }

    /// Union of the keyword lists of every given locale
    pub fn from_locales<'a, I>(locales: I) -> Self
    where
        I: IntoIterator<Item = &'a Locale>,
    {
        let mut table = Self::empty();
        for locale in locales {
            table.extend(&locale.keywords);
        }
        table
    }

    /// Merge extra keywords. Priority order is unchanged; duplicates are ignored.
    pub fn extend(&mut self, keywords: &CategoryKeywords) {
        for (category, words) in self.entries.iter_mut() {
            for word in keywords.for_category(*category) {
                let word = normalize(word.trim());
                if !word.is_empty() && !words.contains(&word) {
                    words.push(word);
                }
            }
        }
    }

    /// Keywords registered for a category (empty for Unknown)
    pub fn keywords(&self, category: Category) -> &[String] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// First category in priority order whose keyword occurs in `raw_type`
    pub fn classify(&self, raw_type: &str) -> Category {
        let text = normalize(raw_type);

        for (category, words) in &self.entries {
            if let Some(word) = words.iter().find(|w| text.contains(w.as_str())) {
                trace!(raw_type, keyword = %word, category = category.as_str(), "classified");
                return *category;
            }
        }

        trace!(raw_type, "no keyword matched");
        Category::Unknown
    }
}

impl Default for KeywordTable {
    /// Multi-lingual table built from every built-in locale
    fn default() -> Self {
        Self::from_locales(Locale::builtin().iter())
    }
}

/// Classify with the default multi-lingual table
pub fn classify(raw_type: &str) -> Category {
    KeywordTable::default().classify(raw_type)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_types() {
        let table = KeywordTable::default();

        assert_eq!(table.classify("Revenue"), Category::Revenue);
        assert_eq!(table.classify("COGS"), Category::CostOfRevenue);
        assert_eq!(table.classify("Cost of Sales"), Category::CostOfRevenue);
        assert_eq!(table.classify("Expense"), Category::Expense);
        assert_eq!(table.classify("Income Tax"), Category::Expense);
    }

    #[test]
    fn test_turkish_types() {
        let table = KeywordTable::default();

        assert_eq!(table.classify("Gelir"), Category::Revenue);
        assert_eq!(table.classify("Satış Maliyeti"), Category::CostOfRevenue);
        assert_eq!(table.classify("Faaliyet Gideri"), Category::Expense);
        assert_eq!(table.classify("Vergi"), Category::Expense);
    }

    #[test]
    fn test_turkish_dotted_capital_i() {
        assert_eq!(normalize("GELİR"), "gelir");
        assert_eq!(classify("GELİR"), Category::Revenue);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(classify("  OPEX  "), Category::Expense);
        assert_eq!(classify("other revenues"), Category::Revenue);
    }

    #[test]
    fn test_priority_order_resolves_overlap() {
        // Both "rev" and "cost" occur: Revenue is checked first
        assert_eq!(classify("Cost of Revenue"), Category::Revenue);
        // Both "cost" and "exp" occur: CostOfRevenue before Expense
        assert_eq!(classify("cost expense"), Category::CostOfRevenue);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(classify("Dividend"), Category::Unknown);
        assert_eq!(classify(""), Category::Unknown);
        assert!(!Category::Unknown.is_known());
    }

    #[test]
    fn test_extend_keeps_priority_and_dedupes() {
        let mut table = KeywordTable::empty();
        assert_eq!(table.classify("Revenue"), Category::Unknown);

        let extra = CategoryKeywords {
            revenue: vec!["Ventas".to_string(), "ventas".to_string()],
            cost_of_revenue: vec![],
            expense: vec!["gasto".to_string(), "  ".to_string()],
        };
        table.extend(&extra);

        assert_eq!(table.keywords(Category::Revenue), &["ventas".to_string()]);
        assert_eq!(table.keywords(Category::Expense), &["gasto".to_string()]);
        assert!(table.keywords(Category::Unknown).is_empty());
        assert_eq!(table.classify("VENTAS NETAS"), Category::Revenue);
        assert_eq!(table.classify("Gasto general"), Category::Expense);
    }

    #[test]
    fn test_default_table_is_union_of_locales() {
        let table = KeywordTable::default();
        let revenue = table.keywords(Category::Revenue);

        assert!(revenue.contains(&"rev".to_string()));
        assert!(revenue.contains(&"gelir".to_string()));
        assert_eq!(table.keywords(Category::Expense).len(), 4);
    }
}
