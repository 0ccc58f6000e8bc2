// 🌐 Locale - Display labels and category keywords per language
// Pure configuration data: built-in English/Turkish tables, or a JSON file

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::classifier::Category;

// ============================================================================
// LANGUAGE
// ============================================================================

/// Accepted on the wire in any form `FromStr` takes; written back as its code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Turkish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Turkish => "tr",
        }
    }

    /// Name shown in a language picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Turkish => "Türkçe",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "tr" | "turkish" | "türkçe" | "turkce" => Ok(Language::Turkish),
            other => bail!("Unsupported language: {}", other),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

// ============================================================================
// LABELS & KEYWORDS
// ============================================================================

/// Display strings for the four aggregate nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateLabels {
    pub total_revenue: String,
    pub cost_of_revenue: String,
    pub gross_profit: String,
    pub net_income: String,
}

impl AggregateLabels {
    pub fn english() -> Self {
        AggregateLabels {
            total_revenue: "Total Revenue".to_string(),
            cost_of_revenue: "Cost of Revenue (COGS)".to_string(),
            gross_profit: "Gross Profit".to_string(),
            net_income: "Net Income".to_string(),
        }
    }

    pub fn turkish() -> Self {
        AggregateLabels {
            total_revenue: "Toplam Gelir".to_string(),
            cost_of_revenue: "Satışların Maliyeti (COGS)".to_string(),
            gross_profit: "Brüt Kâr".to_string(),
            net_income: "Net Kâr".to_string(),
        }
    }
}

impl Default for AggregateLabels {
    fn default() -> Self {
        Self::english()
    }
}

/// Keyword lists per category, as stored in a locale file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    #[serde(default)]
    pub revenue: Vec<String>,

    #[serde(default)]
    pub cost_of_revenue: Vec<String>,

    #[serde(default)]
    pub expense: Vec<String>,
}

impl CategoryKeywords {
    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::Revenue => self.revenue.as_slice(),
            Category::CostOfRevenue => self.cost_of_revenue.as_slice(),
            Category::Expense => self.expense.as_slice(),
            Category::Unknown => &[],
        }
    }

    fn from_strs(revenue: &[&str], cost_of_revenue: &[&str], expense: &[&str]) -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        CategoryKeywords {
            revenue: owned(revenue),
            cost_of_revenue: owned(cost_of_revenue),
            expense: owned(expense),
        }
    }
}

// ============================================================================
// LOCALE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    /// Built-in language this locale corresponds to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    pub labels: AggregateLabels,

    #[serde(default)]
    pub keywords: CategoryKeywords,
}

impl Locale {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Locale {
                language: Some(language),
                labels: AggregateLabels::english(),
                keywords: CategoryKeywords::from_strs(&["rev"], &["cog", "cost"], &["exp", "tax"]),
            },
            Language::Turkish => Locale {
                language: Some(language),
                labels: AggregateLabels::turkish(),
                keywords: CategoryKeywords::from_strs(&["gelir"], &["maliyet"], &["gider", "vergi"]),
            },
        }
    }

    /// Every built-in locale
    pub fn builtin() -> Vec<Locale> {
        vec![
            Self::for_language(Language::English),
            Self::for_language(Language::Turkish),
        ]
    }

    /// Load a locale from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read locale file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let locale: Locale = serde_json::from_str(content).context("Failed to parse locale JSON")?;
        Ok(locale)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::for_language(Language::English)
    }
}

// ============================================================================
// TESTS
// ============================================================================
