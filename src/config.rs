//! Engine configuration: display locale plus the classification keyword table
//!
//! Precedence (lowest to highest):
//! 1. Built-in keywords of every language (always active)
//! 2. Built-in locale for the requested language
//! 3. Locale file (JSON): replaces labels, adds keywords

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::classifier::KeywordTable;
use crate::locale::{Language, Locale};

/// Everything one report generation needs besides the rows
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub locale: Locale,
    pub table: KeywordTable,
}

impl EngineConfig {
    pub fn for_language(language: Language) -> Self {
        EngineConfig {
            locale: Locale::for_language(language),
            table: KeywordTable::default(),
        }
    }

    /// Resolve language and optional locale file into a config
    pub fn load(language: Language, locale_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::for_language(language);

        if let Some(path) = locale_file {
            let locale = Locale::from_file(path)?;
            debug!(path = %path.display(), "locale file loaded");
            config.table.extend(&locale.keywords);
            config.locale = locale;
        }

        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}
