use ahash::AHashSet;
use anyhow::{Context, Result};
use regex::Regex;
use strsim::jaro_winkler;

use crate::config::ReviewConfig;

/// Park names of the form `No. 593`, which differ from their neighbours by one digit.
const NUMBERED_PARK_PATTERN: &str = r"^No\.\s\d{3}$";

/// Fuzzy park-name matching.
///
/// Names are compared after removing generic words such as "Park" or "Garden" and
/// collapsing whitespace. With `case_sensitive` off, both sides are lowercased first
/// and suffixes are removed regardless of case.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    suffixes: AHashSet<String>,
    case_sensitive: bool,
    threshold: f64,
    numbered_threshold: f64,
    numbered: Regex,
}

impl NameMatcher {
    pub fn new(config: &ReviewConfig) -> Result<Self> {
        let pattern = if config.case_sensitive { NUMBERED_PARK_PATTERN.to_string() }
            else { format!("(?i){NUMBERED_PARK_PATTERN}") };
        let numbered = Regex::new(&pattern)
            .with_context(|| format!("[review::matcher] Invalid numbered park pattern: {pattern}"))?;

        let suffixes = config.suffixes.iter()
            .map(|suffix| if config.case_sensitive { suffix.clone() } else { suffix.to_lowercase() })
            .collect();

        Ok(Self {
            suffixes,
            case_sensitive: config.case_sensitive,
            threshold: config.threshold,
            numbered_threshold: config.numbered_threshold,
            numbered,
        })
    }

    /// Remove suffix words and collapse whitespace.
    pub fn clean(&self, name: &str) -> String {
        let name = if self.case_sensitive { name.to_string() } else { name.to_lowercase() };
        name.split_whitespace()
            .filter(|word| !self.suffixes.contains(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True if a cleaned park name denotes a numbered park.
    pub fn is_numbered(&self, cleaned: &str) -> bool {
        self.numbered.is_match(cleaned)
    }

    /// Prepare a park name for repeated comparison against review names.
    pub fn park(&self, park_name: &str) -> ParkNameQuery {
        let cleaned = self.clean(park_name);
        let threshold = if self.is_numbered(&cleaned) { self.numbered_threshold } else { self.threshold };
        ParkNameQuery { cleaned, threshold }
    }
}

/// A cleaned park name with the similarity threshold its kind requires.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkNameQuery {
    cleaned: String,
    threshold: f64,
}

impl ParkNameQuery {
    #[inline] pub fn cleaned(&self) -> &str { &self.cleaned }

    #[inline] pub fn threshold(&self) -> f64 { self.threshold }

    /// True if an already cleaned review name is similar enough. Empty names never match.
    pub fn matches_cleaned(&self, cleaned_review: &str) -> bool {
        !self.cleaned.is_empty() && jaro_winkler(cleaned_review, &self.cleaned) > self.threshold
    }
}
