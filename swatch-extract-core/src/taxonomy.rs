//! Series/color taxonomy and text normalization.
//!
//! The taxonomy is the sole configuration of the labeling pipeline: a
//! fixed mapping from product series name to its valid color names.
//! All comparisons against document text go through [`normalize`] so
//! that line breaks, repeated spaces, and casing never cause a false
//! negative.

use crate::error::{Result, SwatchError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Canonicalize text for comparison: collapse whitespace runs to a
/// single space, trim, lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One product series and its ordered color vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Display name of the series, used verbatim as a directory name
    pub name: String,
    /// Valid color names in catalog order, display casing preserved
    pub colors: Vec<String>,
}

/// Immutable series→colors configuration with precomputed lookup
/// structures for detection and color matching.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<SeriesEntry>,
    /// Normalized series names paired with their entry index, sorted
    /// longest first. Some series names nest inside others
    /// ("Timberline HDZ" inside "Timberline HDZ RS"), so detection
    /// must try the more specific name first.
    detection_order: Vec<(String, usize)>,
    /// Normalized color names valid under any series
    all_colors: HashSet<String>,
    /// Normalized color set per series, same order as `entries`
    series_colors: Vec<HashSet<String>>,
}

impl Taxonomy {
    /// Build a taxonomy from series entries.
    ///
    /// Fails if any series or color name is empty, or if two distinct
    /// colors within one series collapse to the same normalized form
    /// (the locator could no longer tell them apart).
    pub fn new(entries: Vec<SeriesEntry>) -> Result<Self> {
        let mut series_colors = Vec::with_capacity(entries.len());
        let mut all_colors = HashSet::new();
        for entry in &entries {
            if normalize(&entry.name).is_empty() {
                return Err(SwatchError::InvalidTaxonomy(
                    "empty series name".to_string(),
                ));
            }
            let mut normalized = HashSet::with_capacity(entry.colors.len());
            for color in &entry.colors {
                let key = normalize(color);
                if key.is_empty() {
                    return Err(SwatchError::InvalidTaxonomy(format!(
                        "empty color name in series '{}'",
                        entry.name
                    )));
                }
                if !normalized.insert(key.clone()) {
                    return Err(SwatchError::InvalidTaxonomy(format!(
                        "color '{}' collides with another color in series '{}'",
                        color, entry.name
                    )));
                }
                all_colors.insert(key);
            }
            series_colors.push(normalized);
        }

        let mut detection_order: Vec<(String, usize)> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (normalize(&entry.name), i))
            .collect();
        detection_order.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        Ok(Self {
            entries,
            detection_order,
            all_colors,
            series_colors,
        })
    }

    /// Load a taxonomy from a JSON object mapping series name to an
    /// array of color names.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        let entries = table
            .into_iter()
            .map(|(name, colors)| SeriesEntry { name, colors })
            .collect();
        Self::new(entries)
    }

    /// Load a taxonomy from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_reader(File::open(path)?)
    }

    /// The configured series entries, in declaration order
    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    /// Display color list for a series, if the series exists
    pub fn colors_of(&self, series: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.name == series)
            .map(|entry| entry.colors.as_slice())
    }

    /// Normalized color vocabulary for one series, falling back to
    /// the union across all series when no series is known.
    pub fn color_vocabulary(&self, series: Option<&str>) -> &HashSet<String> {
        if let Some(series) = series {
            if let Some(idx) = self.entries.iter().position(|entry| entry.name == series) {
                return &self.series_colors[idx];
            }
        }
        &self.all_colors
    }

    /// Detect which series a page belongs to from its full text.
    ///
    /// Series names are tried longest-normalized-form first and the
    /// first substring match wins; a page is attributed to at most one
    /// series.
    pub fn detect_series(&self, page_text: &str) -> Option<&str> {
        let haystack = normalize(page_text);
        for (needle, idx) in &self.detection_order {
            if haystack.contains(needle.as_str()) {
                return Some(self.entries[*idx].name.as_str());
            }
        }
        None
    }

    /// The shingle catalog taxonomy this tool was built for
    pub fn builtin() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "Timberline HDZ",
                &[
                    "Barkwood",
                    "Charcoal",
                    "Hickory",
                    "Hunter Green",
                    "Mission Brown",
                    "Pewter Gray",
                    "Shakewood",
                    "Slate",
                    "Weathered Wood",
                    "Appalachian Sky",
                    "Nantucket Morning",
                    "Golden Harvest",
                    "Cedar Falls",
                    "Biscayne Blue",
                    "Birchwood",
                    "Copper Canyon",
                    "Driftwood",
                    "Fox Hollow Gray",
                    "Golden Amber",
                    "Oyster Gray",
                    "Patriot Red",
                    "Sunset Brick",
                    "Williamsburg Slate",
                ],
            ),
            (
                "Timberline UHDZ",
                &[
                    "Barkwood",
                    "Charcoal",
                    "Pewter Gray",
                    "Shakewood",
                    "Slate",
                    "Weathered Wood",
                ],
            ),
            (
                "Timberline NS",
                &[
                    "Weathered Wood",
                    "Barkwood",
                    "Charcoal",
                    "Pewter Gray",
                    "Shakewood",
                    "Slate",
                    "Hickory",
                ],
            ),
            (
                "Grand Sequoia",
                &[
                    "Charcoal",
                    "Autumn Brown",
                    "Weathered Wood",
                    "Cedar Mesa Brown",
                ],
            ),
            (
                "Camelot II",
                &[
                    "Weathered Timber",
                    "Antique Slate",
                    "Charcoal",
                    "Barkwood",
                    "Royal Slate",
                ],
            ),
            ("Woodland", &["Cedarwood Abbey", "Castlewood Gray"]),
            (
                "Slateline",
                &[
                    "Royal Slate",
                    "Antique Slate",
                    "English Gray",
                    "Weathered Slate",
                ],
            ),
            (
                "Timberline AS II",
                &[
                    "Charcoal",
                    "Dusky Gray",
                    "Weathered Wood",
                    "Hickory",
                    "Adobe Sunset",
                    "Pewter Gray",
                    "Barkwood",
                    "Shakewood",
                    "Slate",
                ],
            ),
            ("Grand Sequoia AS", &["Charcoal", "Dusky Gray", "Weathered Wood"]),
            (
                "Timberline HDZ RS",
                &[
                    "Sagewood",
                    "Stone Gray",
                    "Hickory",
                    "Aged Chestnut",
                    "Coastal Slate",
                    "Sandalwood",
                    "Charcoal",
                ],
            ),
            (
                "Grand Sequoia RS",
                &[
                    "Sandalwood",
                    "Ocean Gray",
                    "Charcoal",
                    "Forest Brown",
                    "Sagewood",
                ],
            ),
            ("Royal Sovereign", &["Charcoal", "Weathered Gray"]),
        ];

        let entries = table
            .iter()
            .map(|(name, colors)| SeriesEntry {
                name: name.to_string(),
                colors: colors.iter().map(|c| c.to_string()).collect(),
            })
            .collect();

        // The builtin table is static and validated by tests.
        Self::new(entries).expect("builtin taxonomy is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Taxonomy {
        Taxonomy::new(vec![
            SeriesEntry {
                name: "Timberline HDZ".to_string(),
                colors: vec!["Barkwood".to_string(), "Charcoal".to_string()],
            },
            SeriesEntry {
                name: "Timberline HDZ RS".to_string(),
                colors: vec!["Sagewood".to_string()],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Pewter \n  Gray \t"), "pewter gray");
        assert_eq!(normalize("Charcoal"), "charcoal");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_detect_series_simple() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.detect_series("Introducing the Timberline HDZ lineup"),
            Some("Timberline HDZ")
        );
        assert_eq!(taxonomy.detect_series("Unrelated page"), None);
    }

    #[test]
    fn test_detect_series_prefers_longest_match() {
        let taxonomy = sample();
        // "Timberline HDZ" is a substring of "Timberline HDZ RS"; the
        // longer, more specific name must win.
        assert_eq!(
            taxonomy.detect_series("The Timberline\nHDZ RS collection"),
            Some("Timberline HDZ RS")
        );
    }

    #[test]
    fn test_detect_series_is_case_insensitive() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.detect_series("TIMBERLINE   hdz colors"),
            Some("Timberline HDZ")
        );
    }

    #[test]
    fn test_color_vocabulary_restricted_and_global() {
        let taxonomy = sample();
        let restricted = taxonomy.color_vocabulary(Some("Timberline HDZ RS"));
        assert!(restricted.contains("sagewood"));
        assert!(!restricted.contains("barkwood"));

        let global = taxonomy.color_vocabulary(None);
        assert!(global.contains("sagewood"));
        assert!(global.contains("barkwood"));
        assert!(global.contains("charcoal"));
    }

    #[test]
    fn test_unknown_series_falls_back_to_global_vocabulary() {
        let taxonomy = sample();
        let vocabulary = taxonomy.color_vocabulary(Some("No Such Series"));
        assert!(vocabulary.contains("barkwood"));
    }

    #[test]
    fn test_colors_of() {
        let taxonomy = sample();
        assert_eq!(
            taxonomy.colors_of("Timberline HDZ").unwrap(),
            &["Barkwood".to_string(), "Charcoal".to_string()]
        );
        assert!(taxonomy.colors_of("Woodland").is_none());
    }

    #[test]
    fn test_rejects_empty_color_name() {
        let result = Taxonomy::new(vec![SeriesEntry {
            name: "Woodland".to_string(),
            colors: vec!["   ".to_string()],
        }]);
        assert!(matches!(result, Err(SwatchError::InvalidTaxonomy(_))));
    }

    #[test]
    fn test_rejects_normalization_collision_within_series() {
        let result = Taxonomy::new(vec![SeriesEntry {
            name: "Woodland".to_string(),
            colors: vec!["Pewter  Gray".to_string(), "pewter gray".to_string()],
        }]);
        assert!(matches!(result, Err(SwatchError::InvalidTaxonomy(_))));
    }

    #[test]
    fn test_same_color_allowed_across_series() {
        // "Charcoal" appears in almost every series of the builtin
        // table; only collisions within one series are invalid.
        let taxonomy = sample();
        assert!(taxonomy.color_vocabulary(None).contains("charcoal"));
    }

    #[test]
    fn test_builtin_is_valid() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.entries().len(), 12);
        assert!(taxonomy.colors_of("Royal Sovereign").is_some());
        assert!(taxonomy.color_vocabulary(None).contains("weathered wood"));
    }

    #[test]
    fn test_builtin_nested_names_resolve_to_variant() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(
            taxonomy.detect_series("Grand Sequoia RS color availability"),
            Some("Grand Sequoia RS")
        );
        assert_eq!(
            taxonomy.detect_series("Grand Sequoia color availability"),
            Some("Grand Sequoia")
        );
    }

    #[test]
    fn test_from_json_reader() {
        let json = r#"{"Woodland": ["Cedarwood Abbey", "Castlewood Gray"]}"#;
        let taxonomy = Taxonomy::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(taxonomy.entries().len(), 1);
        assert_eq!(
            taxonomy.detect_series("the Woodland collection"),
            Some("Woodland")
        );
        assert!(taxonomy.color_vocabulary(None).contains("castlewood gray"));
    }

    #[test]
    fn test_from_json_reader_rejects_malformed_input() {
        let result = Taxonomy::from_json_reader(&b"not json"[..]);
        assert!(matches!(result, Err(SwatchError::TaxonomyFormat(_))));
    }
}
