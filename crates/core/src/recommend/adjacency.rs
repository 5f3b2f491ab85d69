use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Category name to ordered list of suggested category names.
///
/// Entries are independent: "RAM" suggesting "Processeurs" says nothing about
/// what "Processeurs" suggests. The table is kept exactly as configured and is
/// never symmetrized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyTable(BTreeMap<String, Vec<String>>);

const DEFAULT_ADJACENCY: &[(&str, &[&str])] = &[
    ("Ordinateurs", &["Accessoires", "Périphériques", "Écrans"]),
    ("Composants", &["Processeurs", "RAM", "Stockage"]),
    ("Processeurs", &["Cartes mères", "RAM", "Refroidissement"]),
    ("Cartes mères", &["Processeurs", "RAM", "Stockage"]),
    ("RAM", &["Processeurs", "Cartes mères"]),
    ("Cartes graphiques", &["Alimentations", "Écrans", "Boîtiers"]),
    ("Stockage", &["Composants", "Accessoires"]),
    ("Écrans", &["Accessoires", "Périphériques"]),
    ("Périphériques", &["Accessoires", "Écrans"]),
    ("Accessoires", &["Périphériques", "Composants"]),
    ("Téléphones", &["Accessoires"]),
];

impl AdjacencyTable {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(entries)
    }

    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Suggested categories for `category`, empty when it has no entry
    pub fn suggestions(&self, category: &str) -> &[String] {
        self.0.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_suggestions(&self, category: &str) -> bool {
        !self.suggestions(category).is_empty()
    }

    /// Union of the suggestions of every distinct anchor category
    pub fn union_for<'a>(&self, categories: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        let anchors: BTreeSet<&str> = categories.into_iter().collect();
        anchors.into_iter().flat_map(|category| self.suggestions(category)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AdjacencyTable {
    fn default() -> Self {
        Self(
            DEFAULT_ADJACENCY
                .iter()
                .map(|(category, suggested)| {
                    (
                        (*category).to_string(),
                        suggested.iter().map(|name| (*name).to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::AdjacencyTable;

    #[test]
    fn default_table_is_left_asymmetric() {
        let table = AdjacencyTable::default();

        assert_eq!(table.suggestions("RAM"), ["Processeurs", "Cartes mères"]);
        assert!(table.suggestions("Processeurs").iter().any(|name| name == "RAM"));
        assert!(table.suggestions("Refroidissement").is_empty());
        assert!(!table.suggestions("Téléphones").iter().any(|name| name == "Ordinateurs"));
    }

    #[test]
    fn union_merges_overlapping_suggestions() {
        let table = AdjacencyTable::new(BTreeMap::from([
            ("A".to_string(), vec!["X".to_string(), "Y".to_string()]),
            ("B".to_string(), vec!["Y".to_string(), "Z".to_string()]),
        ]));

        let union = table.union_for(["A", "B", "A"]);

        let expected: BTreeSet<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(union, expected);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = AdjacencyTable::default();
        assert!(!table.has_suggestions("ram"));
        assert!(table.has_suggestions("RAM"));
    }

    #[test]
    fn table_parses_from_toml() {
        let raw = r#"
"GPU" = ["PSU", "Écrans"]
"PSU" = []
"#;
        let table: AdjacencyTable = toml::from_str(raw).expect("adjacency toml");

        assert_eq!(table.suggestions("GPU"), ["PSU", "Écrans"]);
        assert!(!table.has_suggestions("PSU"));
        assert_eq!(table.len(), 2);
    }
}
