//! Structured report types.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Fields of one report section, keyed by normalized field name.
///
/// Keys are unique. The first value recorded for a key is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Section {
    fields: BTreeMap<String, String>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by its normalized name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether the section holds a field with this normalized name.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the section has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record a field unless the key is already present.
    ///
    /// Returns `false` when the key existed and the value was discarded.
    pub(crate) fn insert_first(&mut self, key: String, value: String) -> bool {
        match self.fields.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Consume the section into its underlying map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A structured MediaInfo report: section name to [`Section`].
///
/// Section names are kept exactly as they appeared in the report
/// (`General`, `Video`, `Audio #2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Info {
    sections: BTreeMap<String, Section>,
}

impl Info {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Look up a field value by section name and normalized key.
    ///
    /// ```
    /// let info = mediatab_report::structure("Video\nFrame/Rate,29.970\n").unwrap();
    /// assert_eq!(info.get("Video", "Frame_Rate"), Some("29.970"));
    /// ```
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Iterate over sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the report produced no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Start a section, discarding anything previously recorded under the name.
    pub(crate) fn reset_section(&mut self, name: &str) {
        self.sections.insert(name.to_string(), Section::new());
    }

    /// Get a section for writing, creating it if needed.
    pub(crate) fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Consume into plain nested maps.
    pub fn into_map(self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.sections
            .into_iter()
            .map(|(name, section)| (name, section.into_map()))
            .collect()
    }
}

impl From<Info> for BTreeMap<String, BTreeMap<String, String>> {
    fn from(info: Info) -> Self {
        info.into_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_first_keeps_existing() {
        let mut section = Section::new();
        assert!(section.insert_first("Format".into(), "AVC".into()));
        assert!(!section.insert_first("Format".into(), "HEVC".into()));
        assert_eq!(section.get("Format"), Some("AVC"));
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn test_reset_section_clears_fields() {
        let mut info = Info::new();
        info.section_mut("Video")
            .insert_first("Width".into(), "1920".into());
        info.reset_section("Video");
        assert!(info.section("Video").is_some_and(Section::is_empty));
    }

    #[test]
    fn test_into_map() {
        let mut info = Info::new();
        info.section_mut("General")
            .insert_first("Format".into(), "MPEG-4".into());
        let map = info.into_map();
        assert_eq!(map["General"]["Format"], "MPEG-4");
    }
}
