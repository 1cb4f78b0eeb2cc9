use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered string map for per-file annotations.
///
/// Insertion order is preserved and keys are locked once written: a second
/// insert for an existing key is refused and the first value stays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraMetadata {
    entries: Vec<(String, String)>,
}

impl ExtraMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Returns `false` if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Merge `other` into `self`, keeping existing values on key collisions.
    /// Returns the keys from `other` that were refused.
    pub fn merge(&mut self, other: &ExtraMetadata) -> Vec<String> {
        let mut refused = Vec::new();
        for (key, value) in other.iter() {
            if !self.insert(key, value) {
                refused.push(key.to_string());
            }
        }
        refused
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ExtraMetadata::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for ExtraMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Descriptor of one uploaded file as declared by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    filename: String,
    size: u64,
    mime_type: String,
    extra: ExtraMetadata,
}

impl Metadata {
    pub fn new(filename: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size,
            mime_type: mime_type.into(),
            extra: ExtraMetadata::new(),
        }
    }

    /// Copy of this descriptor carrying the given annotations.
    pub fn with_extra(&self, extra: ExtraMetadata) -> Self {
        Self {
            filename: self.filename.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
            extra,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn extra(&self) -> &ExtraMetadata {
        &self.extra
    }

    /// Lowercased extension of the client filename, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_locks_keys() {
        let mut extra = ExtraMetadata::new();
        assert!(extra.insert("b", "1"));
        assert!(extra.insert("a", "2"));
        assert!(!extra.insert("b", "3"));

        assert_eq!(extra.get("b"), Some("1"));
        assert_eq!(extra.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(extra.len(), 2);
    }

    #[test]
    fn merge_reports_refused_keys() {
        let mut base: ExtraMetadata = [("checksum", "abc")].into_iter().collect();
        let incoming: ExtraMetadata = [("checksum", "zzz"), ("detected", "image/png")]
            .into_iter()
            .collect();

        let refused = base.merge(&incoming);

        assert_eq!(refused, vec!["checksum".to_string()]);
        assert_eq!(base.get("checksum"), Some("abc"));
        assert_eq!(base.get("detected"), Some("image/png"));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let extra: ExtraMetadata = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&extra).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn with_extra_leaves_original_untouched() {
        let metadata = Metadata::new("Report.PDF", 42, "application/pdf");
        let annotated = metadata.with_extra([("pages", "3")].into_iter().collect());

        assert!(metadata.extra().is_empty());
        assert_eq!(annotated.extra().get("pages"), Some("3"));
        assert_eq!(annotated.filename(), "Report.PDF");
        assert_eq!(metadata.extension().as_deref(), Some("pdf"));
    }
}
