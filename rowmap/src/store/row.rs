use crate::common::Value;
use indexmap::IndexMap;

/// One result row: column names mapped to values, in the order the store returned them.
///
/// Columns whose store type has no [Value] mapping are kept by name only, so a read fails
/// only when a persistent field actually needs one of them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    columns: IndexMap<String, Value>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    unmapped: Vec<String>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            columns: IndexMap::with_capacity(capacity),
            unmapped: Vec::new(),
        }
    }

    /// Sets a column value, keeping the original position of an existing column.
    pub fn put(&mut self, column: &str, value: Value) {
        self.columns.insert(column.to_string(), value);
    }

    /// Looks a column up by exact name, then ignoring ASCII case.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column).or_else(|| {
            self.columns
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
    }

    /// Records a column the store returned with a type that has no [Value] mapping.
    pub fn put_unmapped(&mut self, column: &str) {
        self.unmapped.push(column.to_string());
    }

    /// Whether `column` came back with a type that has no [Value] mapping.
    pub fn is_unmapped(&self, column: &str) -> bool {
        self.unmapped
            .iter()
            .any(|name| name == column || name.eq_ignore_ascii_case(column))
    }

    /// Columns skipped by [put_unmapped](Row::put_unmapped).
    pub fn unmapped_columns(&self) -> impl Iterator<Item = &str> {
        self.unmapped.iter().map(|c| c.as_str())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (S, Value)>>(iter: T) -> Self {
        Row {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            unmapped: Vec::new(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
