use std::collections::BTreeMap;

/// Separator used when a list value is written into a template slot.
pub const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Text as it appears between the template's literal boundaries.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(LIST_SEPARATOR),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// One parsed or to-be-serialized record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Rendered value of `name`, or an empty string when the field is absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(FieldValue::render).unwrap_or_default()
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of parsing text against a schema.
///
/// `Empty` means the text does not conform to the schema at all, which is
/// how a corrupted interface file is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Empty,
    One(Record),
    Many(Vec<Record>),
}

impl ParseResult {
    pub fn from_records(mut records: Vec<Record>) -> Self {
        match records.len() {
            0 => Self::Empty,
            1 => Self::One(records.remove(0)),
            _ => Self::Many(records),
        }
    }

    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_values_render_comma_separated() {
        let value = FieldValue::List(vec!["rust".into(), "notes".into()]);
        assert_eq!(value.render(), "rust, notes");
    }

    #[test]
    fn missing_field_reads_as_empty_text() {
        let record = Record::new().with("name", "go");
        assert_eq!(record.text("name"), "go");
        assert_eq!(record.text("tags"), "");
        assert!(!record.contains("tags"));
    }

    #[test]
    fn parse_result_cardinality() {
        assert_eq!(ParseResult::from_records(vec![]), ParseResult::Empty);

        let one = ParseResult::from_records(vec![Record::new().with("a", "1")]);
        assert!(matches!(one, ParseResult::One(_)));
        assert_eq!(one.len(), 1);

        let many = ParseResult::from_records(vec![Record::new(), Record::new()]);
        assert!(matches!(many, ParseResult::Many(ref records) if records.len() == 2));
        assert_eq!(many.into_vec().len(), 2);
    }
}
