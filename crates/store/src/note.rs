use notekeeper_template::{FieldValue, Record};

use crate::merge::prettify_list;

pub const NAME_FIELD: &str = "name";
pub const TAGS_FIELD: &str = "tags";
pub const TEXT_FIELD: &str = "text";

/// One base entry.
///
/// Fields a custom base template defines beyond name, tags and text are kept
/// in `extra` so they survive a rewrite of the base file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub name: String,
    pub tags: Vec<String>,
    pub text: String,
    pub extra: Record,
}

impl Note {
    pub fn new(name: impl Into<String>, tags: Vec<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            text: text.into(),
            extra: Record::new(),
        }
    }

    pub fn from_record(record: &Record) -> Self {
        let tags = match record.get(TAGS_FIELD) {
            Some(FieldValue::List(items)) => prettify_list(&items.join(",")),
            Some(FieldValue::Text(line)) => prettify_list(line),
            None => Vec::new(),
        };

        let mut extra = record.clone();
        for field in [NAME_FIELD, TAGS_FIELD, TEXT_FIELD] {
            extra.remove(field);
        }

        Self {
            name: record.text(NAME_FIELD),
            tags,
            text: record.text(TEXT_FIELD),
            extra,
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = self.extra.clone();
        record.set(NAME_FIELD, self.name.as_str());
        record.set(TAGS_FIELD, self.tags.clone());
        record.set(TEXT_FIELD, self.text.as_str());
        record
    }

    /// Key used for name lookups.  `None` for a blank name, which never
    /// matches anything.
    pub fn lookup_key(&self) -> Option<String> {
        name_key(&self.name)
    }
}

pub(crate) fn name_key(name: &str) -> Option<String> {
    let key = name.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tags_are_split_and_trimmed() {
        let record = Record::new()
            .with("name", "go")
            .with("tags", " lang,  google ,")
            .with("text", "body");
        let note = Note::from_record(&record);
        assert_eq!(note.tags, vec!["lang".to_string(), "google".to_string()]);
        assert_eq!(note.text, "body");
        assert!(note.extra.is_empty());
    }

    #[test]
    fn extra_fields_survive_conversion() {
        let record = Record::new()
            .with("name", "go")
            .with("created", "2020-01-01");
        let back = Note::from_record(&record).to_record();
        assert_eq!(back.text("created"), "2020-01-01");
        assert_eq!(back.text("tags"), "");
    }

    #[test]
    fn blank_names_have_no_key() {
        assert_eq!(Note::new("  ", vec![], "x").lookup_key(), None);
        assert_eq!(Note::new(" FOO ", vec![], "x").lookup_key(), Some("foo".into()));
    }
}
