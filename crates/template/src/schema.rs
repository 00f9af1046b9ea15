use std::collections::HashSet;

use tracing::debug;

use crate::error::TemplateError;
use crate::marker::{FieldSpec, LineMode, Token, tokenize};
use crate::matcher;
use crate::record::{ParseResult, Record};

/// A field together with the literal text that follows it in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub field: FieldSpec,
    pub trailing: String,
}

/// Compiled template: the field list plus the literal skeleton around it.
///
/// The same schema both parses text into records and writes records back
/// with the template's exact framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    source: String,
    lead: String,
    segments: Vec<Segment>,
}

impl Schema {
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let mut lead = String::new();
        let mut segments: Vec<Segment> = Vec::new();

        for token in tokenize(template)? {
            match token {
                Token::Literal(text) => match segments.last_mut() {
                    Some(segment) => segment.trailing.push_str(&text),
                    None => lead.push_str(&text),
                },
                Token::Field(field) => segments.push(Segment {
                    field,
                    trailing: String::new(),
                }),
            }
        }

        if segments.is_empty() {
            return Err(TemplateError::NoFields);
        }

        let mut seen = HashSet::new();
        for segment in &segments {
            if !seen.insert(segment.field.name.as_str()) {
                return Err(TemplateError::DuplicateField(segment.field.name.clone()));
            }
        }

        for pair in segments.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            if !left.trailing.is_empty() {
                continue;
            }
            if left.field.mode == LineMode::Multi {
                return Err(TemplateError::AmbiguousMultiline {
                    field: left.field.name.clone(),
                    neighbour: right.field.name.clone(),
                });
            }
            if right.field.mode == LineMode::Multi {
                return Err(TemplateError::AmbiguousMultiline {
                    field: right.field.name.clone(),
                    neighbour: left.field.name.clone(),
                });
            }
        }

        debug!(
            fields = segments.len(),
            terminator = ?segments.last().map(|s| s.trailing.as_str()),
            "template compiled"
        );

        Ok(Self {
            source: template.to_string(),
            lead,
            segments,
        })
    }

    /// The template text this schema was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn lead(&self) -> &str {
        &self.lead
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| segment.field.name.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_names().any(|field| field == name)
    }

    /// Literal text closing every record; doubles as the record separator.
    pub fn terminator(&self) -> &str {
        self.segments
            .last()
            .map(|segment| segment.trailing.as_str())
            .unwrap_or_default()
    }

    /// A record holding every field's inline default.
    pub fn defaults(&self) -> Record {
        self.segments.iter().fold(Record::new(), |record, segment| {
            record.with(segment.field.name.clone(), segment.field.default.clone())
        })
    }

    /// Keeps only the fields this schema knows about.
    pub fn project(&self, record: &Record) -> Record {
        let mut projected = Record::new();
        for name in self.field_names() {
            if let Some(value) = record.get(name) {
                projected.set(name, value.clone());
            }
        }
        projected
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        ParseResult::from_records(matcher::parse_records(self, text))
    }

    /// Writes one record into the template skeleton.  Absent fields fall
    /// back to their inline default.
    pub fn stringify(&self, record: &Record) -> String {
        let mut out = String::with_capacity(self.source.len());
        out.push_str(&self.lead);
        for segment in &self.segments {
            match record.get(&segment.field.name) {
                Some(value) => out.push_str(&value.render()),
                None => out.push_str(&segment.field.default),
            }
            out.push_str(&segment.trailing);
        }
        out
    }

    /// Concatenates [`Schema::stringify`] for every record.  The template's
    /// own terminator is the only separator.
    pub fn stringify_all(&self, records: &[Record]) -> String {
        records.iter().map(|record| self.stringify(record)).collect()
    }
}
