//! Template tokenizer.
//!
//! Turns template text into a flat list of literal and field tokens.  Field
//! markers look like `<>DEFAULT<name>` (single-line) or `<m>DEFAULT<name>`
//! (multi-line); any other `<` is ordinary literal text.

use crate::error::TemplateError;

const SINGLE_OPENER: &str = "<>";
const MULTI_OPENER: &str = "<m>";

/// How much text a field is allowed to swallow when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Shortest run up to the next literal boundary.
    Single,
    /// Longest run up to the next literal boundary, newlines included.
    Multi,
}

impl LineMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "single-line",
            Self::Multi => "multi-line",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub mode: LineMode,
    /// Text between the opener and the name tag.
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Field(FieldSpec),
}

pub fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut cursor = 0;

    while cursor < template.len() {
        let Some(found) = template[cursor..].find('<') else {
            literal.push_str(&template[cursor..]);
            break;
        };
        let at = cursor + found;
        literal.push_str(&template[cursor..at]);

        let rest = &template[at..];
        let (mode, opener_len) = if rest.starts_with(SINGLE_OPENER) {
            (LineMode::Single, SINGLE_OPENER.len())
        } else if rest.starts_with(MULTI_OPENER) {
            (LineMode::Multi, MULTI_OPENER.len())
        } else {
            literal.push('<');
            cursor = at + 1;
            continue;
        };

        let (field, end) = read_field(template, at, at + opener_len, mode)?;
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Field(field));
        cursor = end;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Reads `DEFAULT<name>` starting right after an opener.  Returns the field
/// and the byte offset just past the closing `>`.
fn read_field(
    template: &str,
    marker_at: usize,
    default_start: usize,
    mode: LineMode,
) -> Result<(FieldSpec, usize), TemplateError> {
    let unterminated = TemplateError::UnterminatedMarker { offset: marker_at };

    let name_open = template[default_start..]
        .find('<')
        .map(|i| default_start + i)
        .ok_or_else(|| unterminated.clone())?;
    let name_start = name_open + 1;
    let name_close = template[name_start..]
        .find('>')
        .map(|i| name_start + i)
        .ok_or(unterminated)?;

    let name = &template[name_start..name_close];
    if name.is_empty() {
        return Err(TemplateError::EmptyFieldName { offset: marker_at });
    }
    if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(TemplateError::InvalidFieldName {
            name: name.to_string(),
            offset: marker_at,
        });
    }

    let field = FieldSpec {
        name: name.to_string(),
        mode,
        default: template[default_start..name_open].to_string(),
    };
    Ok((field, name_close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, mode: LineMode, default: &str) -> Token {
        Token::Field(FieldSpec {
            name: name.to_string(),
            mode,
            default: default.to_string(),
        })
    }

    #[test]
    fn splits_literals_and_fields() {
        let tokens = tokenize("<><name>\n<m><text>\n===\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                field("name", LineMode::Single, ""),
                Token::Literal("\n".to_string()),
                field("text", LineMode::Multi, ""),
                Token::Literal("\n===\n".to_string()),
            ]
        );
    }

    #[test]
    fn captures_inline_defaults() {
        let tokens = tokenize("cmd: <m>add<command>\n<>any tag<tags_used>").unwrap();
        assert_eq!(tokens[1], field("command", LineMode::Multi, "add"));
        assert_eq!(tokens[3], field("tags_used", LineMode::Single, "any tag"));
    }

    #[test]
    fn other_angle_brackets_are_literal() {
        let tokens = tokenize("<b> and <p>\n<><x>").unwrap();
        assert_eq!(tokens[0], Token::Literal("<b> and <p>\n".to_string()));
        assert_eq!(tokens[1], field("x", LineMode::Single, ""));
    }

    #[test]
    fn unclosed_marker_is_rejected() {
        assert_eq!(
            tokenize("head\n<>default without name"),
            Err(TemplateError::UnterminatedMarker { offset: 5 })
        );
        assert_eq!(
            tokenize("<m><text"),
            Err(TemplateError::UnterminatedMarker { offset: 0 })
        );
    }

    #[test]
    fn empty_and_invalid_names_are_rejected() {
        assert_eq!(
            tokenize("<><>"),
            Err(TemplateError::EmptyFieldName { offset: 0 })
        );
        assert!(matches!(
            tokenize("<><bad name>"),
            Err(TemplateError::InvalidFieldName { .. })
        ));
    }
}
