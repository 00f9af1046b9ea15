/// A command typed into the interface's command field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank command line: re-render only.
    Empty,
    Add {
        name: Option<String>,
        tags: Vec<String>,
    },
    Edit {
        name: Option<String>,
    },
    Delete {
        name: Option<String>,
    },
    Mix,
    Clear,
    Tree {
        root: Option<String>,
    },
    /// `load` or `switch`.  No alias means the primary base.
    Load {
        alias: Option<String>,
    },
    Exit,
    Unknown(String),
}

impl Command {
    /// Parses the first line of `field`; later lines hold the previous
    /// message and are ignored.  The keyword is case-insensitive.
    pub fn parse(field: &str) -> Self {
        let line = command_line(field);
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Self::Empty;
        };
        let rest: Vec<&str> = words.collect();
        let joined = (!rest.is_empty()).then(|| rest.join(" "));

        match keyword.to_lowercase().as_str() {
            "add" => Self::Add {
                name: rest.first().map(|name| name.to_string()),
                tags: rest.iter().skip(1).map(|tag| tag.to_string()).collect(),
            },
            "edit" => Self::Edit { name: joined },
            "del" => Self::Delete { name: joined },
            "mix" => Self::Mix,
            "clr" => Self::Clear,
            "tree" => Self::Tree { root: joined },
            "load" | "switch" => Self::Load { alias: joined },
            "exit" => Self::Exit,
            _ => Self::Unknown(keyword.to_string()),
        }
    }

    /// The keyword this command is written back as.
    pub fn keyword(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "del",
            Self::Mix => "mix",
            Self::Clear => "clr",
            Self::Tree { .. } => "tree",
            Self::Load { .. } => "load",
            Self::Exit => "exit",
            Self::Unknown(token) => token,
        }
    }
}

/// First line of the command field, trimmed.
pub fn command_line(field: &str) -> &str {
    field.lines().next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_is_empty_command() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   \nOLD MESSAGE"), Command::Empty);
    }

    #[test]
    fn add_takes_name_then_tags() {
        assert_eq!(
            Command::parse("add newname sometag other"),
            Command::Add {
                name: Some("newname".to_string()),
                tags: vec!["sometag".to_string(), "other".to_string()],
            }
        );
        assert_eq!(
            Command::parse("ADD"),
            Command::Add {
                name: None,
                tags: vec![],
            }
        );
    }

    #[test]
    fn only_first_line_counts() {
        assert_eq!(
            Command::parse("mix\nA RECORD NAMED \"x\"\nALREADY EXISTS."),
            Command::Mix
        );
    }

    #[test]
    fn arguments_keep_inner_spaces() {
        assert_eq!(
            Command::parse("tree  rust   notes "),
            Command::Tree {
                root: Some("rust notes".to_string())
            }
        );
        assert_eq!(
            Command::parse("del old note"),
            Command::Delete {
                name: Some("old note".to_string())
            }
        );
    }

    #[test]
    fn load_and_switch_are_synonyms() {
        let expected = Command::Load {
            alias: Some("work".to_string()),
        };
        assert_eq!(Command::parse("load work"), expected);
        assert_eq!(Command::parse("Switch work"), expected);
        assert_eq!(Command::parse("switch"), Command::Load { alias: None });
    }

    #[test]
    fn unknown_keyword_is_kept() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Command::Unknown("frobnicate".to_string())
        );
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("clr"), Command::Clear);
    }
}
