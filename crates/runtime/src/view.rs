use notekeeper_template::{Record, Schema};
use notekeeper_tree::FlatNode;

/// Fields the tree template may use, besides any other names which stay at
/// their marker defaults.
pub const INDENT_FIELD: &str = "indent";
pub const LEVEL_FIELD: &str = "level";
pub const PARENTS_FIELD: &str = "parents";

/// Writes the flattened tree through the tree template, one template
/// instance per row.  `indent` is repeated once per level below the first.
pub fn render_tree(nodes: &[FlatNode], schema: &Schema, indent: &str) -> String {
    let rows: Vec<Record> = nodes
        .iter()
        .map(|node| {
            Record::new()
                .with(INDENT_FIELD, indent.repeat(node.level.saturating_sub(1)))
                .with(LEVEL_FIELD, node.level.to_string())
                .with("name", node.name.as_str())
                .with("text", node.text.as_str())
                .with(PARENTS_FIELD, node.parent_names.clone())
        })
        .collect();
    schema.stringify_all(&rows)
}

#[cfg(test)]
mod tests {
    use notekeeper_template::DEFAULT_TREE_TEMPLATE;

    use super::*;

    fn node(name: &str, level: usize) -> FlatNode {
        FlatNode {
            id: 0,
            name: name.to_string(),
            text: String::new(),
            level,
            parent_names: vec![],
        }
    }

    #[test]
    fn default_template_indents_by_level() {
        let schema = Schema::compile(DEFAULT_TREE_TEMPLATE).unwrap();
        let text = render_tree(
            &[node("go", 1), node("goroutine", 2), node("channels", 3)],
            &schema,
            "  ",
        );
        assert_eq!(text, "- go\n  - goroutine\n    - channels\n");
    }

    #[test]
    fn custom_template_can_show_parents() {
        let schema = Schema::compile("<><level>: <><name> (<><parents>)\n").unwrap();
        let mut child = node("goroutine", 1);
        child.parent_names = vec!["go".to_string(), "concurrency".to_string()];
        assert_eq!(
            render_tree(&[child], &schema, "    "),
            "1: goroutine (go, concurrency)\n"
        );
    }

    #[test]
    fn no_rows_render_nothing() {
        let schema = Schema::compile(DEFAULT_TREE_TEMPLATE).unwrap();
        assert_eq!(render_tree(&[], &schema, "    "), "");
    }
}
