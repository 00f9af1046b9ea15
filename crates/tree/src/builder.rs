use tracing::{debug, warn};

use crate::error::TreeError;
use crate::graph::{Color, Forest, normalize};

/// Borrowed view of one record, the only data the builder needs.
#[derive(Debug, Clone, Copy)]
pub struct TreeItem<'a> {
    pub name: &'a str,
    pub tags: &'a [String],
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Treat records whose text is blank as absent.  Records that name such
    /// a record as parent fall back to the root.
    pub skip_empty_text: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            skip_empty_text: true,
        }
    }
}

/// One row of the flattened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Index of the record in the slice given to [`build_tree`].
    pub id: usize,
    pub name: String,
    pub text: String,
    /// 1 for top-level rows.
    pub level: usize,
    /// Names of the records this one resolved as parents.
    pub parent_names: Vec<String>,
}

/// Builds the flattened tree view of `items`.
///
/// Children are ordered by trimmed name (case-sensitive byte order, ties by
/// input position) and emitted depth-first, parent before children.  A
/// record with several parents appears once under each of them.  With
/// `root` set, the walk starts at that record, which is emitted at level 1.
///
/// A record goes under the top level only when none of its tags name a
/// visible record; unresolved tags next to resolved ones add no top-level
/// row.  Older notekeeper releases listed such a record at the top once per
/// unresolved tag.
pub fn build_tree(
    items: &[TreeItem<'_>],
    root: Option<&str>,
    options: &TreeOptions,
) -> Result<Vec<FlatNode>, TreeError> {
    let visible: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !options.skip_empty_text || !item.text.trim().is_empty())
        .map(|(id, _)| id)
        .collect();

    if visible.is_empty() {
        return Ok(Vec::new());
    }

    let names: Vec<&str> = visible.iter().map(|&id| items[id].name).collect();
    let tags: Vec<&[String]> = visible.iter().map(|&id| items[id].tags).collect();
    let mut forest = Forest::build(&names, &tags);

    let mut color = vec![Color::Unvisited; visible.len() + 1];
    if let Some(cycle) = forest.find_cycle_from(forest.root(), &mut color) {
        return Err(circular(items, &visible, cycle));
    }
    if forest.children[forest.root()].is_empty() {
        warn!(records = visible.len(), "no root records found");
        return Err(TreeError::NoRoot);
    }
    // Records the root never reached hang below a cycle of their own.
    for node in 0..visible.len() {
        if let Some(cycle) = forest.find_cycle_from(node, &mut color) {
            return Err(circular(items, &visible, cycle));
        }
    }

    let start = match root {
        Some(wanted) => {
            let key = normalize(wanted);
            let node = names
                .iter()
                .position(|name| !key.is_empty() && normalize(name) == key)
                .ok_or_else(|| TreeError::UnknownRoot(wanted.trim().to_string()))?;
            Some(node)
        }
        None => None,
    };

    forest.sort_children_by(|node| names[node].trim().to_string());
    let flat = flatten(&forest, items, &visible, start);

    debug!(
        records = items.len(),
        visible = visible.len(),
        rows = flat.len(),
        root = root.unwrap_or("<all>"),
        "tree flattened"
    );
    Ok(flat)
}

fn circular(
    items: &[TreeItem<'_>],
    visible: &[usize],
    (victim, parent): (usize, usize),
) -> TreeError {
    let victim_id = visible[victim];
    let error = TreeError::Circular {
        victim: victim_id,
        victim_name: items[victim_id].name.trim().to_string(),
        offending_parent: items[visible[parent]].name.trim().to_string(),
    };
    warn!(%error, "circular reference found");
    error
}

fn flatten(
    forest: &Forest,
    items: &[TreeItem<'_>],
    visible: &[usize],
    start: Option<usize>,
) -> Vec<FlatNode> {
    let row = |node: usize, level: usize| {
        let item = &items[visible[node]];
        FlatNode {
            id: visible[node],
            name: item.name.trim().to_string(),
            text: item.text.to_string(),
            level,
            parent_names: forest.parents[node]
                .iter()
                .map(|&parent| items[visible[parent]].name.trim().to_string())
                .collect(),
        }
    };

    let mut rows = Vec::new();
    let (first, first_level) = match start {
        Some(node) => {
            rows.push(row(node, 1));
            (node, 2)
        }
        None => (forest.root(), 1),
    };

    let mut stack: Vec<(usize, usize)> = forest.children[first]
        .iter()
        .rev()
        .map(|&child| (child, first_level))
        .collect();

    while let Some((node, level)) = stack.pop() {
        rows.push(row(node, level));
        stack.extend(
            forest.children[node]
                .iter()
                .rev()
                .map(|&child| (child, level + 1)),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec {
        name: &'static str,
        tags: Vec<String>,
        text: &'static str,
    }

    fn rec(name: &'static str, tags: &[&str], text: &'static str) -> Rec {
        Rec {
            name,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            text,
        }
    }

    fn items(records: &[Rec]) -> Vec<TreeItem<'_>> {
        records
            .iter()
            .map(|r| TreeItem {
                name: r.name,
                tags: &r.tags,
                text: r.text,
            })
            .collect()
    }

    fn outline(rows: &[FlatNode]) -> Vec<(String, usize)> {
        rows.iter().map(|row| (row.name.clone(), row.level)).collect()
    }

    fn pairs(list: &[(&str, usize)]) -> Vec<(String, usize)> {
        list.iter().map(|(name, level)| (name.to_string(), *level)).collect()
    }

    #[test]
    fn parent_and_child_scenario() {
        let base = [
            rec("go", &[], "lang"),
            rec("goroutine", &["go"], "concurrency primitive"),
        ];
        let rows = build_tree(&items(&base), None, &TreeOptions::default()).unwrap();
        assert_eq!(outline(&rows), pairs(&[("go", 1), ("goroutine", 2)]));
        assert_eq!(rows[1].id, 1);
        assert_eq!(rows[1].parent_names, vec!["go".to_string()]);
    }

    #[test]
    fn siblings_sorted_and_subtrees_kept_together() {
        let base = [
            rec("root", &[], "r"),
            rec("C", &["root"], "c"),
            rec("A", &["root"], "a"),
            rec("B", &["root"], "b"),
            rec("A2", &["a"], "under a"),
            rec("A1", &["A"], "under a"),
        ];
        let rows = build_tree(&items(&base), None, &TreeOptions::default()).unwrap();
        assert_eq!(
            outline(&rows),
            pairs(&[
                ("root", 1),
                ("A", 2),
                ("A1", 3),
                ("A2", 3),
                ("B", 2),
                ("C", 2),
            ])
        );
    }

    #[test]
    fn sort_is_case_sensitive() {
        let base = [rec("b", &[], "x"), rec("B", &[], "x"), rec("a", &[], "x")];
        let rows = build_tree(&items(&base), None, &TreeOptions::default()).unwrap();
        assert_eq!(outline(&rows), pairs(&[("B", 1), ("a", 1), ("b", 1)]));
    }

    #[test]
    fn multi_parent_record_appears_under_each_parent() {
        let base = [
            rec("rust", &[], "lang"),
            rec("go", &[], "lang"),
            rec("channels", &["Rust", "GO"], "message passing"),
        ];
        let rows = build_tree(&items(&base), None, &TreeOptions::default()).unwrap();
        assert_eq!(
            outline(&rows),
            pairs(&[("go", 1), ("channels", 2), ("rust", 1), ("channels", 2)])
        );
    }

    #[test]
    fn mutual_reference_below_root_is_circular() {
        let base = [
            rec("notes", &[], "top"),
            rec("A", &["B"], "a"),
            rec("B", &["A"], "b"),
        ];
        let err = build_tree(&items(&base), None, &TreeOptions::default()).unwrap_err();
        let TreeError::Circular {
            victim,
            victim_name,
            offending_parent,
        } = err
        else {
            panic!("expected circular error");
        };
        let mut pair = [victim_name.clone(), offending_parent];
        pair.sort();
        assert_eq!(pair, ["A".to_string(), "B".to_string()]);
        assert_eq!(base[victim].name, victim_name);
    }

    #[test]
    fn cycle_reachable_from_root_names_entry_and_parent() {
        let base = [
            rec("top", &[], "t"),
            rec("a", &["top", "c"], "a"),
            rec("b", &["a"], "b"),
            rec("c", &["b"], "c"),
        ];
        let err = build_tree(&items(&base), None, &TreeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            TreeError::Circular {
                victim: 1,
                victim_name: "a".to_string(),
                offending_parent: "c".to_string(),
            }
        );
    }

    #[test]
    fn everything_cyclic_means_no_root() {
        let base = [rec("A", &["B"], "a"), rec("B", &["A"], "b")];
        assert_eq!(
            build_tree(&items(&base), None, &TreeOptions::default()),
            Err(TreeError::NoRoot)
        );
    }

    #[test]
    fn blank_text_records_are_skipped_and_children_orphaned() {
        let base = [
            rec("folder", &[], "   \n"),
            rec("child", &["folder"], "content"),
        ];
        let rows = build_tree(&items(&base), None, &TreeOptions::default()).unwrap();
        assert_eq!(outline(&rows), pairs(&[("child", 1)]));
        assert!(rows[0].parent_names.is_empty());
    }

    #[test]
    fn blank_text_records_kept_when_option_disabled() {
        let base = [rec("folder", &[], ""), rec("child", &["folder"], "content")];
        let options = TreeOptions {
            skip_empty_text: false,
        };
        let rows = build_tree(&items(&base), None, &options).unwrap();
        assert_eq!(outline(&rows), pairs(&[("folder", 1), ("child", 2)]));
    }

    #[test]
    fn rooted_walk_starts_at_named_record() {
        let base = [
            rec("lang", &[], "languages"),
            rec("go", &["lang"], "go"),
            rec("goroutine", &["go"], "green thread"),
            rec("rust", &["lang"], "rust"),
        ];
        let rows = build_tree(&items(&base), Some(" GO "), &TreeOptions::default()).unwrap();
        assert_eq!(outline(&rows), pairs(&[("go", 1), ("goroutine", 2)]));
        assert_eq!(rows[0].parent_names, vec!["lang".to_string()]);
    }

    #[test]
    fn unknown_root_is_reported() {
        let base = [rec("lang", &[], "languages")];
        assert_eq!(
            build_tree(&items(&base), Some("python"), &TreeOptions::default()),
            Err(TreeError::UnknownRoot("python".to_string()))
        );
    }

    #[test]
    fn empty_input_gives_empty_view() {
        assert_eq!(build_tree(&[], None, &TreeOptions::default()), Ok(Vec::new()));
        let base = [rec("blank", &[], "")];
        assert_eq!(
            build_tree(&items(&base), None, &TreeOptions::default()),
            Ok(Vec::new())
        );
    }

    #[test]
    fn repeated_calls_are_independent() {
        let cyclic = [
            rec("top", &[], "t"),
            rec("x", &["y"], "x"),
            rec("y", &["x"], "y"),
        ];
        let fine = [rec("top", &[], "t"), rec("x", &["top"], "x")];
        assert!(build_tree(&items(&cyclic), None, &TreeOptions::default()).is_err());
        let rows = build_tree(&items(&fine), None, &TreeOptions::default()).unwrap();
        assert_eq!(outline(&rows), pairs(&[("top", 1), ("x", 2)]));
    }
}
