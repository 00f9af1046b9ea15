//! Parent/child adjacency over visible records plus cycle search.
//!
//! Node `n` (one past the last record) is the synthetic root.  Every walk
//! keeps its own explicit stack, so deep or cyclic inputs cannot overflow
//! the call stack and nothing leaks between calls.

use std::collections::HashMap;

#[derive(Debug)]
pub(crate) struct Forest {
    pub parents: Vec<Vec<usize>>,
    pub children: Vec<Vec<usize>>,
}

impl Forest {
    /// `names[i]` and `tags[i]` describe visible node `i`.
    pub fn build(names: &[&str], tags: &[&[String]]) -> Self {
        let count = names.len();

        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (node, name) in names.iter().enumerate() {
            let key = normalize(name);
            if !key.is_empty() {
                by_name.entry(key).or_insert(node);
            }
        }

        let mut parents = vec![Vec::new(); count];
        let mut children = vec![Vec::new(); count + 1];
        for node in 0..count {
            for tag in tags[node] {
                if let Some(&parent) = by_name.get(&normalize(tag)) {
                    if !parents[node].contains(&parent) {
                        parents[node].push(parent);
                    }
                }
            }

            if parents[node].is_empty() {
                children[count].push(node);
            } else {
                for &parent in &parents[node] {
                    children[parent].push(node);
                }
            }
        }

        Self { parents, children }
    }

    pub fn root(&self) -> usize {
        self.parents.len()
    }

    /// First back edge found by a depth-first walk from `start`, returned as
    /// `(victim, offending_parent)`.  `color` carries finished nodes across
    /// walks so each edge is inspected once overall.
    pub fn find_cycle_from(&self, start: usize, color: &mut [Color]) -> Option<(usize, usize)> {
        if color[start] != Color::Unvisited {
            return None;
        }

        let mut stack = vec![Frame {
            node: start,
            next_child: 0,
        }];
        color[start] = Color::OnStack;

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let Some(&child) = self.children[node].get(frame.next_child) else {
                color[node] = Color::Done;
                stack.pop();
                continue;
            };
            frame.next_child += 1;

            match color[child] {
                Color::OnStack => return Some((child, node)),
                Color::Unvisited => {
                    color[child] = Color::OnStack;
                    stack.push(Frame {
                        node: child,
                        next_child: 0,
                    });
                }
                Color::Done => {}
            }
        }
        None
    }

    pub fn sort_children_by<F>(&mut self, mut key: F)
    where
        F: FnMut(usize) -> String,
    {
        let keys: Vec<String> = (0..self.root()).map(&mut key).collect();
        for list in &mut self.children {
            list.sort_by(|&a, &b| keys[a].cmp(&keys[b]).then(a.cmp(&b)));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Unvisited,
    OnStack,
    Done,
}

#[derive(Debug)]
struct Frame {
    node: usize,
    next_child: usize,
}

pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
