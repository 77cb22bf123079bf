//! Cycle detection over nested-record edges.
//!
//! A record that reaches itself through nested fields would need an
//! infinitely deep constructor, so any cycle aborts generation.

use std::collections::HashSet;

use indexmap::IndexMap;

/// Directed edges from each record to the records its fields nest.
#[derive(Debug, Clone, Default)]
pub struct RecordEdges {
    adjacency: IndexMap<String, Vec<String>>,
}

impl RecordEdges {
    /// Creates an empty edge set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `from` nests `to`.
    pub fn add(&mut self, from: &str, to: &str) {
        let targets = self.adjacency.entry(from.to_owned()).or_default();
        if !targets.iter().any(|t| t == to) {
            targets.push(to.to_owned());
        }
    }

    /// Ensures `node` exists even when it nests nothing.
    pub fn touch(&mut self, node: &str) {
        self.adjacency.entry(node.to_owned()).or_default();
    }

    /// Returns the first cycle found, with its first record repeated at the
    /// end, or `None` when the graph is acyclic.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut on_path = HashSet::new();
        let mut path = Vec::new();
        self.adjacency.keys().find_map(|node| {
            if visited.contains(node.as_str()) {
                None
            } else {
                self.visit(node, &mut visited, &mut on_path, &mut path)
            }
        })
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        on_path: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        visited.insert(node);
        on_path.insert(node);
        path.push(node);

        for next in self.adjacency.get(node).into_iter().flatten() {
            let next = next.as_str();
            if on_path.contains(next) {
                let start = path.iter().position(|n| *n == next).unwrap_or_default();
                let mut cycle: Vec<String> = path
                    .iter()
                    .skip(start)
                    .map(|n| (*n).to_owned())
                    .collect();
                cycle.push(next.to_owned());
                return Some(cycle);
            }
            if !visited.contains(next)
                && let Some(cycle) = self.visit(next, visited, on_path, path)
            {
                return Some(cycle);
            }
        }

        path.pop();
        on_path.remove(node);
        None
    }
}
