//! Strongly connected components via Kosaraju's two-pass search.
//!
//! The adjacency lists are read as directed arcs. Because every stored edge
//! has its mirror, each connected component comes out as one SCC.

use std::fmt;

use super::write_vertex_set;
use crate::{error::Result, graph::Graph};

/// Components in the order the second pass discovered them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentsReport {
    /// Vertices of each component in discovery order.
    pub components: Vec<Vec<usize>>,
}

impl fmt::Display for ComponentsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} Strongly Connected Components:",
            self.components.len()
        )?;
        for (i, component) in self.components.iter().enumerate() {
            write!(f, "SCC {}: ", i + 1)?;
            write_vertex_set(f, component)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterative depth-first search that visits neighbours in list order and
/// reports each vertex on entry and on exit.
fn depth_first<F, E>(
    arcs: &[Vec<usize>],
    root: usize,
    visited: &mut [bool],
    mut on_enter: F,
    mut on_exit: E,
) where
    F: FnMut(usize),
    E: FnMut(usize),
{
    visited[root] = true;
    on_enter(root);
    let mut frames = vec![(root, 0_usize)];
    while let Some(frame) = frames.last_mut() {
        let (vertex, cursor) = *frame;
        match arcs[vertex].get(cursor) {
            Some(&next) => {
                frame.1 += 1;
                if !visited[next] {
                    visited[next] = true;
                    on_enter(next);
                    frames.push((next, 0));
                }
            }
            None => {
                frames.pop();
                on_exit(vertex);
            }
        }
    }
}

/// Computes the strongly connected components of the directed view of
/// `graph`.
///
/// # Errors
/// Propagates [`crate::GraphError`] from adjacency lookups.
pub fn strongly_connected_components(graph: &Graph) -> Result<ComponentsReport> {
    let n = graph.vertex_count();
    let mut forward = Vec::with_capacity(n);
    let mut transpose = vec![Vec::new(); n];
    for u in 0..n {
        let targets: Vec<usize> = graph.neighbours(u)?.iter().map(|nb| nb.vertex).collect();
        for &v in &targets {
            transpose[v].push(u);
        }
        forward.push(targets);
    }

    let mut visited = vec![false; n];
    let mut finish_order = Vec::with_capacity(n);
    for root in 0..n {
        if !visited[root] {
            depth_first(&forward, root, &mut visited, |_| {}, |v| finish_order.push(v));
        }
    }

    visited.fill(false);
    let mut components = Vec::new();
    for &root in finish_order.iter().rev() {
        if !visited[root] {
            let mut component = Vec::new();
            depth_first(&transpose, root, &mut visited, |v| component.push(v), |_| {});
            components.push(component);
        }
    }
    Ok(ComponentsReport { components })
}
