//! Maximum clique via Bron-Kerbosch with Tomita pivoting.
//!
//! Candidate and excluded sets are bitsets over vertex ids. A branch is cut
//! when a greedy colouring of its candidates shows it cannot beat the best
//! clique so far, and the search stops after [`CLIQUE_BRANCH_BUDGET`]
//! expansions.

use std::fmt;

use tracing::warn;

use super::write_vertex_set;
use crate::{error::Result, graph::Graph};

/// Most search nodes a single [`max_clique`] call expands.
pub const CLIQUE_BRANCH_BUDGET: usize = 200_000;

/// Largest clique found, with its vertices in ascending order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CliqueReport {
    /// Clique members.
    pub vertices: Vec<usize>,
    /// `false` when the branch budget ran out before the search finished.
    pub exhaustive: bool,
}

impl fmt::Display for CliqueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Max Clique Size: {}", self.vertices.len())?;
        f.write_str("Max Clique Vertices: ")?;
        write_vertex_set(f, &self.vertices)?;
        if !self.exhaustive {
            write!(
                f,
                "\nSearch stopped after {CLIQUE_BRANCH_BUDGET} branches; a larger clique may exist"
            )?;
        }
        Ok(())
    }
}

const WORD_BITS: usize = 64;
const WORD_SHIFT: u32 = 6;
const BIT_MASK: usize = WORD_BITS - 1;

#[derive(Clone, Debug, Eq, PartialEq)]
struct VertexSet {
    words: Vec<u64>,
}

impl VertexSet {
    fn empty(universe: usize) -> Self {
        Self {
            words: vec![0; universe.div_ceil(WORD_BITS)],
        }
    }

    fn full(universe: usize) -> Self {
        let mut set = Self::empty(universe);
        for v in 0..universe {
            set.insert(v);
        }
        set
    }

    fn insert(&mut self, v: usize) {
        if let Some(word) = self.words.get_mut(v >> WORD_SHIFT) {
            *word |= 1_u64 << (v & BIT_MASK);
        }
    }

    fn remove(&mut self, v: usize) {
        if let Some(word) = self.words.get_mut(v >> WORD_SHIFT) {
            *word &= !(1_u64 << (v & BIT_MASK));
        }
    }

    fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    fn intersection(&self, other: &Self) -> Self {
        Self {
            words: self.words.iter().zip(&other.words).map(|(a, b)| a & b).collect(),
        }
    }

    fn difference(&self, other: &Self) -> Self {
        Self {
            words: self.words.iter().zip(&other.words).map(|(a, b)| a & !b).collect(),
        }
    }

    fn intersection_len(&self, other: &Self) -> u32 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones())
            .sum()
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((index << WORD_SHIFT) | bit)
            })
        })
    }
}

struct Search {
    adjacency: Vec<VertexSet>,
    best: Vec<usize>,
    branches: usize,
    truncated: bool,
}

impl Search {
    fn new(graph: &Graph) -> Result<Self> {
        let universe = graph.vertex_count();
        let mut adjacency = Vec::with_capacity(universe);
        for v in 0..universe {
            let mut set = VertexSet::empty(universe);
            for neighbour in graph.neighbours(v)? {
                set.insert(neighbour.vertex);
            }
            adjacency.push(set);
        }
        Ok(Self {
            adjacency,
            best: Vec::new(),
            branches: 0,
            truncated: false,
        })
    }

    // Vertex of either set with the most neighbours among the candidates.
    fn pivot(&self, candidates: &VertexSet, excluded: &VertexSet) -> Option<usize> {
        candidates
            .iter()
            .chain(excluded.iter())
            .max_by_key(|&u| {
                self.adjacency
                    .get(u)
                    .map_or(0, |adj| candidates.intersection_len(adj))
            })
    }

    // Colour classes of a greedy colouring; a clique takes at most one
    // vertex from each.
    fn colour_bound(&self, candidates: &VertexSet) -> usize {
        let mut uncoloured = candidates.clone();
        let mut colours = 0;
        while !uncoloured.is_empty() {
            colours += 1;
            let mut available = uncoloured.clone();
            while let Some(v) = available.first() {
                available.remove(v);
                uncoloured.remove(v);
                if let Some(adj) = self.adjacency.get(v) {
                    available = available.difference(adj);
                }
            }
        }
        colours
    }

    // Recursion depth is bounded by the size of the largest clique.
    fn expand(
        &mut self,
        clique: &mut Vec<usize>,
        mut candidates: VertexSet,
        mut excluded: VertexSet,
    ) {
        if candidates.is_empty() {
            if excluded.is_empty() && clique.len() > self.best.len() {
                self.best.clone_from(clique);
            }
            return;
        }
        if clique.len() + self.colour_bound(&candidates) <= self.best.len() {
            return;
        }
        if self.branches >= CLIQUE_BRANCH_BUDGET {
            self.truncated = true;
            return;
        }
        self.branches += 1;

        let branch = match self
            .pivot(&candidates, &excluded)
            .and_then(|u| self.adjacency.get(u))
        {
            Some(adj) => candidates.difference(adj),
            None => candidates.clone(),
        };
        for v in branch.iter() {
            let Some(adj) = self.adjacency.get(v) else {
                continue;
            };
            let next_candidates = candidates.intersection(adj);
            let next_excluded = excluded.intersection(adj);
            clique.push(v);
            self.expand(clique, next_candidates, next_excluded);
            clique.pop();
            candidates.remove(v);
            excluded.insert(v);
        }
    }
}

/// Finds a clique of maximum size.
///
/// Ties are broken by search order. When [`CLIQUE_BRANCH_BUDGET`] runs out
/// the largest clique seen so far is returned with `exhaustive` unset.
///
/// # Errors
/// Propagates [`crate::GraphError`] from adjacency lookups.
pub fn max_clique(graph: &Graph) -> Result<CliqueReport> {
    let mut search = Search::new(graph)?;
    let universe = graph.vertex_count();
    search.expand(
        &mut Vec::new(),
        VertexSet::full(universe),
        VertexSet::empty(universe),
    );
    let exhaustive = !search.truncated;
    if search.truncated {
        warn!(
            budget = CLIQUE_BRANCH_BUDGET,
            found = search.best.len(),
            "clique search stopped at branch budget"
        );
    }
    let mut vertices = search.best;
    vertices.sort_unstable();
    Ok(CliqueReport {
        vertices,
        exhaustive,
    })
}
