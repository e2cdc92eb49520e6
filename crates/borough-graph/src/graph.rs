//! Directed dependency graph keyed by qualified names.
//!
//! Names are interned into dense indices in first-seen order. Adjacency lists keep insertion
//! order so every traversal built on top of the graph is deterministic.

use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    names: Vec<String>,
    name_index: HashMap<String, usize>,
    out: Vec<Vec<usize>>,
    in_: Vec<Vec<usize>>,
    source_order: Vec<usize>,
    edges: HashSet<(usize, usize)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, name: &str) -> usize {
        if let Some(&ix) = self.name_index.get(name) {
            return ix;
        }
        let ix = self.names.len();
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), ix);
        self.out.push(Vec::new());
        self.in_.push(Vec::new());
        ix
    }

    /// Adds the edge `from -> to`. Returns `false` if the edge was already present.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let v = self.ensure_node(from);
        let w = self.ensure_node(to);
        if !self.edges.insert((v, w)) {
            return false;
        }
        if self.out[v].is_empty() {
            self.source_order.push(v);
        }
        self.out[v].push(w);
        self.in_[w].push(v);
        true
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(v), Some(w)) => self.edges.contains(&(v, w)),
            _ => false,
        }
    }

    /// Every name seen as an edge endpoint, in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Names with at least one outgoing edge, in the order they first appeared as a source.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source_order.iter().map(|&ix| self.names[ix].as_str())
    }

    /// Names that `name` depends on.
    pub fn targets<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.neighbors(name, &self.out)
    }

    /// Names that depend on `name`.
    pub fn sources_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.neighbors(name, &self.in_)
    }

    pub fn out_degree(&self, name: &str) -> usize {
        self.index_of(name).map_or(0, |ix| self.out[ix].len())
    }

    pub fn in_degree(&self, name: &str) -> usize {
        self.index_of(name).map_or(0, |ix| self.in_[ix].len())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn name(&self, ix: usize) -> Option<&str> {
        self.names.get(ix).map(String::as_str)
    }

    pub fn successor_ids(&self, ix: usize) -> &[usize] {
        self.out.get(ix).map(Vec::as_slice).unwrap_or(&[])
    }

    fn neighbors<'a>(
        &'a self,
        name: &str,
        adjacency: &'a [Vec<usize>],
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.index_of(name)
            .into_iter()
            .flat_map(move |ix| adjacency[ix].iter())
            .map(move |&w| self.names[w].as_str())
    }
}

impl<A, B> Extend<(A, B)> for DependencyGraph
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (A, B)>>(&mut self, iter: T) {
        for (from, to) in iter {
            self.add_edge(from.as_ref(), to.as_ref());
        }
    }
}

impl<A, B> FromIterator<(A, B)> for DependencyGraph
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        let mut g = Self::new();
        g.extend(iter);
        g
    }
}
