//! Shortest path algorithms over a query-local search graph.
//!
//! A [`SearchGraph`] is built at the start of each query from the edges
//! the query is allowed to use, with every edge weight already resolved.
//! Later topology rebuilds do not affect a search in progress.

use pathfinder_core::types::{EdgeMetadata, Hops, NodeId};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Two path costs closer than this are considered equal.
const COST_EPSILON: f64 = 1e-9;

/// How edge weights are read from link metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRule<'a> {
    /// Attribute to read; `None` counts hops.
    pub attribute: Option<&'a str>,
    /// Used when the attribute is missing, non-numeric, negative or not finite.
    pub default_weight: f64,
}

impl<'a> WeightRule<'a> {
    pub fn hops() -> Self {
        Self {
            attribute: None,
            default_weight: 1.0,
        }
    }

    pub fn attribute(attribute: Option<&'a str>, default_weight: f64) -> Self {
        Self {
            attribute,
            default_weight,
        }
    }

    pub fn resolve(&self, metadata: &EdgeMetadata) -> f64 {
        let Some(attribute) = self.attribute else {
            return 1.0;
        };
        metadata
            .get(attribute)
            .and_then(|value| value.as_f64())
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or(self.default_weight)
    }
}

#[derive(PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on cost, ties broken by insertion index
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

/// Nodes and edges a single Dijkstra run must avoid.
#[derive(Default)]
struct Blocked {
    nodes: HashSet<NodeIndex>,
    edges: HashSet<EdgeIndex>,
}

/// Result of a Dijkstra run: distances and every equal-cost predecessor.
struct ShortestTree {
    dist: HashMap<NodeIndex, f64>,
    preds: HashMap<NodeIndex, Vec<NodeIndex>>,
}

/// Undirected weighted graph local to one query.
#[derive(Debug, Clone, Default)]
pub struct SearchGraph {
    graph: UnGraph<NodeId, f64>,
    index: HashMap<NodeId, NodeIndex>,
}

impl SearchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge-induced subgraph: only endpoints of the given edges become nodes.
    pub fn from_edges<'e, I>(edges: I, weight: WeightRule<'_>) -> Self
    where
        I: IntoIterator<Item = (&'e NodeId, &'e NodeId, &'e EdgeMetadata)>,
    {
        let mut search = Self::new();
        for (a, b, metadata) in edges {
            search.add_edge(a, b, weight.resolve(metadata));
        }
        search
    }

    pub fn add_node(&mut self, id: &NodeId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    pub fn add_edge(&mut self, a: &NodeId, b: &NodeId, weight: f64) {
        let a_idx = self.add_node(a);
        let b_idx = self.add_node(b);
        match self.graph.find_edge(a_idx, b_idx) {
            Some(edge) => self.graph[edge] = weight,
            None => {
                self.graph.add_edge(a_idx, b_idx, weight);
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn dijkstra(&self, source: NodeIndex, target: Option<NodeIndex>, blocked: &Blocked) -> ShortestTree {
        let mut dist: HashMap<NodeIndex, f64> = HashMap::new();
        let mut preds: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut settled: HashSet<NodeIndex> = HashSet::new();
        let mut heap = BinaryHeap::new();

        dist.insert(source, 0.0);
        heap.push(State { cost: 0.0, node: source });

        while let Some(State { cost, node }) = heap.pop() {
            if !settled.insert(node) {
                continue;
            }
            if let Some(target) = target {
                if let Some(&best) = dist.get(&target) {
                    if cost > best + COST_EPSILON {
                        break;
                    }
                }
            }

            for edge in self.graph.edges(node) {
                if blocked.edges.contains(&edge.id()) {
                    continue;
                }
                let next = if edge.source() == node { edge.target() } else { edge.source() };
                if blocked.nodes.contains(&next) {
                    continue;
                }
                let next_cost = cost + *edge.weight();
                // Zero-weight edges can reach a settled node at equal cost.
                if settled.contains(&next) {
                    if let Some(&known) = dist.get(&next) {
                        if (next_cost - known).abs() <= COST_EPSILON {
                            preds.entry(next).or_default().push(node);
                        }
                    }
                    continue;
                }
                match dist.get(&next) {
                    Some(&known) if next_cost > known + COST_EPSILON => {}
                    Some(&known) if (next_cost - known).abs() <= COST_EPSILON => {
                        preds.entry(next).or_default().push(node);
                    }
                    _ => {
                        dist.insert(next, next_cost);
                        preds.insert(next, vec![node]);
                        heap.push(State { cost: next_cost, node: next });
                    }
                }
            }
        }

        ShortestTree { dist, preds }
    }

    /// One cheapest path, following the first recorded predecessor.
    fn shortest_path(&self, source: NodeIndex, target: NodeIndex, blocked: &Blocked) -> Option<Vec<NodeIndex>> {
        let tree = self.dijkstra(source, Some(target), blocked);
        tree.dist.get(&target)?;

        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = *tree.preds.get(&current)?.first()?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    fn path_weight(&self, path: &[NodeIndex]) -> f64 {
        path.windows(2)
            .filter_map(|pair| self.graph.find_edge(pair[0], pair[1]))
            .map(|edge| self.graph[edge])
            .sum()
    }

    fn to_hops(&self, path: &[NodeIndex]) -> Hops {
        path.iter().map(|&idx| self.graph[idx].clone()).collect()
    }

    /// Every path of minimal total weight between two nodes, sorted.
    ///
    /// Empty when either node is absent or no path exists.
    pub fn all_shortest_paths(&self, source: &str, destination: &str) -> Vec<Hops> {
        let (Some(&source), Some(&target)) = (self.index.get(source), self.index.get(destination)) else {
            return Vec::new();
        };
        if source == target {
            return vec![self.to_hops(&[source])];
        }

        let tree = self.dijkstra(source, Some(target), &Blocked::default());
        if !tree.dist.contains_key(&target) {
            return Vec::new();
        }

        // Walk the predecessor DAG back from the target.
        let mut paths = Vec::new();
        let mut stack = vec![vec![target]];
        while let Some(partial) = stack.pop() {
            let Some(&head) = partial.last() else { continue };
            if head == source {
                let mut path = partial;
                path.reverse();
                paths.push(self.to_hops(&path));
                continue;
            }
            for &pred in tree.preds.get(&head).into_iter().flatten() {
                // Zero-weight cycles put predecessors on each other.
                if partial.contains(&pred) {
                    continue;
                }
                let mut extended = partial.clone();
                extended.push(pred);
                stack.push(extended);
            }
        }

        paths.sort();
        paths
    }

    /// Up to `k` loopless paths in increasing total weight (Yen's algorithm).
    pub fn k_shortest_paths(&self, source: &str, destination: &str, k: usize) -> Vec<Hops> {
        if k == 0 {
            return Vec::new();
        }
        let (Some(&source), Some(&target)) = (self.index.get(source), self.index.get(destination)) else {
            return Vec::new();
        };
        if source == target {
            return vec![self.to_hops(&[source])];
        }

        let Some(first) = self.shortest_path(source, target, &Blocked::default()) else {
            return Vec::new();
        };

        let mut seen: HashSet<Vec<NodeIndex>> = HashSet::from([first.clone()]);
        let mut accepted: Vec<Vec<NodeIndex>> = vec![first];
        let mut candidates: Vec<(f64, Vec<NodeIndex>)> = Vec::new();

        while accepted.len() < k {
            let last = accepted[accepted.len() - 1].clone();

            for i in 0..last.len() - 1 {
                let spur = last[i];
                let root = &last[..=i];

                let mut blocked = Blocked::default();
                for path in &accepted {
                    if path.len() > i + 1 && &path[..=i] == root {
                        if let Some(edge) = self.graph.find_edge(path[i], path[i + 1]) {
                            blocked.edges.insert(edge);
                        }
                    }
                }
                blocked.nodes.extend(root[..i].iter().copied());

                if let Some(spur_path) = self.shortest_path(spur, target, &blocked) {
                    let mut total = root[..i].to_vec();
                    total.extend(spur_path);
                    if seen.insert(total.clone()) {
                        candidates.push((self.path_weight(&total), total));
                    }
                }
            }

            let best = candidates
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0).then(a.1.len().cmp(&b.1.len())))
                .map(|(i, _)| i);
            match best {
                Some(i) => accepted.push(candidates.remove(i).1),
                None => break,
            }
        }

        accepted.iter().map(|path| self.to_hops(path)).collect()
    }
}
