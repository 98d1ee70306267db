use super::graph::VertexId;
use anyhow::bail;
use petgraph::prelude::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeMap;

/// Direction the tree grows in. Ranks advance along the first axis,
/// sibling order along the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    TopDown,
    LeftRight,
}

/// Knobs for [`compute`]. Step sizes left as `None` are derived from the
/// paper size and the extent of the tree.
#[derive(Debug, Clone)]
pub struct LayoutParams {
    pub orientation: Orientation,
    pub paper_width: f64,
    pub paper_height: f64,
    pub width_step: Option<f64>,
    pub height_step: Option<f64>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            orientation: Orientation::TopDown,
            paper_width: 257.0,
            paper_height: 190.0,
            width_step: None,
            height_step: None,
        }
    }
}

/// Coordinates for every vertex reachable from the layout root.
#[derive(Debug)]
pub struct Layout {
    pub orientation: Orientation,
    /// Depth below the layout root.
    pub rank: BTreeMap<VertexId, usize>,
    /// Position across the rank. Leaves take consecutive integers,
    /// internal vertices the mean of their children.
    pub order: BTreeMap<VertexId, f64>,
    /// Final paper position in mm.
    pub pos: BTreeMap<VertexId, (f64, f64)>,
    pub width_step: f64,
    pub height_step: f64,
}

impl Layout {
    /// Bend point of the orthogonal edge `from` -> `to`: the edge runs
    /// along the rank axis first, then across.
    pub fn elbow(&self, from: VertexId, to: VertexId) -> (f64, f64) {
        let a = self.pos[&from];
        let b = self.pos[&to];
        match self.orientation {
            Orientation::TopDown => (b.0, a.1),
            Orientation::LeftRight => (a.0, b.1),
        }
    }
}

/// Lay out the subgraph reachable from `root`. Vertices outside it get
/// no coordinates, so a subtree can be drawn straight from the full
/// graph without building a subgraph first.
pub fn compute(
    graph: &DiGraphMap<VertexId, ()>,
    root: VertexId,
    params: &LayoutParams,
) -> anyhow::Result<Layout> {
    if !graph.contains_node(root) {
        bail!("layout root {} is not in the graph", root);
    }

    // Rank is the edge distance from the layout root
    let mut rank: BTreeMap<VertexId, usize> = BTreeMap::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((v, d)) = stack.pop() {
        rank.insert(v, d);
        let succs: Vec<VertexId> = graph.neighbors_directed(v, Direction::Outgoing).collect();
        for s in succs.iter().rev() {
            stack.push((*s, d + 1));
        }
    }

    // Leaves claim consecutive slots in postorder, so sibling subtrees
    // never interleave
    let mut order: BTreeMap<VertexId, f64> = BTreeMap::new();
    let mut slot = 0usize;
    for v in postorder(graph, root) {
        if is_leaf(graph, v) {
            order.insert(v, slot as f64);
            slot += 1;
        }
    }

    // Internal vertices center on their children, deepest rank first so
    // every child is already placed
    let mut internals: Vec<VertexId> = rank
        .keys()
        .filter(|v| !is_leaf(graph, **v))
        .copied()
        .collect();
    internals.sort_by_key(|v| std::cmp::Reverse(rank[v]));
    for v in internals {
        let succs: Vec<VertexId> = graph.neighbors_directed(v, Direction::Outgoing).collect();
        let sum: f64 = succs.iter().map(|s| order[s]).sum();
        order.insert(v, sum / succs.len() as f64);
    }

    let max_order = order.values().copied().fold(0.0_f64, f64::max);
    let max_rank = rank.values().copied().max().unwrap_or(0);
    let width_step = params
        .width_step
        .unwrap_or(params.paper_width / max_order.max(1.0));
    let height_step = params
        .height_step
        .unwrap_or(params.paper_height / (max_rank as f64).max(1.0));

    let mut pos: BTreeMap<VertexId, (f64, f64)> = BTreeMap::new();
    for (v, r) in &rank {
        let across = order[v] * width_step;
        let along = *r as f64 * height_step;
        let xy = match params.orientation {
            Orientation::TopDown => (across, along),
            Orientation::LeftRight => (along, across),
        };
        pos.insert(*v, xy);
    }

    Ok(Layout {
        orientation: params.orientation,
        rank,
        order,
        pos,
        width_step,
        height_step,
    })
}

fn is_leaf(graph: &DiGraphMap<VertexId, ()>, v: VertexId) -> bool {
    graph
        .neighbors_directed(v, Direction::Outgoing)
        .next()
        .is_none()
}

fn postorder(graph: &DiGraphMap<VertexId, ()>, root: VertexId) -> Vec<VertexId> {
    fn walk(graph: &DiGraphMap<VertexId, ()>, v: VertexId, result: &mut Vec<VertexId>) {
        let succs: Vec<VertexId> = graph.neighbors_directed(v, Direction::Outgoing).collect();
        for s in succs {
            walk(graph, s, result);
        }
        result.push(v);
    }

    let mut result = Vec::new();
    walk(graph, root, &mut result);
    result
}
