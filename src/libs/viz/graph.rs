use crate::libs::phylo::node::NodeId;
use crate::libs::phylo::tree::Tree;
use anyhow::anyhow;
use petgraph::prelude::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeMap;

/// Graph-side id of a clade. Clades are numbered in depth-first preorder,
/// starting from 0 at the root, so ids are stable for a given input file.
pub type VertexId = usize;

/// What a drawn vertex stands for.
///
/// A fresh vertex stands for exactly one clade. After contraction it
/// stands for the whole absorbed subtree, and `names` keeps one entry per
/// absorbed clade so the detail views can list the sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexInfo {
    pub clades: Vec<NodeId>,
    pub names: Vec<Option<String>>,
    pub contracted: bool,
}

impl VertexInfo {
    /// Number of named sequences the vertex stands for.
    pub fn seq_count(&self) -> usize {
        self.names.iter().filter(|n| n.is_some()).count()
    }
}

/// A phylogenetic tree lowered to a directed graph, plus per-vertex
/// metadata. All edges point from parent to child.
#[derive(Debug, Default)]
pub struct CladeGraph {
    pub graph: DiGraphMap<VertexId, ()>,
    pub info: BTreeMap<VertexId, VertexInfo>,
}

impl CladeGraph {
    /// The tree root always maps to vertex 0.
    pub const ROOT: VertexId = 0;

    /// Build the graph from a tree. Vertices take preorder ids and every
    /// vertex starts out standing for its own single clade.
    ///
    /// ```
    /// use treedraw::libs::phylo::tree::Tree;
    /// use treedraw::libs::viz::CladeGraph;
    /// let tree = Tree::from_newick("((A,B),C);").unwrap();
    /// let cg = CladeGraph::from_tree(&tree).unwrap();
    /// assert_eq!(cg.graph.node_count(), 5);
    /// assert_eq!(cg.graph.edge_count(), 4);
    /// ```
    pub fn from_tree(tree: &Tree) -> anyhow::Result<CladeGraph> {
        let root = tree.get_root().ok_or_else(|| anyhow!("tree is empty"))?;
        let visit = tree.preorder(&root).map_err(|e| anyhow!(e))?;

        let mut vertex_of: BTreeMap<NodeId, VertexId> = BTreeMap::new();
        for (v, node_id) in visit.iter().enumerate() {
            vertex_of.insert(*node_id, v);
        }

        let mut graph = DiGraphMap::new();
        let mut info = BTreeMap::new();
        for node_id in &visit {
            let node = tree
                .get_node(*node_id)
                .ok_or_else(|| anyhow!("node {} not in tree", node_id))?;
            let v = vertex_of[node_id];
            graph.add_node(v);
            info.insert(
                v,
                VertexInfo {
                    clades: vec![*node_id],
                    names: vec![node.name.clone()],
                    contracted: false,
                },
            );
            for child in &node.children {
                graph.add_edge(vertex_of[node_id], vertex_of[child], ());
            }
        }

        Ok(CladeGraph { graph, info })
    }

    /// Children of a vertex, in the order the edges were added. The tree
    /// is traversed parent before child, so this is the clade order of
    /// the input file.
    pub fn successors(&self, v: VertexId) -> Vec<VertexId> {
        self.graph.neighbors_directed(v, Direction::Outgoing).collect()
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.graph.neighbors_directed(v, Direction::Outgoing).count()
    }

    /// The vertex and everything below it, in depth-first preorder.
    pub fn descendants(&self, v: VertexId) -> Vec<VertexId> {
        let mut result = Vec::new();
        let mut stack = vec![v];
        while let Some(x) = stack.pop() {
            result.push(x);
            let succs = self.successors(x);
            for s in succs.iter().rev() {
                stack.push(*s);
            }
        }
        result
    }

    /// Support value of the clade a vertex stands for. A contracted
    /// vertex answers with the support of the subtree root it kept.
    pub fn confidence_of(&self, tree: &Tree, v: VertexId) -> Option<f64> {
        self.info
            .get(&v)
            .and_then(|info| info.clades.first())
            .and_then(|id| tree.get_node(*id))
            .and_then(|node| node.confidence)
    }

    /// All edges, grouped by source vertex in ascending id order.
    pub fn edges(&self) -> Vec<(VertexId, VertexId)> {
        let mut result = Vec::new();
        for v in self.info.keys() {
            for s in self.graph.neighbors_directed(*v, Direction::Outgoing) {
                result.push((*v, s));
            }
        }
        result
    }
}
