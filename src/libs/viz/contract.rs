use super::graph::{CladeGraph, VertexId, VertexInfo};
use anyhow::bail;

/// Collapse the whole subtree below `v` into `v` itself.
///
/// The merged vertex keeps the absorbed clades and names in depth-first
/// preorder and is marked as contracted. Contracting a leaf changes
/// nothing. Contracting a vertex that is not in the graph, typically
/// because an earlier contraction already absorbed it, is an error.
pub fn contract_vertex(cg: &mut CladeGraph, v: VertexId) -> anyhow::Result<()> {
    if !cg.graph.contains_node(v) {
        bail!("cannot contract vertex {}: not in the graph", v);
    }
    if cg.out_degree(v) == 0 {
        return Ok(());
    }

    let absorbed = cg.descendants(v);

    // A previously contracted descendant contributes its whole merged
    // sequence, an uncontracted one its single entry.
    let mut clades = Vec::new();
    let mut names = Vec::new();
    for x in &absorbed {
        match cg.info.get(x) {
            Some(info) => {
                clades.extend(info.clades.iter().copied());
                names.extend(info.names.iter().cloned());
            }
            None => bail!("vertex {} carries no metadata", x),
        }
    }

    for x in absorbed.iter().skip(1) {
        cg.graph.remove_node(*x);
        cg.info.remove(x);
    }
    cg.info.insert(
        v,
        VertexInfo {
            clades,
            names,
            contracted: true,
        },
    );

    Ok(())
}

/// Apply the full contraction pass: first the explicitly requested
/// vertices, in the given order, then every leaf of the depth-bounded
/// traversal when `max_depth` is set.
pub fn run_contraction(
    cg: &mut CladeGraph,
    explicit: &[VertexId],
    max_depth: Option<usize>,
) -> anyhow::Result<()> {
    for v in explicit {
        contract_vertex(cg, *v)?;
    }

    if let Some(depth) = max_depth {
        for v in bounded_leaves(cg, CladeGraph::ROOT, depth) {
            contract_vertex(cg, v)?;
        }
    }

    Ok(())
}

/// Leaves of the traversal from `root` cut off at `depth` edges, in
/// depth-first preorder. A vertex qualifies when it sits exactly at the
/// bound or has no children at all.
fn bounded_leaves(cg: &CladeGraph, root: VertexId, depth: usize) -> Vec<VertexId> {
    let mut result = Vec::new();
    if !cg.graph.contains_node(root) {
        return result;
    }

    let mut stack = vec![(root, 0usize)];
    while let Some((v, d)) = stack.pop() {
        let succs = cg.successors(v);
        if succs.is_empty() || d == depth {
            result.push(v);
            continue;
        }
        for s in succs.iter().rev() {
            stack.push((*s, d + 1));
        }
    }

    result
}
