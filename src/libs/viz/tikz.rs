use super::graph::{CladeGraph, VertexId};
use super::layout::{self, LayoutParams, Orientation};
use super::style;
use crate::libs::phylo::tree::Tree;
use petgraph::prelude::DiGraphMap;
use petgraph::Direction;

/// Knobs for the LaTeX document.
#[derive(Debug, Clone)]
pub struct TexOptions {
    /// Emit the overview picture alone, no title page and no detail
    /// sections.
    pub only_picture: bool,
    pub title: String,
}

impl Default for TexOptions {
    fn default() -> Self {
        Self {
            only_picture: false,
            title: "Phylogenetic tree overview".to_string(),
        }
    }
}

/// Append one tikzpicture of the subgraph reachable from `root`.
///
/// `style` and `label` decide the per-vertex look, `extra` may hand back
/// additional TikZ lines placed right after a vertex. Edges are drawn as
/// two orthogonal segments through an elbow point.
pub fn picture<S, L, X>(
    out: &mut String,
    graph: &DiGraphMap<VertexId, ()>,
    root: VertexId,
    params: &LayoutParams,
    style: S,
    label: L,
    label_anchor: &str,
    extra: X,
) -> anyhow::Result<()>
where
    S: Fn(VertexId) -> String,
    L: Fn(VertexId) -> String,
    X: Fn(VertexId, (f64, f64), f64) -> Option<String>,
{
    let layout = layout::compute(graph, root, params)?;

    out.push_str("\\begin{center}\n\\begin{tikzpicture}[>=latex',line join=bevel]\n");

    for (v, (x, y)) in &layout.pos {
        out.push_str(&format!(
            "\\node ({}) at ({:.2}mm,{:.2}mm) [{}] {{}};\n",
            v,
            x,
            y,
            style(*v)
        ));
        if let Some(additional) = extra(*v, (*x, *y), layout.order[v]) {
            out.push_str(&additional);
            out.push('\n');
        }
    }

    // a stub handle one step before the root, so the root gets an
    // incoming branch too
    let (rx, ry) = layout.pos[&root];
    out.push_str(&format!(
        "\\node (root) at ({:.2}mm,{:.2}mm) [draw=black,ultra thin,fill,text width=0.01mm,inner sep=0pt,rectangle] {{}};\n",
        rx - layout.height_step,
        ry
    ));
    out.push_str(&format!("\\draw [very thick] (root) -- ({});\n", root));

    for v in layout.pos.keys() {
        for s in graph.neighbors_directed(*v, Direction::Outgoing) {
            let (mx, my) = layout.elbow(*v, s);
            out.push_str(&format!(
                "\\node ({}{}midpoint) at ({:.2}mm,{:.2}mm) [draw=black,ultra thin,fill,text width=0.03mm,inner sep=0pt,rectangle] {{}};\n",
                v, s, mx, my
            ));
            out.push_str(&format!(
                "\\draw [very thick] ({}) -- ({:.2}mm,{:.2}mm);\n",
                v, mx, my
            ));
            out.push_str(&format!(
                "\\draw [very thick] ({:.2}mm,{:.2}mm) -- ({});\n",
                mx, my, s
            ));
        }
    }

    for v in layout.pos.keys() {
        out.push_str(&format!(
            "\\node ({}label) at ({}.west) [anchor={}, font=\\tiny] {{{}}};\n",
            v,
            v,
            label_anchor,
            label(*v)
        ));
    }

    out.push_str("\\end{tikzpicture}\n\\end{center}\n");
    Ok(())
}

/// Everything between `\begin{document}` and `\end{document}`: the
/// title page, the left-to-right overview and one detail section per
/// contracted vertex.
///
/// `cg` is the graph as drawn, `full` the pristine graph of the same
/// tree, which the detail sections redraw their subtrees from.
pub fn document_body(
    tree: &Tree,
    cg: &CladeGraph,
    full: &CladeGraph,
    opts: &TexOptions,
) -> anyhow::Result<String> {
    let mut out = String::new();

    if !opts.only_picture {
        out.push_str("\\vspace*{8cm}\n");
        out.push_str(&format!(
            "{{\\centering\\Large\\bfseries {}}}\n",
            tex_escape(&opts.title)
        ));
        out.push_str("\\\\\n");
        out.push_str("{\\centering Click the taxon to get to the subtree details.}\n");
        out.push_str("\\newpage\n");
    }

    let overview = LayoutParams {
        orientation: Orientation::LeftRight,
        paper_width: 180.0,
        height_step: Some(7.0),
        ..LayoutParams::default()
    };
    let with_links = !opts.only_picture;
    picture(
        &mut out,
        &cg.graph,
        CladeGraph::ROOT,
        &overview,
        |v| overview_style(tree, cg, v, with_links),
        |v| count_label(cg, v),
        "south east",
        |_, _, _| None,
    )?;

    if opts.only_picture {
        return Ok(out);
    }

    for (v, info) in &cg.info {
        if !info.contracted {
            continue;
        }

        out.push_str("\\newpage\n");
        out.push_str(&format!(
            "\\hypertarget{{subtree{}}}{{\\section{{Subtree details}}}}\n",
            v
        ));
        out.push_str("The contracted node and the full subtree it stands for:\n");
        out.push_str("\\hspace*{-0.8cm}\n");

        // the single collapsed marker, as it appears in the overview
        let small = LayoutParams {
            orientation: Orientation::LeftRight,
            paper_width: 50.0,
            width_step: Some(30.0),
            height_step: Some(7.5),
            ..LayoutParams::default()
        };
        picture(
            &mut out,
            &cg.graph,
            *v,
            &small,
            |u| marker_style(tree, cg, u),
            |u| count_label(cg, u),
            "south east",
            |_, _, _| None,
        )?;

        // the subtree it absorbed, redrawn from the pristine graph
        let expanded = LayoutParams {
            orientation: Orientation::LeftRight,
            width_step: Some(1.1),
            height_step: Some(3.0),
            ..LayoutParams::default()
        };
        picture(
            &mut out,
            &full.graph,
            *v,
            &expanded,
            |u| subtree_style(tree, full, u),
            |_| String::new(),
            "west",
            |u, pos, order| moved_leaf_label(full, u, pos, order),
        )?;
    }

    Ok(out)
}

// Overview look: internal vertices show their support bucket, leaves are
// narrow bars. A contracted leaf carries the hyperlink to its section.
fn overview_style(tree: &Tree, cg: &CladeGraph, v: VertexId, with_links: bool) -> String {
    if cg.out_degree(v) > 0 {
        return support_style(tree, cg, v, "text width=0.1mm", "minimum width=2mm");
    }

    let contracted = cg.info.get(&v).map_or(false, |info| info.contracted);
    let base = "fill=black, rectangle, minimum height=0.55cm, text width=0.5mm, font={\\tiny}, inner sep=0pt";
    if contracted && with_links {
        format!("{}, hyperlink node=subtree{}", base, v)
    } else {
        base.to_string()
    }
}

// The collapsed marker alone, drawn bigger than in the overview.
fn marker_style(tree: &Tree, cg: &CladeGraph, v: VertexId) -> String {
    if cg.out_degree(v) > 0 {
        return support_style(tree, cg, v, "text width=0.1mm", "minimum width=2mm");
    }
    "draw=black, fill, rectangle, minimum height=1cm, text width=0.5mm, inner sep=0pt".to_string()
}

// Pristine subtree look: smaller support circles, leaf bars anchored
// west so the moved labels line up.
fn subtree_style(tree: &Tree, full: &CladeGraph, v: VertexId) -> String {
    if full.out_degree(v) > 0 {
        return support_style(tree, full, v, "text width=0.5mm", "minimum width=1mm");
    }
    "draw=black,ultra thin,rectangle,fill=black,anchor=west,text width=1mm,inner sep=0pt"
        .to_string()
}

fn support_style(
    tree: &Tree,
    cg: &CladeGraph,
    v: VertexId,
    rect_width: &str,
    circle_width: &str,
) -> String {
    match cg
        .confidence_of(tree, v)
        .and_then(style::tikz_confidence_color)
    {
        Some(col) => format!(
            "draw=black, ultra thin, circle, fill={}, {}, inner sep=0pt",
            col, circle_width
        ),
        None => format!(
            "draw=black,ultra thin,fill,rectangle,{},inner sep=0pt",
            rect_width
        ),
    }
}

// Leaves state how many sequences they stand for, internals stay bare.
fn count_label(cg: &CladeGraph, v: VertexId) -> String {
    if cg.out_degree(v) > 0 {
        return String::new();
    }
    match cg.info.get(&v) {
        Some(info) if info.contracted => info.seq_count().to_string(),
        _ => "1".to_string(),
    }
}

// Leaf labels of the expanded subtree alternate between a far column
// with a connector line and a near offset, so neighboring names do not
// pile up at the tight default spacing.
fn moved_leaf_label(
    full: &CladeGraph,
    v: VertexId,
    pos: (f64, f64),
    order: f64,
) -> Option<String> {
    if full.out_degree(v) > 0 {
        return None;
    }
    let name = full
        .info
        .get(&v)
        .and_then(|info| info.names.first().cloned())??;
    let text = format!("\\tiny {}", tex_escape(&name));

    let (x, y) = pos;
    if (order.round() as i64) % 2 == 0 {
        let mut s = format!(
            "\\node ({}movedlabel) [anchor=west,minimum size=4mm,inner sep=0pt] at ({:.2}mm,{:.2}mm) {{{}}};\n",
            v,
            x + 55.0,
            y,
            text
        );
        s.push_str(&format!("\\draw [thin] ({}) -- ({}movedlabel);", v, v));
        Some(s)
    } else {
        Some(format!(
            "\\node ({}movedlabel) [anchor=west,minimum size=4mm,inner sep=0pt] at ({:.2}mm,{:.2}mm) {{{}}};",
            v,
            x + 3.0,
            y,
            text
        ))
    }
}

/// LaTeX-safe text. Underscores separate words in sequence ids, so they
/// become spaces rather than escapes.
pub fn tex_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '_' => escaped.push(' '),
            '&' | '%' | '$' | '#' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\\' | '~' | '^' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}
