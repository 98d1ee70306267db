use super::graph::{CladeGraph, VertexInfo};
use super::style;
use crate::libs::phylo::tree::Tree;
use anyhow::anyhow;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// Cosmetic knobs for the DOT document.
#[derive(Debug, Clone)]
pub struct DotOptions {
    pub entry_width: usize,
    pub entry_height: usize,
    pub fontsize: usize,
    /// Annotate every node with its graph id, for picking contraction
    /// targets.
    pub helper_labels: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            entry_width: 15,
            entry_height: 10,
            fontsize: 50,
            helper_labels: false,
        }
    }
}

/// Directory holding the per-vertex detail pages: the output path with
/// its extension stripped.
pub fn detail_dir(dot_name: &str) -> PathBuf {
    Path::new(dot_name).with_extension("")
}

/// Render the graph as an undirected Graphviz document.
///
/// Contracted vertices become grey triangles labeled with their sequence
/// count and carry a `URL` to their detail page under `url_dir`. Named
/// vertices become grey boxes, supported internal vertices shaded
/// points, anything else a plain point.
pub fn render(
    tree: &Tree,
    cg: &CladeGraph,
    url_dir: &str,
    opts: &DotOptions,
) -> anyhow::Result<String> {
    let mut out = String::from("graph {\n");
    out.push_str("splines=\"false\"\n");
    out.push_str("overlap=\"false\"\n");
    out.push_str(&format!("ranksep=\"{}\"\n", opts.entry_width / 2));
    out.push_str("nodesep=\"2\"\n");
    out.push_str(&format!("fontsize=\"{}\"\n", opts.fontsize));

    for (v, info) in &cg.info {
        if info.contracted {
            let label = if opts.helper_labels {
                format!("v={}\\n{} seqs", v, info.seq_count())
            } else {
                format!("{} seqs", info.seq_count())
            };
            out.push_str(&format!(
                "{} [shape=\"triangle\", color=\"black\", width={}, height={}, style=\"filled\", fillcolor=\"{}\", label=\"{}\", fontsize={}, URL=\"{}/subtree_{}.html\"]\n",
                v, opts.entry_width, opts.entry_height, style::NEUTRAL_FILL, label, opts.fontsize, url_dir, v
            ));
            continue;
        }

        let clade = info
            .clades
            .first()
            .and_then(|id| tree.get_node(*id))
            .ok_or_else(|| anyhow!("vertex {} points at no clade", v))?;

        if let Some(name) = &clade.name {
            let label = if opts.helper_labels {
                format!("v={}\\n{}", v, wrap_label(name, 30))
            } else {
                wrap_label(name, 30)
            };
            out.push_str(&format!(
                "{} [shape=\"box\", color=\"black\", width={}, height={}, style=\"filled\", fillcolor=\"{}\", label=\"{}\", fontsize={}]\n",
                v, opts.entry_width, opts.entry_height, style::NEUTRAL_FILL, label, opts.fontsize
            ));
        } else if opts.helper_labels {
            out.push_str(&format!(
                "{} [shape=\"box\", width=1, color=\"black\", label=\"v={}\", fontsize={}]\n",
                v, v, opts.fontsize
            ));
        } else {
            let color = clade
                .confidence
                .and_then(style::dot_confidence_color)
                .unwrap_or("black");
            out.push_str(&format!("{} [shape=\"point\", color=\"{}\"]\n", v, color));
        }
    }

    for (u, v) in cg.edges() {
        out.push_str(&format!("{} -- {} [headport=n, tailport=s];\n", u, v));
    }

    out.push_str("}\n");
    Ok(out)
}

/// Write one HTML page per contracted vertex into `dir`, listing the
/// sequence names the vertex absorbed. The directory is only created
/// when there is something to put in it.
pub fn write_detail_pages(cg: &CladeGraph, dir: &Path) -> anyhow::Result<()> {
    for (v, info) in &cg.info {
        if !info.contracted {
            continue;
        }
        fs::create_dir_all(dir)?;
        fs::write(dir.join(format!("subtree_{}.html", v)), detail_page(info))?;
    }

    Ok(())
}

fn detail_page(info: &VertexInfo) -> String {
    let mut page = String::from("<!DOCTYPE HTML>\n<html>\n<body>\n<table>\n");
    page.push_str("<tr>\n<th>Sequence identificator</th>\n</tr>\n");
    for name in info.names.iter().flatten() {
        page.push_str(&format!("<tr>\n<td>{}</td>\n</tr>\n", escape_html(name)));
    }
    page.push_str("</table>\n<br>\n</body>\n</html>\n");
    page
}

// Wrap to `row` characters per line. Wrap first, then escape, so an
// escape sequence never straddles a line break.
fn wrap_label(name: &str, row: usize) -> String {
    let chunks = name.chars().chunks(row);
    chunks
        .into_iter()
        .map(|chunk| escape_label(&chunk.collect::<String>()))
        .join("\\n")
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
