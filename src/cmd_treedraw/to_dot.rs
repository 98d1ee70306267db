use clap::*;
use std::io::Write;
use treedraw::libs::viz::contract::run_contraction;
use treedraw::libs::viz::dot::{self, DotOptions};
use treedraw::libs::viz::CladeGraph;

use super::utils;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-dot")
        .about("Render a Newick tree as a Graphviz DOT document")
        .after_help(
            r###"
Render a Newick tree as a Graphviz DOT document.

Alongside the .dot file, every contracted node gets an HTML detail page
listing the sequences it absorbed. The pages live in a directory named
after the output file with the extension stripped, and the triangles
carry matching URL attributes, so SVG output stays clickable.

Notes:
* Contraction collapses a whole subtree into one triangle labeled "N seqs"
* --to_contract takes graph ids; run once with --helper_labels to see them
* Internal nodes with support values become shaded points:
  >=0.9 black, >=0.7 gray40, >=0.5 gray70

Examples:
1. Plain rendering:
   treedraw to-dot --tree_file tests/newick/primates.nwk --dot_name tree.dot

2. Collapse everything deeper than two levels:
   treedraw to-dot --tree_file tests/newick/primates.nwk --dot_name tree.dot \
       --do_contraction --dfs_depth 2

3. Produce an image (requires Graphviz installed):
   dot -Tsvg tree.dot -o tree.svg
"###,
        )
        .arg(
            Arg::new("tree_file")
                .long("tree_file")
                .required(true)
                .num_args(1)
                .help("Input tree in Newick format. [stdin] for standard input"),
        )
        .arg(
            Arg::new("dot_name")
                .long("dot_name")
                .required(true)
                .num_args(1)
                .help("Output .dot filename, also names the detail page directory"),
        )
        .arg(
            Arg::new("to_contract")
                .long("to_contract")
                .num_args(1)
                .help("Comma-separated ids of nodes to contract, no spaces. Example: 1,2,58"),
        )
        .arg(
            Arg::new("do_contraction")
                .long("do_contraction")
                .action(ArgAction::SetTrue)
                .help("Contraction switch. If not set, contraction is not performed"),
        )
        .arg(
            Arg::new("dfs_depth")
                .long("dfs_depth")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("5")
                .help("Maximal depth of the drawn tree. Nodes at this depth absorb their subtrees"),
        )
        .arg(
            Arg::new("entry_width")
                .long("entry_width")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("15")
                .help("Width of boxes and triangles, also sets the rank separation"),
        )
        .arg(
            Arg::new("entry_height")
                .long("entry_height")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Height of boxes and triangles"),
        )
        .arg(
            Arg::new("fontsize")
                .long("fontsize")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("50")
                .help("Font size of node labels"),
        )
        .arg(
            Arg::new("helper_labels")
                .long("helper_labels")
                .action(ArgAction::SetTrue)
                .help("Annotate every node with its graph id, for picking contraction targets"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("tree_file").unwrap();
    let dot_name = args.get_one::<String>("dot_name").unwrap();

    let opts = DotOptions {
        entry_width: *args.get_one::<usize>("entry_width").unwrap(),
        entry_height: *args.get_one::<usize>("entry_height").unwrap(),
        fontsize: *args.get_one::<usize>("fontsize").unwrap(),
        helper_labels: args.get_flag("helper_labels"),
    };

    //----------------------------
    // Ops
    //----------------------------
    let tree = utils::load_tree(infile)?;
    let mut cg = CladeGraph::from_tree(&tree)?;

    if args.get_flag("do_contraction") {
        let explicit = utils::parse_id_list(args.get_one::<String>("to_contract"))?;
        let depth = *args.get_one::<usize>("dfs_depth").unwrap();
        run_contraction(&mut cg, &explicit, Some(depth))?;
    }

    //----------------------------
    // Output
    //----------------------------
    let dir = dot::detail_dir(dot_name);
    let url_dir = dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned());

    let mut writer = treedraw::writer(dot_name);
    writer.write_all(dot::render(&tree, &cg, &url_dir, &opts)?.as_bytes())?;

    dot::write_detail_pages(&cg, &dir)?;

    Ok(())
}
