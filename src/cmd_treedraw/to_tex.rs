use clap::*;
use std::io::Write;
use treedraw::libs::viz::contract::run_contraction;
use treedraw::libs::viz::tikz::{self, TexOptions};
use treedraw::libs::viz::CladeGraph;

use super::utils;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-tex")
        .about("Render a Newick tree as a self-contained LaTeX document")
        .after_help(
            r###"
Render a Newick tree as a self-contained LaTeX/TikZ document.

The overview page draws the tree left to right, contracted or not.
Every contracted node links to its own "Subtree details" section, which
shows the collapsed marker next to the full subtree it absorbed.

Notes:
* Internal nodes with support values become shaded circles:
  >=0.9 black, >=0.7 black!50, >=0.5 black!10
* Underscore `_` is a control character in LaTeX; all `_`s in names are
  replaced with spaces
* Compile with XeLaTeX or Tectonic; in-document links use \XeTeXLinkBox

Examples:
1. Overview plus detail sections:
   treedraw to-tex --tree_file tests/newick/primates.nwk --do_contraction \
       --dfs_depth 2 --tex_name tree.tex

2. Just the picture, to stdout:
   treedraw to-tex --tree_file tests/newick/primates.nwk --only_picture
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
            Arg::new("tex_name")
                .long("tex_name")
                .num_args(1)
                .default_value("stdout")
                .help("Output .tex filename. [stdout] for screen"),
        )
        .arg(
            Arg::new("to_contract")
                .long("to_contract")
                .num_args(1)
                .help("Comma-separated ids of nodes to contract, no spaces. Get the ids with `to-dot --helper_labels`"),
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
            Arg::new("only_picture")
                .long("only_picture")
                .action(ArgAction::SetTrue)
                .help("Print only the big contracted picture, do not draw the subtrees"),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .num_args(1)
                .default_value("Phylogenetic tree overview")
                .help("Document title on the first page"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = treedraw::writer(args.get_one::<String>("tex_name").unwrap());

    let infile = args.get_one::<String>("tree_file").unwrap();
    let opts = TexOptions {
        only_picture: args.get_flag("only_picture"),
        title: args.get_one::<String>("title").unwrap().to_string(),
    };

    let tree = utils::load_tree(infile)?;
    let full = CladeGraph::from_tree(&tree)?;
    let mut cg = CladeGraph::from_tree(&tree)?;

    if args.get_flag("do_contraction") {
        let explicit = utils::parse_id_list(args.get_one::<String>("to_contract"))?;
        let depth = *args.get_one::<usize>("dfs_depth").unwrap();
        run_contraction(&mut cg, &explicit, Some(depth))?;
    }

    let out_string = tikz::document_body(&tree, &cg, &full, &opts)?;

    static FILE_TEMPLATE: &str = include_str!("../../docs/template.tex");
    let mut template = FILE_TEMPLATE.to_string();

    {
        // Section tree
        let begin = template.find("%TREE_BEGIN").unwrap();
        let end = template.find("%TREE_END").unwrap();
        template.replace_range(begin..end, &out_string);
    }

    writer.write_all(template.as_ref())?;

    Ok(())
}
