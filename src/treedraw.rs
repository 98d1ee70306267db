extern crate clap;
use clap::*;

mod cmd_treedraw;

fn main() -> anyhow::Result<()> {
    let app = Command::new("treedraw")
        .version(crate_version!())
        .about("`treedraw` - Render phylogenetic trees as Graphviz or TikZ documents")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_treedraw::to_dot::make_subcommand())
        .subcommand(cmd_treedraw::to_tex::make_subcommand())
        .after_help(
            r###"Subcommands:

* to-dot - Graphviz document, plus one HTML detail page per contracted node
* to-tex - self-contained LaTeX/TikZ document with in-document detail sections

A contracted node stands for a whole subtree and records the sequences
it absorbed. Contract explicit nodes with --to_contract, or bound the
drawn depth with --dfs_depth; both need the --do_contraction switch.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("to-dot", sub_matches)) => cmd_treedraw::to_dot::execute(sub_matches),
        Some(("to-tex", sub_matches)) => cmd_treedraw::to_tex::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
