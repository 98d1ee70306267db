use super::Tree;
use std::io::Read;

/// Read Newick trees from a file.
///
/// # Arguments
/// * `infile` - Path to the input file (or "stdin" for stdin; ".gz" files are decompressed).
pub fn from_file(infile: &str) -> anyhow::Result<Vec<Tree>> {
    let mut reader = crate::reader(infile);
    let mut newick = String::new();
    reader
        .read_to_string(&mut newick)
        .map_err(|e| anyhow::anyhow!("Read error: {}", e))?;
    Ok(Tree::from_newick_multi(newick.as_str())?)
}
