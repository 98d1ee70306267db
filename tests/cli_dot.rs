use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn command_dot_plain() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk")
        .arg("--dot_name")
        .arg(&dot_path);
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert!(dot.starts_with("graph {\n"));
    assert!(dot.contains("splines=\"false\""));
    assert!(dot.contains("ranksep=\"7\""));
    assert!(dot.contains("nodesep=\"2\""));

    assert_eq!(dot.matches("[shape=").count(), 12);
    assert_eq!(dot.matches(" -- ").count(), 11);
    assert!(dot.contains("label=\"Homo_sapiens\""));
    assert!(dot.contains("0 -- 1 [headport=n, tailport=s];"));

    // support buckets: 0.92 -> black, 0.85 -> gray40, 0.66 -> gray70
    assert!(dot.contains("5 [shape=\"point\", color=\"black\"]"));
    assert!(dot.contains("4 [shape=\"point\", color=\"gray40\"]"));
    assert!(dot.contains("8 [shape=\"point\", color=\"gray70\"]"));

    // nothing was contracted, so no pages
    assert!(!dot.contains("triangle"));
    assert!(!temp.path().join("tree").exists());

    Ok(())
}

#[test]
fn command_dot_contract_depth() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk")
        .arg("--dot_name")
        .arg(&dot_path)
        .arg("--do_contraction")
        .arg("--dfs_depth")
        .arg("1");
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert!(dot.contains("1 [shape=\"triangle\""));
    assert!(dot.contains("label=\"2 seqs\""));
    assert!(dot.contains("label=\"4 seqs\""));
    assert!(dot.contains("URL=\"tree/subtree_1.html\""));
    assert!(dot.contains("URL=\"tree/subtree_4.html\""));
    assert!(dot.contains("label=\"Lemur_catta\""));
    assert_eq!(dot.matches(" -- ").count(), 3);

    let page_dir = temp.path().join("tree");
    assert!(page_dir.join("subtree_1.html").exists());
    assert!(page_dir.join("subtree_4.html").exists());

    let page = fs::read_to_string(page_dir.join("subtree_4.html"))?;
    assert!(page.contains("<th>Sequence identificator</th>"));
    assert!(page.contains("<td>Macaca_mulatta</td>"));
    assert!(page.contains("<td>Saimiri_sciureus</td>"));
    assert_eq!(page.matches("<td>").count(), 4);

    Ok(())
}

#[test]
fn command_dot_contract_explicit() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk")
        .arg("--dot_name")
        .arg(&dot_path)
        .arg("--do_contraction")
        .arg("--to_contract")
        .arg("5");
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert!(dot.contains("5 [shape=\"triangle\""));
    assert!(dot.contains("URL=\"tree/subtree_5.html\""));
    // the sibling clade stays expanded
    assert!(dot.contains("label=\"Callithrix_jacchus\""));
    assert_eq!(dot.matches("[shape=").count(), 10);
    assert_eq!(dot.matches(" -- ").count(), 9);

    let page = fs::read_to_string(temp.path().join("tree").join("subtree_5.html"))?;
    assert!(page.contains("<td>Papio_anubis</td>"));

    Ok(())
}

#[test]
fn command_dot_helper_labels() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk")
        .arg("--dot_name")
        .arg(&dot_path)
        .arg("--helper_labels");
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert!(dot.contains("label=\"v=0\""));
    assert!(dot.contains("label=\"v=1\""));
    assert!(dot.contains("label=\"v=2\\nHomo_sapiens\""));
    assert!(!dot.contains("shape=\"point\""));

    Ok(())
}

#[test]
fn command_dot_gz() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk.gz")
        .arg("--dot_name")
        .arg(&dot_path);
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert_eq!(dot.matches("[shape=").count(), 12);
    assert!(dot.contains("label=\"Lemur_catta\""));

    Ok(())
}

#[test]
fn command_dot_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("stdin")
        .arg("--dot_name")
        .arg(&dot_path)
        .write_stdin("((A,B)x,C);");
    cmd.assert().success();

    let dot = fs::read_to_string(&dot_path)?;
    assert_eq!(dot.matches("[shape=").count(), 5);
    assert!(dot.contains("label=\"x\""));

    Ok(())
}

#[test]
fn command_dot_missing_vertex() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("tests/newick/primates.nwk")
        .arg("--dot_name")
        .arg(&dot_path)
        .arg("--do_contraction")
        .arg("--to_contract")
        .arg("99");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot contract vertex 99"));

    Ok(())
}

#[test]
fn command_dot_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let dot_path = temp.path().join("tree.dot");

    let mut cmd = Command::cargo_bin("treedraw")?;
    cmd.arg("to-dot")
        .arg("--tree_file")
        .arg("stdin")
        .arg("--dot_name")
        .arg(&dot_path)
        .write_stdin("((A,B;");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));

    Ok(())
}
