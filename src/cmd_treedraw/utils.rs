use anyhow::anyhow;
use treedraw::libs::phylo::tree::Tree;
use treedraw::libs::viz::VertexId;

/// The first tree of the input file. Trailing trees are ignored.
pub fn load_tree(infile: &str) -> anyhow::Result<Tree> {
    Tree::from_file(infile)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no tree found in {}", infile))
}

/// Split a `1,2,58` style list into vertex ids. Empty pieces are
/// skipped, so a trailing comma does no harm.
pub fn parse_id_list(arg: Option<&String>) -> anyhow::Result<Vec<VertexId>> {
    let mut ids = Vec::new();
    if let Some(list) = arg {
        for part in list.split(',').filter(|p| !p.is_empty()) {
            let id: VertexId = part
                .parse()
                .map_err(|_| anyhow!("invalid vertex id in --to_contract: {}", part))?;
            ids.push(id);
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let arg = "3,1,58".to_string();
        assert_eq!(parse_id_list(Some(&arg)).unwrap(), vec![3, 1, 58]);

        let arg = "7,".to_string();
        assert_eq!(parse_id_list(Some(&arg)).unwrap(), vec![7]);

        assert_eq!(parse_id_list(None).unwrap(), Vec::<VertexId>::new());

        let arg = "2,x".to_string();
        assert!(parse_id_list(Some(&arg)).is_err());
    }
}
