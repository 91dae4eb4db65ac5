use anyhow::{Context, Result};
use codelab_render::Node;
use std::io::Read;
use std::path::Path;

/// Load a node array from `file`: `-` reads JSON from stdin, `.yaml`/`.yml`
/// files are YAML, anything else is JSON.
pub fn load_nodes(file: &str) -> Result<Vec<Node>> {
    if file == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read node tree from stdin")?;
        return codelab_render::from_json(&raw).context("Failed to parse node tree from stdin");
    }

    let raw = std::fs::read_to_string(file).with_context(|| format!("Failed to read '{file}'"))?;
    let nodes: Vec<Node> = if is_yaml(Path::new(file)) {
        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse '{file}'"))?
    } else {
        codelab_render::from_json(&raw).with_context(|| format!("Failed to parse '{file}'"))?
    };
    Ok(nodes)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_by_extension() {
        assert!(is_yaml(Path::new("lab.yaml")));
        assert!(is_yaml(Path::new("dir/lab.yml")));
        assert!(!is_yaml(Path::new("lab.json")));
        assert!(!is_yaml(Path::new("lab")));
    }

    #[test]
    fn loads_yaml_fixture() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/codelab.yaml");
        let nodes = load_nodes(path).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].kind_name(), "code");
        assert!(nodes[2].env().matches("web"));
        assert!(!nodes[2].env().matches("android"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_nodes("no/such/lab.json").unwrap_err();
        assert!(err.to_string().contains("no/such/lab.json"));
    }
}
