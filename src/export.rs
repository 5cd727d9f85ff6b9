// src/export.rs
//
// JSON document: one array, one object per element, in discovery order.
// `image` / `localImage` are only present when known.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::options::ExportOptions;
use crate::error::{Result, ScrapeError};
use crate::file::{resolve_out_path, write_atomic};
use crate::graph::EntityGraph;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub ingredients: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub tier: u32,
    pub recipes: Vec<RecipeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "localImage", default, skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,
}

pub fn records(graph: &EntityGraph) -> Vec<ElementRecord> {
    graph
        .entities()
        .iter()
        .map(|e| ElementRecord {
            name: e.name.clone(),
            tier: e.tier,
            recipes: e
                .recipes
                .iter()
                .map(|r| RecipeRecord { ingredients: r.ingredients.clone() })
                .collect(),
            image: e.image_url.clone(),
            local_image: e.local_image.clone(),
        })
        .collect()
}

pub fn to_json(records: &[ElementRecord], pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(s)
}

/// Serialize the annotated graph to `opts.out_path`. Returns the path written.
pub fn write(graph: &EntityGraph, opts: &ExportOptions) -> Result<PathBuf> {
    let path = resolve_out_path(&opts.out_path);
    let json = to_json(&records(graph), opts.pretty)?;
    write_atomic(&path, json.as_bytes())?;
    tracing::info!(elements = graph.len(), path = %path.display(), "export written");
    Ok(path)
}

pub fn load(path: &Path) -> Result<Vec<ElementRecord>> {
    let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_image_fields_are_omitted() {
        let rec = ElementRecord {
            name: "Water".into(),
            tier: 1,
            recipes: vec![],
            image: None,
            local_image: None,
        };
        let s = to_json(std::slice::from_ref(&rec), false).unwrap();
        assert_eq!(s, r#"[{"name":"Water","tier":1,"recipes":[]}]"#);
    }

    #[test]
    fn local_image_uses_camel_case_key() {
        let rec = ElementRecord {
            name: "Steam".into(),
            tier: 2,
            recipes: vec![RecipeRecord { ingredients: vec!["Water".into(), "Fire".into()] }],
            image: Some("https://x/steam.png".into()),
            local_image: Some("images/Steam_0123abcd.png".into()),
        };
        let v: serde_json::Value = serde_json::from_str(&to_json(&[rec], true).unwrap()).unwrap();
        assert_eq!(v[0]["localImage"], "images/Steam_0123abcd.png");
        assert_eq!(v[0]["image"], "https://x/steam.png");
        assert_eq!(v[0]["recipes"][0]["ingredients"][1], "Fire");
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let rec = ElementRecord { name: "Air".into(), tier: 1, recipes: vec![], image: None, local_image: None };
        let s = to_json(&[rec], true).unwrap();
        assert!(s.starts_with("[\n  {\n    \"name\": \"Air\""));
    }
}
