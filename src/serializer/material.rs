//! Material records.

use crate::config::MaterialSettings;
use crate::types::MaterialInfo;
use serde::Serialize;
use std::collections::HashSet;

/// One entry of the document's `materials` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub diffuse: [f32; 3],
    pub roughness: f32,
}

/// Collects the materials referenced by exported nodes, default first.
#[derive(Debug)]
pub struct MaterialRegistry {
    default_name: String,
    roughness: f32,
    records: Vec<MaterialRecord>,
    seen: HashSet<String>,
}

impl MaterialRegistry {
    pub fn new(default: &MaterialSettings) -> Self {
        let record = MaterialRecord {
            kind: "matte".to_string(),
            name: default.name.clone(),
            diffuse: default.diffuse,
            roughness: default.roughness,
        };
        Self {
            default_name: default.name.clone(),
            roughness: default.roughness,
            seen: HashSet::from([default.name.clone()]),
            records: vec![record],
        }
    }

    /// Reserved name for nodes without a material.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Record a host material on first use and return its name.
    pub fn register(&mut self, material: &MaterialInfo) -> String {
        if self.seen.insert(material.name.clone()) {
            self.records.push(MaterialRecord {
                kind: "matte".to_string(),
                name: material.name.clone(),
                diffuse: material.diffuse,
                roughness: self.roughness,
            });
        }
        material.name.clone()
    }

    pub fn into_records(self) -> Vec<MaterialRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> MaterialInfo {
        MaterialInfo {
            name: name.to_string(),
            diffuse: [0.5, 0.5, 0.5],
        }
    }

    #[test]
    fn test_registers_each_material_once() {
        let mut registry = MaterialRegistry::new(&MaterialSettings::default());
        assert_eq!(registry.register(&info("red")), "red");
        assert_eq!(registry.register(&info("red")), "red");
        assert_eq!(registry.register(&info("blue")), "blue");

        let records = registry.into_records();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["white_wall", "red", "blue"]);
        assert!(records.iter().all(|r| r.kind == "matte"));
    }

    #[test]
    fn test_host_material_named_like_default_is_not_duplicated() {
        let mut registry = MaterialRegistry::new(&MaterialSettings::default());
        registry.register(&info("white_wall"));
        assert_eq!(registry.into_records().len(), 1);
    }
}
