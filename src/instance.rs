//! Deduplication of mesh instances that share mesh data.
//!
//! The geometry file must hold each mesh-data block once. The first node that
//! references a block becomes its primary and is handed to the geometry exporter;
//! every later node is an alias that points at the same model name.

use crate::types::NodeId;
use std::collections::HashMap;

/// Outcome of resolving one mesh node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Model name inside the geometry file.
    pub model: String,
    /// Whether this node carries the geometry into the export.
    pub primary: bool,
}

/// A primary node selected for the geometry export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMesh {
    pub node: NodeId,
    pub model: String,
}

/// Maps mesh-data identity to the model name chosen for it.
#[derive(Debug, Default)]
pub struct InstanceDeduplicator {
    models: HashMap<String, String>,
    selection: Vec<SelectedMesh>,
}

impl InstanceDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the model name for a node referencing `mesh_data`.
    pub fn resolve(&mut self, mesh_data: &str, node: NodeId, node_name: &str) -> Instance {
        if let Some(model) = self.models.get(mesh_data) {
            log::debug!(
                "'{}' is an instance of '{}' (mesh data '{}')",
                node_name,
                model,
                mesh_data
            );
            return Instance {
                model: model.clone(),
                primary: false,
            };
        }

        let model = model_name(node_name, mesh_data);
        self.models.insert(mesh_data.to_string(), model.clone());
        self.selection.push(SelectedMesh {
            node,
            model: model.clone(),
        });

        Instance {
            model,
            primary: true,
        }
    }

    /// Primary nodes in the order they were resolved.
    pub fn selection(&self) -> &[SelectedMesh] {
        &self.selection
    }

    /// Number of distinct mesh-data blocks seen.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Name the geometry exporter gives an object: the mesh-data name, prefixed by
/// the node name when the two differ.
pub fn model_name(node_name: &str, mesh_data: &str) -> String {
    if node_name == mesh_data {
        mesh_data.to_string()
    } else {
        format!("{}_{}", node_name, mesh_data)
    }
}
