//! Host scene implementations.
//!
//! The exporter talks to the authoring application through [`HostScene`](crate::HostScene).
//! [`MemoryScene`] is a self-contained host that can be built in code or loaded from a
//! JSON scene description, which is how the CLI and the tests drive the exporter.

mod description;
mod memory;

pub use description::{
    KeyDescription, MarkerDescription, NodeDescription, ParentDescription, SceneDescription,
    TrsDescription,
};
pub use memory::{MemoryScene, MeshData, Trs};
