//! Rest-pose scene mutation around the geometry export.
//!
//! The geometry exporter writes vertices using the host's current transforms, so
//! the scene is put into a rest pose first: animation muted, parents detached and
//! local transforms cleared. [`SceneTransaction`] owns the scene for that window
//! and puts everything back when dropped, whatever happened in between.

use crate::types::{HostScene, NodeId, ParentLink, SceneNode};
use glam::Mat4;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

/// Scoped rest-pose mutation of a host scene.
pub struct SceneTransaction<'a, S: HostScene + ?Sized> {
    scene: &'a mut S,
    /// Mute flag of every node before the transaction.
    muted: Vec<(NodeId, bool)>,
    /// Parent links removed in step (b).
    detached: Vec<(NodeId, ParentLink)>,
    /// Local transforms captured when the nodes were classified.
    transforms: Vec<(NodeId, Mat4)>,
}

impl<'a, S: HostScene + ?Sized> SceneTransaction<'a, S> {
    /// Mute all animation, detach every parented node and clear local transforms.
    ///
    /// `captured` supplies the transforms restored on drop. Nodes missing from it
    /// keep the transform they had when the transaction began.
    pub fn begin(scene: &'a mut S, captured: &[SceneNode]) -> Self {
        let nodes = scene.nodes();

        let captured_ids: HashSet<NodeId> = captured.iter().map(|n| n.id).collect();
        let mut transforms: Vec<(NodeId, Mat4)> =
            captured.iter().map(|n| (n.id, n.local)).collect();
        for &id in &nodes {
            if !captured_ids.contains(&id) {
                transforms.push((id, scene.local_transform(id)));
            }
        }

        let mut muted = Vec::with_capacity(nodes.len());
        for &id in &nodes {
            muted.push((id, scene.is_animation_muted(id)));
            scene.set_animation_muted(id, true);
        }

        let mut detached = Vec::new();
        for &id in &nodes {
            if let Some(link) = scene.parent(id) {
                detached.push((id, link));
                scene.set_parent(id, None);
            }
        }

        for &id in &nodes {
            scene.set_local_transform(id, Mat4::IDENTITY);
        }

        log::debug!(
            "Scene in rest pose: {} nodes muted, {} detached",
            muted.len(),
            detached.len()
        );

        Self {
            scene,
            muted,
            detached,
            transforms,
        }
    }

    /// The scene in its rest pose.
    pub fn scene(&self) -> &S {
        self.scene
    }

    /// Number of parent links that will be restored.
    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }
}

impl<S: HostScene + ?Sized> Deref for SceneTransaction<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: HostScene + ?Sized> DerefMut for SceneTransaction<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: HostScene + ?Sized> Drop for SceneTransaction<'_, S> {
    fn drop(&mut self) {
        for &(id, link) in &self.detached {
            self.scene.set_parent(id, Some(link));
        }
        for &(id, transform) in &self.transforms {
            self.scene.set_local_transform(id, transform);
        }
        for &(id, muted) in &self.muted {
            self.scene.set_animation_muted(id, muted);
        }
        log::debug!("Scene restored from rest pose");
    }
}
