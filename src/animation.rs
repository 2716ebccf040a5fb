//! Sampling of hierarchical animation into linear keyframe splines.
//!
//! A node moves whenever it or any ancestor is animated, so the sampled range is
//! the union of every animated range along the parent chain. The renderer only
//! interpolates linearly, so splines are always degree 1 with one sample per frame.

use crate::error::{ExportError, Result};
use crate::space::SpaceConverter;
use crate::types::{FrameRange, HostScene, NodeId, ParentKind, TransformOp};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

/// Spline degree the renderer supports.
pub const SPLINE_DEGREE: u32 = 1;

/// One sampled transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPoint {
    pub transform: Vec<TransformOp>,
}

/// Transform animation as knots (seconds) and per-sample transforms.
///
/// `knots.len() == control_points.len() + 2`: the first and last sample times are
/// repeated once so the renderer clamps at both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeSpline {
    pub knots: Vec<f32>,
    pub control_points: Vec<ControlPoint>,
    pub degree: u32,
}

/// Scalar animation (camera field of view), same layout as [`KeyframeSpline`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarSpline {
    pub knots: Vec<f32>,
    pub values: Vec<f32>,
    pub degree: u32,
}

/// Playback cursor guard: restores the frame it was created at when dropped.
pub struct FrameCursor<'a, S: HostScene + ?Sized> {
    scene: &'a mut S,
    saved: i32,
}

impl<'a, S: HostScene + ?Sized> FrameCursor<'a, S> {
    pub fn new(scene: &'a mut S) -> Self {
        let saved = scene.current_frame();
        Self { scene, saved }
    }

    /// Frame the cursor will return to.
    pub fn saved_frame(&self) -> i32 {
        self.saved
    }
}

impl<S: HostScene + ?Sized> Deref for FrameCursor<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: HostScene + ?Sized> DerefMut for FrameCursor<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: HostScene + ?Sized> Drop for FrameCursor<'_, S> {
    fn drop(&mut self) {
        self.scene.set_current_frame(self.saved);
    }
}

/// Union of the animation ranges along the object-parent chain of `node`.
///
/// Bone and vertex parents are not followed. Returns `None` when nothing in the
/// chain is animated.
pub fn animated_range<S: HostScene + ?Sized>(
    scene: &S,
    node: NodeId,
) -> Result<Option<FrameRange>> {
    let mut visited = HashSet::new();
    let mut range: Option<FrameRange> = None;
    let mut current = Some(node);

    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(ExportError::CyclicParenting(scene.name(id).to_string()));
        }
        if let Some(own) = scene.animation_range(id) {
            range = Some(match range {
                Some(r) => r.union(own),
                None => own,
            });
        }
        current = scene
            .parent(id)
            .filter(|link| link.kind == ParentKind::Object)
            .map(|link| link.node);
    }

    Ok(range)
}

/// Sample the world transform of `node` at every frame of its animated range.
pub fn sample<S: HostScene + ?Sized>(
    scene: &mut S,
    node: NodeId,
    converter: SpaceConverter,
    frame_rate: f32,
) -> Result<Option<KeyframeSpline>> {
    let Some(range) = animated_range(scene, node)? else {
        return Ok(None);
    };

    let (knots, control_points) = sample_frames(scene, range, frame_rate, |scene| {
        let world = converter.apply(scene.world_transform(node));
        ControlPoint {
            transform: vec![TransformOp::matrix(world)],
        }
    });

    log::debug!(
        "Sampled '{}' over frames {}..={} ({} control points)",
        scene.name(node),
        range.start,
        range.end,
        control_points.len()
    );

    Ok(Some(KeyframeSpline {
        knots,
        control_points,
        degree: SPLINE_DEGREE,
    }))
}

/// Sample a camera's field of view if it is animated.
pub fn sample_fov<S: HostScene + ?Sized>(
    scene: &mut S,
    camera: NodeId,
    frame_rate: f32,
) -> Option<ScalarSpline> {
    let range = scene.fov_animation_range(camera)?;
    let fallback = scene.camera_fov(camera).unwrap_or_default();

    let (knots, values) = sample_frames(scene, range, frame_rate, |scene| {
        scene.camera_fov(camera).unwrap_or(fallback)
    });

    Some(ScalarSpline {
        knots,
        values,
        degree: SPLINE_DEGREE,
    })
}

/// Evaluate `eval` once per frame of `range`, returning padded knots and samples.
///
/// Frame `f` (zero-based) is evaluated with the host cursor at `f + 1` and lands
/// at time `f / frame_rate`.
fn sample_frames<S, T, F>(
    scene: &mut S,
    range: FrameRange,
    frame_rate: f32,
    mut eval: F,
) -> (Vec<f32>, Vec<T>)
where
    S: HostScene + ?Sized,
    F: FnMut(&S) -> T,
{
    let first = range.start - 1;
    let last = range.end - 1;

    let mut knots = Vec::with_capacity(range.len() + 2);
    let mut samples = Vec::with_capacity(range.len());

    let mut cursor = FrameCursor::new(scene);
    knots.push(first as f32 / frame_rate);
    for frame in first..=last {
        cursor.set_current_frame(frame + 1);
        samples.push(eval(&*cursor));
        knots.push(frame as f32 / frame_rate);
    }
    knots.push(last as f32 / frame_rate);
    drop(cursor);

    (knots, samples)
}
