//! Film and integrator records built from global settings.

use crate::config::{ExportConfig, FilterSettings, IntegratorSettings};
use crate::types::RenderSettings;
use serde::Serialize;

/// The document's `film` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmRecord {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    /// Number of frames to render.
    pub frames: u32,
    /// First frame, zero-based.
    pub start_frame: i32,
    /// Last frame, zero-based and inclusive.
    pub end_frame: i32,
    /// Length of the rendered interval in seconds.
    pub scene_time: f32,
    pub filter: FilterSettings,
}

/// Film settings for the host's frame range and resolution.
pub fn film(settings: &RenderSettings, config: &ExportConfig) -> FilmRecord {
    let start_frame = settings.frame_start - 1;
    let end_frame = (settings.frame_end - 1).max(start_frame);
    let frames = (end_frame - start_frame + 1) as u32;

    FilmRecord {
        width: settings.width,
        height: settings.height,
        samples: config.samples.unwrap_or(settings.samples),
        frames,
        start_frame,
        end_frame,
        scene_time: frames as f32 / settings.frame_rate,
        filter: config.filter.clone(),
    }
}

pub fn integrator(config: &ExportConfig) -> IntegratorSettings {
    config.integrator.clone()
}
