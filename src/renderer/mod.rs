//! Owns the render pipeline's concurrency: preferences, the worker pool,
//! and the supervisory controller that drives them to completion (§4.5-4.8,
//! §5, §6, §7).

mod controller;
mod scheduler;
mod worker;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Condvar, Mutex};

use crate::film::FilmSettings;

pub use controller::{DisplayCallback, RenderController, RenderOutput, RenderProgress};

pub type AbortFlag = Arc<AtomicBool>;

/// Shared pause/resume state: one flag, one condvar, woken on every toggle
/// so workers re-check at most 100ms late rather than each polling their own
/// flag independently (§5, §9).
#[derive(Default)]
pub struct PauseState {
    pub flag: Mutex<bool>,
    pub condvar: Condvar,
}

/// Host-issued control events (§6). `Interrupt` and `Discard` both abort
/// without keeping the in-progress image; they're kept distinct because a
/// host UI reasonably separates "stop, I don't want this" from "stop, I
/// changed my mind" even though this renderer treats them identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Interrupt,
    Save,
    Discard,
    TogglePause,
}

/// The stand-in output encoder is PPM (§1, §G non-goals exclude PNG/BMP
/// decode and encode); this enum exists so `Prefs` has a place for the
/// original's `imgType` field to land without implying more encoders exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageType {
    Ppm,
}

impl Default for ImageType {
    fn default() -> Self {
        ImageType::Ppm
    }
}

/// User-facing render preferences, loadable from a YAML file (§ SPEC_FULL
/// section D). `thread_count == 0` means "use all available cores."
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Prefs {
    pub image_width: u32,
    pub image_height: u32,
    pub sample_count: u32,
    pub bounces: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default)]
    pub thread_count: usize,
    #[serde(default = "default_true")]
    pub antialiasing: bool,
    #[serde(default)]
    pub image_type: ImageType,
}

fn default_true() -> bool {
    true
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            sample_count: 64,
            bounces: 8,
            tile_width: 32,
            tile_height: 32,
            thread_count: 0,
            antialiasing: true,
            image_type: ImageType::Ppm,
        }
    }
}

impl Prefs {
    pub fn film_settings(&self) -> FilmSettings {
        FilmSettings {
            width: self.image_width,
            height: self.image_height,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        }
    }

    /// Loads preferences from a YAML file, falling back to nothing: every
    /// field is required or defaulted explicitly above, there's no partial
    /// merge with a running default (§ SPEC_FULL section D).
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self, PrefsError> {
        let contents = std::fs::read_to_string(path).map_err(PrefsError::Io)?;
        serde_yaml::from_str(&contents).map_err(PrefsError::Parse)
    }
}

#[derive(Debug)]
pub enum PrefsError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "could not read prefs file: {e}"),
            PrefsError::Parse(e) => write!(f, "could not parse prefs file: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}

/// Fatal, non-recoverable render failures (§7). Per-sample and per-pixel
/// anomalies never reach here; they're clamped at the integrator and film
/// boundaries instead.
#[derive(Debug)]
pub enum RenderError {
    WorkerSpawnFailed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::WorkerSpawnFailed => {
                write!(f, "failed to spawn a render worker thread")
            }
        }
    }
}

impl std::error::Error for RenderError {}
