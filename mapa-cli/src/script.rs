//! Scripted viewer input.
//!
//! A script is a sequence of steps given on the command line, each standing
//! in for one interaction with the on-screen viewer:
//!
//! | step            | interaction                              |
//! |-----------------|------------------------------------------|
//! | `zoom-in`       | one wheel tick up                        |
//! | `zoom-out`      | one wheel tick down                      |
//! | `pan:DX,DY`     | a drag of DX by DY pixels                |
//! | `toggle:LAYER`  | show or hide LAYER                       |
//! | `table:LAYER`   | add or remove LAYER from the summary     |
//! | `recenter`      | the recenter button, animated to the end |
//! | `keep-labels`   | keep parcel-area labels in the capture   |

use std::str::FromStr;

use mapa_core::{Action, PanDelta, ZoomDirection};
use thiserror::Error;

/// A step that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The step name is not known.
    #[error("unknown step: {0}")]
    UnknownStep(String),

    /// A step needs an argument that was not given.
    #[error("step {0} needs an argument")]
    MissingArgument(&'static str),

    /// A pan offset is not `DX,DY`.
    #[error("invalid pan offset: {0}")]
    InvalidPan(String),
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Wheel zoom.
    Zoom(ZoomDirection),
    /// A full drag gesture, in pixels.
    Pan {
        /// Horizontal drag.
        dx: f64,
        /// Vertical drag, screen down positive.
        dy: f64,
    },
    /// Layer visibility toggle.
    Toggle(String),
    /// Summary-table selection toggle.
    Table(String),
    /// Animated recenter.
    Recenter,
    /// Keep parcel-area labels in the capture.
    KeepLabels,
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        match name.trim() {
            "zoom-in" => Ok(Self::Zoom(ZoomDirection::In)),
            "zoom-out" => Ok(Self::Zoom(ZoomDirection::Out)),
            "recenter" => Ok(Self::Recenter),
            "keep-labels" => Ok(Self::KeepLabels),
            "pan" => {
                let arg = arg.ok_or(ScriptError::MissingArgument("pan"))?;
                let (dx, dy) = arg
                    .split_once(',')
                    .ok_or_else(|| ScriptError::InvalidPan(arg.to_string()))?;
                let parse = |v: &str| {
                    v.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .ok_or_else(|| ScriptError::InvalidPan(arg.to_string()))
                };
                Ok(Self::Pan {
                    dx: parse(dx)?,
                    dy: parse(dy)?,
                })
            }
            "toggle" => layer_arg(arg, "toggle").map(Self::Toggle),
            "table" => layer_arg(arg, "table").map(Self::Table),
            other => Err(ScriptError::UnknownStep(other.to_string())),
        }
    }
}

// Layer names may contain ':' and spaces, so only empty is rejected.
fn layer_arg(arg: Option<&str>, step: &'static str) -> Result<String, ScriptError> {
    match arg {
        Some(layer) if !layer.is_empty() => Ok(layer.to_string()),
        _ => Err(ScriptError::MissingArgument(step)),
    }
}

impl Step {
    /// Reducer actions for this step in a `width` x `height` container.
    ///
    /// `Recenter` yields only the start action; its frames are driven by
    /// the session clock.
    #[must_use]
    pub fn actions(&self, width: u32, height: u32, now_ms: f64) -> Vec<Action> {
        match self {
            Self::Zoom(direction) => vec![Action::Zoom(*direction)],
            Self::Pan { dx, dy } => vec![
                Action::BeginPan,
                Action::Pan(PanDelta {
                    dx_px: *dx,
                    dy_px: *dy,
                    client_width_px: f64::from(width),
                    client_height_px: f64::from(height),
                }),
                Action::EndPan,
            ],
            Self::Toggle(layer) => vec![Action::ToggleLayer(layer.clone())],
            Self::Table(layer) => vec![Action::ToggleTableLayer(layer.clone())],
            Self::Recenter => vec![Action::Recenter { now_ms }],
            Self::KeepLabels => vec![Action::SetRemoveAreaLabels(false)],
        }
    }
}

/// Parse every step, failing on the first bad one.
///
/// # Errors
///
/// Returns the first [`ScriptError`].
pub fn parse_script<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Step>, ScriptError> {
    steps.iter().map(|s| s.as_ref().parse()).collect()
}
