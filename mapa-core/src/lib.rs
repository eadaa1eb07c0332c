//! # Mapa Core
//!
//! Viewer logic for parsed DXF drawings, independent of any rendering
//! surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 mapa-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Entity Store    │  Viewport Engine         │
//! │  - Entities      │  - Bounds / padding      │
//! │  - Layer set     │  - Zoom / pan            │
//! │  - Shapes        │  - Recenter animation    │
//! ├─────────────────────────────────────────────┤
//! │  Viewer State    │  Labels                  │
//! │  - Reducer       │  - Parcel-area detection │
//! │  - Visibility    │                          │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod animation;
pub mod config;
pub mod entity;
pub mod error;
pub mod label;
pub mod state;
pub mod store;
pub mod viewport;

pub use action::{Action, PanDelta};
pub use animation::{Animation, AnimationToken};
pub use config::ViewerConfig;
pub use entity::{Coord, Entity, EntityColor, EntityKind, Point, Shape};
pub use error::{CoreError, CoreResult};
pub use label::is_area_label;
pub use state::ViewerState;
pub use store::EntityStore;
pub use viewport::{Bounds, Viewport, ZoomDirection};

/// Mapa core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
