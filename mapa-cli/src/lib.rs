//! # Mapa CLI
//!
//! Command-line viewer session for parsed DXF drawings.
//!
//! ## Usage
//!
//! ```bash
//! mapa layers fazenda.json
//! mapa render fazenda.json --out out/ -s zoom-in -s toggle:CURVAS
//! mapa submit fazenda.dxf --out out/ --drafter "J. Silva" --scale 1:5000
//! ```
//!
//! Drawings ending in `.json` are read as parsed documents; any other file is
//! uploaded to the layout service first.
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `Session` - Viewer state driven by scripted steps
//! - `commands` - One function per subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;
pub mod script;
pub mod session;

pub use script::{parse_script, ScriptError, Step};
pub use session::{load_drawing, Session};

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mapa_client::{ClientConfig, LayoutForm, RetryPolicy, DEFAULT_USER_EMAIL};

/// Command-line arguments for mapa.
#[derive(Debug, Clone, Parser)]
#[command(name = "mapa")]
#[command(about = "Inspect, render and lay out DXF drawings")]
#[command(version)]
pub struct CliArgs {
    /// Layout service base URL
    #[arg(long, env = "MAPA_SERVICE_URL", default_value = "http://localhost:8000")]
    pub service_url: String,

    /// Identity sent to the layout service
    #[arg(long, env = "MAPA_USER_EMAIL", default_value = DEFAULT_USER_EMAIL)]
    pub user_email: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    pub timeout_secs: u64,

    /// Container width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Container height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Client settings for these arguments.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.service_url.clone(),
            user_email: self.user_email.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryPolicy::default(),
        }
    }
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the drawing's layers with entity counts
    Layers {
        /// Drawing file
        input: PathBuf,
    },

    /// Render the view after a script of interactions
    Render {
        /// Drawing file
        input: PathBuf,

        /// Output directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,

        /// On-screen frame format
        #[arg(long, value_enum, default_value_t = FrameFormat::Svg)]
        format: FrameFormat,

        /// Also write the export capture (mapa.svg, mapa.png)
        #[arg(long)]
        capture: bool,

        /// Viewer steps applied before rendering
        #[command(flatten)]
        script: ScriptArgs,
    },

    /// Capture the view and request a PDF layout
    Submit {
        /// Drawing file
        input: PathBuf,

        /// Directory the generated layout is saved in
        #[arg(long, short, default_value = ".")]
        out: PathBuf,

        /// Viewer steps applied before capture
        #[command(flatten)]
        script: ScriptArgs,

        /// Title-block fields
        #[command(flatten)]
        form: FormArgs,
    },
}

/// On-screen frame formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameFormat {
    /// SVG markup, `view.svg`.
    Svg,
    /// Bitmap at container size, `view.png`.
    Png,
}

/// Scripted interactions applied before rendering.
#[derive(Debug, Clone, Default, Args)]
pub struct ScriptArgs {
    /// Viewer step: zoom-in, zoom-out, pan:DX,DY, toggle:LAYER,
    /// table:LAYER, recenter, keep-labels (repeatable)
    #[arg(long = "step", short = 's')]
    pub steps: Vec<String>,
}

/// Title-block fields of the requested layout.
#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    /// Drafter name
    #[arg(long, default_value = "")]
    pub drafter: String,

    /// Map scale, e.g. 1:5000
    #[arg(long, default_value = "")]
    pub scale: String,

    /// Distance note
    #[arg(long, default_value = "")]
    pub distance: String,

    /// Sugarcane area in hectares
    #[arg(long, default_value = "")]
    pub cane_area: String,

    /// Municipality / state
    #[arg(long, default_value = "")]
    pub municipality: String,

    /// Granting partner
    #[arg(long, default_value = "")]
    pub grantor: String,

    /// Property name (defaults to the drawing name)
    #[arg(long)]
    pub property: Option<String>,

    /// Layout version
    #[arg(long)]
    pub layout_version: Option<String>,
}

impl FormArgs {
    /// The layout form for drawing `stem`.
    #[must_use]
    pub fn into_form(self, stem: &str) -> LayoutForm {
        let mut form = LayoutForm::for_drawing(self.property.unwrap_or_else(|| stem.to_string()));
        form.drafter = self.drafter;
        form.scale = self.scale;
        form.distance = self.distance;
        form.cane_area = self.cane_area;
        form.municipality = self.municipality;
        form.grantor = self.grantor;
        if let Some(version) = self.layout_version {
            form.version = version;
        }
        form
    }
}
