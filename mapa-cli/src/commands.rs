//! Subcommand implementations.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use mapa_client::{drawing_name, drawing_stem, ExportPayload, LayoutClient};
use mapa_core::{EntityStore, ViewerConfig};
use mapa_renderer::{
    BackendType, LayerRules, Renderer, RendererConfig, SceneCapturer, SceneInput, SceneRenderer,
};

use crate::script::{parse_script, Step};
use crate::session::{load_drawing, Session};
use crate::{CliArgs, Command, FormArgs, FrameFormat};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the first failure of the selected subcommand.
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let client = LayoutClient::new(args.client_config())?;
    let size = (args.width, args.height);
    match args.command {
        Command::Layers { input } => {
            let store = load_drawing(&input, &client).await?;
            print!("{}", layer_table(&store, &LayerRules::default()));
            Ok(())
        }
        Command::Render {
            input,
            out,
            format,
            capture,
            script,
        } => {
            let steps = parse_script(&script.steps)?;
            let session = scripted_session(&input, &client, &steps, size).await?;
            for path in render(&session, &out, format, capture).await? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Submit {
            input,
            out,
            script,
            form,
        } => {
            let steps = parse_script(&script.steps)?;
            let session = scripted_session(&input, &client, &steps, size).await?;
            let saved = submit(&session, &client, &input, form, &out).await?;
            println!("{}", saved.display());
            Ok(())
        }
    }
}

async fn scripted_session(
    input: &Path,
    client: &LayoutClient,
    steps: &[Step],
    (width, height): (u32, u32),
) -> anyhow::Result<Session> {
    let store = load_drawing(input, client).await?;
    let mut session = Session::new(store, ViewerConfig::default(), width, height);
    session.run_all(steps).await;
    Ok(session)
}

/// One line per layer: name, entity count and styling class.
#[must_use]
pub fn layer_table(store: &EntityStore, rules: &LayerRules) -> String {
    let mut table = String::new();
    for layer in store.layers() {
        let class = rules.classify(layer);
        let mut tags = Vec::new();
        if class.legend {
            tags.push("legend");
        }
        if class.fill {
            tags.push("fill");
        }
        if class.numbering {
            tags.push("numbering");
        }
        let _ = writeln!(
            table,
            "{layer}\t{}\t{}",
            store.count_on(layer),
            tags.join(",")
        );
    }
    table
}

/// Write the on-screen frame (and optionally the export capture) into `out`.
///
/// # Errors
///
/// Returns an error if rendering fails or a file cannot be written.
pub async fn render(
    session: &Session,
    out: &Path,
    format: FrameFormat,
    capture: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let (width, height) = session.size();
    let (backend, file_name) = match format {
        FrameFormat::Svg => (BackendType::Svg, "view.svg"),
        FrameFormat::Png => (BackendType::Raster, "view.png"),
    };
    let mut renderer = Renderer::new(RendererConfig {
        backend,
        width,
        height,
        ..RendererConfig::default()
    });
    renderer.render_frame(session.state())?;
    let frame = renderer.encode_frame()?;

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create {}", out.display()))?;
    let mut written = vec![out.join(file_name)];
    tokio::fs::write(&written[0], frame).await?;

    if capture {
        let list = renderer.scene().render(&SceneInput::from(session.state()));
        let artifact = SceneCapturer::with_defaults()
            .try_capture(&list, width, height)
            .context("Capture failed")?;
        let svg = out.join("mapa.svg");
        let png = out.join("mapa.png");
        tokio::fs::write(&svg, artifact.svg).await?;
        tokio::fs::write(&png, artifact.png).await?;
        written.push(svg);
        written.push(png);
    }
    tracing::info!("Rendered {} file(s) into {}", written.len(), out.display());
    Ok(written)
}

/// Capture the session's view, request a layout and save it into `out`.
///
/// # Errors
///
/// Returns an error if capture, submission or download fails. The session
/// is left untouched either way.
pub async fn submit(
    session: &Session,
    client: &LayoutClient,
    input: &Path,
    form: FormArgs,
    out: &Path,
) -> anyhow::Result<PathBuf> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .context("Drawing path has no file name")?;
    // A parsed document names the drawing it came from: fazenda.json -> fazenda.dxf
    let stem = match (input.extension(), input.file_stem().and_then(|s| s.to_str())) {
        (Some(ext), Some(stem)) if ext.eq_ignore_ascii_case("json") => stem,
        _ => drawing_stem(file_name),
    };

    let payload = ExportPayload::capture(
        session.state(),
        &SceneRenderer::default(),
        &SceneCapturer::with_defaults(),
        session.size(),
        drawing_name(stem),
        form.into_form(stem),
    )?;
    tracing::info!(
        "Submitting {} with {} visible layers",
        payload.drawing_name,
        payload.visible_layers.len()
    );
    client
        .export(payload, out)
        .await
        .context("Layout export failed")
}
