//! Integration tests for the render-and-capture pipeline (mapa-renderer).
//!
//! Drives a loaded viewer through the scene renderer and capturer and checks
//! draw order, layer filtering, label removal and the exported bitmap.

use std::sync::Arc;

use mapa_core::{Action, Entity, EntityColor, EntityKind, EntityStore, Point, ViewerState};
use mapa_renderer::{
    CaptureConfig, DisplayList, Paint, Primitive, SceneCapturer, SceneInput, SceneRenderer,
};

const DRAWING: &str = r##"{
    "entidades": [
        {"type": "TEXT", "position": [20, 20, 0], "text": "Talhão 7", "layer": "NUMERAÇÕES DOS TALHÕES", "color": [0, 0, 1], "height": 5},
        {"type": "LINE", "start": [0, 0, 0], "end": [100, 0, 0], "layer": "ESTRADAS", "color": [1, 1, 1]},
        {"type": "TEXT", "position": [50, 50], "text": "3.5 ha", "layer": "AREAS", "color": "#FFFFFF"},
        {"type": "TEXT", "position": [60, 50], "text": "3.5 hb", "layer": "AREAS", "color": "red"},
        {"type": "CIRCLE", "center": [50, 50], "radius": 10, "layer": "LOMBADAS", "color": [1, 0, 0]},
        {"type": "HATCH", "layer": "ESTRADAS", "color": [0, 1, 0], "pattern": "SOLID"},
        {"type": "ARC", "center": [0, 0], "radius": 5, "start_angle": 10, "end_angle": 200, "layer": "CURVAS", "color": [0, 0, 0]},
        {"type": "ARC", "center": [0, 0], "radius": 5, "start_angle": 10, "end_angle": 170, "layer": "CURVAS", "color": [0, 0, 0]},
        {"type": "LINE", "start": [0, 0], "layer": "ESTRADAS", "color": [0, 0, 0]}
    ],
    "layers": ["ESTRADAS", "AREAS", "LOMBADAS", "CURVAS", "NUMERAÇÕES DOS TALHÕES"]
}"##;

fn loaded() -> ViewerState {
    let store = EntityStore::from_json(DRAWING).expect("drawing parses");
    ViewerState::default().reduce(&Action::LoadEntities(Arc::new(store)))
}

fn render(state: &ViewerState) -> DisplayList {
    SceneRenderer::default().render(&SceneInput::from(state))
}

fn capturer() -> SceneCapturer {
    SceneCapturer::new(CaptureConfig {
        load_system_fonts: false,
        ..CaptureConfig::default()
    })
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.items()
        .iter()
        .filter_map(|item| match &item.primitive {
            Primitive::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

// ==========================================================================
// Display list
// ==========================================================================

#[test]
fn test_texts_follow_every_shape() {
    let list = render(&loaded());
    let first_text = list
        .items()
        .iter()
        .position(|i| i.primitive.is_text())
        .expect("has text");
    assert!(list.items()[first_text..]
        .iter()
        .all(|i| i.primitive.is_text()));
    assert!(list.items()[0].overlay);
    assert_eq!(texts(&list), vec!["Talhão 7", "3.5 hb"]);
}

#[test]
fn test_white_ink_resolves_to_black() {
    let list = render(&loaded());
    let road = list.on_layer("ESTRADAS").next().expect("road drawn");
    assert_eq!(road.style.stroke, Paint::Color("black".into()));

    let circle = list.on_layer("LOMBADAS").next().expect("berm drawn");
    assert_eq!(circle.style.fill, Paint::Color("rgb(255,0,0)".into()));
}

#[test]
fn test_area_label_flag() {
    let state = loaded();
    assert!(state.remove_area_labels());
    assert_eq!(texts(&render(&state)), vec!["Talhão 7", "3.5 hb"]);

    let kept = state.reduce(&Action::SetRemoveAreaLabels(false));
    assert_eq!(texts(&render(&kept)), vec!["Talhão 7", "3.5 ha", "3.5 hb"]);
}

#[test]
fn test_arc_flags() {
    let list = render(&loaded());
    let flags: Vec<bool> = list
        .on_layer("CURVAS")
        .filter_map(|i| match i.primitive {
            Primitive::Arc { large_arc, .. } => Some(large_arc),
            _ => None,
        })
        .collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn test_malformed_and_hatch_are_skipped() {
    let list = render(&loaded());
    // One valid road line: the hatch and the endpoint-less line draw nothing.
    assert_eq!(list.on_layer("ESTRADAS").count(), 1);
}

#[test]
fn test_layer_toggle_round_trip() {
    let state = loaded();
    let before = render(&state);

    let hidden = state.reduce(&Action::ToggleLayer("LOMBADAS".into()));
    assert_eq!(render(&hidden).on_layer("LOMBADAS").count(), 0);

    let restored = hidden.reduce(&Action::ToggleLayer("LOMBADAS".into()));
    assert_eq!(render(&restored), before);
}

#[test]
fn test_draw_order_independent_of_list_order() {
    let line = Entity::line("L", Point::new(0.0, 0.0), Point::new(5.0, 5.0));
    let label = Entity::text("L", Point::new(1.0, 1.0), "A");
    for entities in [vec![line.clone(), label.clone()], vec![label, line]] {
        let state = ViewerState::default()
            .reduce(&Action::LoadEntities(Arc::new(EntityStore::new(entities))));
        let kinds: Vec<bool> = render(&state)
            .items()
            .iter()
            .filter(|i| !i.overlay)
            .map(|i| i.primitive.is_text())
            .collect();
        assert_eq!(kinds, vec![false, true]);
    }
}

// ==========================================================================
// Capture
// ==========================================================================

#[test]
fn test_capture_is_three_times_container() {
    let list = render(&loaded());
    let artifact = capturer().capture(&list, 200, 120).expect("capture");

    let decoded = image::load_from_memory(&artifact.png).expect("valid png");
    assert_eq!((decoded.width(), decoded.height()), (600, 360));
    assert_eq!((artifact.width, artifact.height), (600, 360));
}

#[test]
fn test_capture_excludes_overlay_but_screen_keeps_it() {
    let list = render(&loaded());
    let artifact = capturer().capture(&list, 200, 120).expect("capture");
    assert!(!artifact.svg.contains("capture-overlay"));
    assert!(artifact.svg.contains("<circle"));

    // The on-screen list still has its border.
    assert!(list.items().iter().any(|i| i.overlay));
}

#[test]
fn test_capture_markup_uses_render_view_box() {
    let state = loaded();
    let vp = state.viewport();
    let artifact = capturer()
        .capture(&render(&state), 200, 120)
        .expect("capture");
    let expected = format!("viewBox=\"{} {} {} {}\"", vp.x, 0.0 - (vp.y + vp.h), vp.w, vp.h);
    assert!(artifact.svg.contains(&expected), "{}", artifact.svg);
}

#[test]
fn test_capture_renders_filled_berm() {
    let berm = Entity::circle("LOMBADAS", Point::new(0.0, 0.0), 40.0)
        .with_color(EntityColor::Rgb([1.0, 0.0, 0.0]));
    let state =
        ViewerState::default().reduce(&Action::LoadEntities(Arc::new(EntityStore::new(vec![berm]))));
    let artifact = capturer()
        .capture(&render(&state), 100, 100)
        .expect("capture");

    let rgba = image::load_from_memory(&artifact.png)
        .expect("valid png")
        .to_rgba8();
    let center = rgba.get_pixel(150, 150);
    assert_eq!(center.0, [255, 0, 0, 255]);
}

#[test]
fn test_unknown_kind_is_not_rendered() {
    let mut face = Entity::new(EntityKind::Other("3DFACE".into()), "L");
    face.points = Some(vec![Point::new(0.0, 0.0).into(), Point::new(1.0, 1.0).into()]);
    let state =
        ViewerState::default().reduce(&Action::LoadEntities(Arc::new(EntityStore::new(vec![face]))));
    assert_eq!(render(&state).len(), 1);
}

#[test]
fn test_control_character_in_label_does_not_abort_capture() {
    let road = Entity::line("ESTRADAS", Point::new(0.0, 0.0), Point::new(10.0, 10.0));
    let label = Entity::text("TALHOES", Point::new(5.0, 5.0), "Talh\u{1}o");
    let state = ViewerState::default()
        .reduce(&Action::LoadEntities(Arc::new(EntityStore::new(vec![road, label]))));

    let artifact = capturer()
        .try_capture(&render(&state), 50, 50)
        .expect("capture");
    assert!(artifact.svg.contains(">Talho</text>"));
    assert!(artifact.svg.contains("<line"));
}
