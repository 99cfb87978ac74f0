//! Interactive viewer built on macroquad.
//!
//! The viewer owns the slider state as a plain [`Settings`] value. Whenever
//! that value changes, the field is evaluated again from scratch and the
//! new result replaces the old one. Tab cycles through the three views.

use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets, Ui};
use nalgebra::Point3;

use crate::{
    assets,
    config,
    field::{Ellipse, Evaluation, PolarizationField, Wave},
    output,
    scene::{PlaneView, WaveScene},
    settings::{Mode, Settings},
};

const SIDEBAR_WIDTH: f32 = 300.0;
const MARGIN: f32 = 10.0;
const WAVE_COLOR: Color = Color::new(0.75, 0.0, 0.0, 1.0);
const ELLIPSE_COLOR: Color = Color::new(0.0, 0.447, 0.698, 1.0);
const WALL_COLOR: Color = Color::new(0.83, 0.83, 0.83, 0.5);
const AXIS_COLOR: Color = Color::new(0.5, 0.5, 0.5, 1.0);

/// Runs the viewer until the window is closed.
pub async fn run(settings: Settings) {
    let logo = assets::load_configured_logo(&settings).and_then(|logo| decode_logo(&logo));

    let mut state = settings;
    let mut evaluated: Option<Settings> = None;
    let mut evaluation: Option<Evaluation> = None;

    loop {
        if is_key_pressed(KeyCode::Tab) {
            state.mode = next_mode(state.mode);
        }

        clear_background(WHITE);
        sidebar(&mut state, logo.as_ref(), evaluation.as_ref());

        if evaluated.as_ref() != Some(&state) {
            evaluation = evaluate(&state);
            evaluated = Some(state.clone());
        }

        match &evaluation {
            Some(Evaluation::Ellipse(ellipse)) => draw_ellipse_view(ellipse),
            Some(Evaluation::Wave(wave)) => draw_wave_view(wave, &state),
            None => {}
        }

        next_frame().await
    }
}

fn evaluate(settings: &Settings) -> Option<Evaluation> {
    let result = PolarizationField::new(settings.sampling())
        .and_then(|field| field.evaluate(&settings.parameters()));
    match result {
        Ok(evaluation) => Some(evaluation),
        Err(err) => {
            tracing::warn!("Could not evaluate {}: {:#}", settings.mode, err);
            None
        }
    }
}

fn decode_logo(logo: &assets::Logo) -> Option<Texture2D> {
    match Image::from_file_with_format(&logo.bytes, None) {
        Ok(image) => Some(Texture2D::from_image(&image)),
        Err(err) => {
            tracing::warn!("Failed to decode logo {:?}: {}", logo.path, err);
            None
        }
    }
}

fn next_mode(mode: Mode) -> Mode {
    match mode {
        Mode::Ellipse => Mode::WaveEllipticity,
        Mode::WaveEllipticity => Mode::WavePhase,
        Mode::WavePhase => Mode::Ellipse,
    }
}

fn sidebar(state: &mut Settings, logo: Option<&Texture2D>, evaluation: Option<&Evaluation>) {
    widgets::Window::new(
        hash!(),
        vec2(MARGIN, MARGIN),
        vec2(SIDEBAR_WIDTH, screen_height() - 2.0 * MARGIN),
    )
    .label("Polarization Visualizer")
    .movable(false)
    .ui(&mut root_ui(), |ui| {
        if let Some(texture) = logo {
            let width = SIDEBAR_WIDTH - 2.0 * MARGIN;
            let height = width * texture.height() / texture.width();
            ui.texture(texture.clone(), width, height);
        }
        ui.separator();

        if ui.button(None, "Ellipse") {
            state.mode = Mode::Ellipse;
        }
        ui.same_line(0.0);
        if ui.button(None, "Wave (ellipticity)") {
            state.mode = Mode::WaveEllipticity;
        }
        ui.same_line(0.0);
        if ui.button(None, "Wave (phase)") {
            state.mode = Mode::WavePhase;
        }
        ui.separator();

        match state.mode {
            Mode::Ellipse => {
                bounded_slider(
                    ui,
                    hash!(),
                    "Amplitude (H)",
                    config::AMPLITUDE_BOUNDS,
                    &mut state.ellipse.amplitude_h,
                );
                bounded_slider(
                    ui,
                    hash!(),
                    "Amplitude (V)",
                    config::AMPLITUDE_BOUNDS,
                    &mut state.ellipse.amplitude_v,
                );
                bounded_slider(
                    ui,
                    hash!(),
                    "Phase Difference (δ)",
                    config::PHASE_BOUNDS,
                    &mut state.ellipse.phase_diff,
                );
                state.ellipse.phase_diff = state.ellipse.phase_diff.round();
            }
            Mode::WaveEllipticity => {
                bounded_slider(
                    ui,
                    hash!(),
                    "Ellipticity Angle (°)",
                    config::ELLIPTICITY_BOUNDS,
                    &mut state.wave.ellipticity,
                );
                bounded_slider(
                    ui,
                    hash!(),
                    "Orientation Angle (°)",
                    config::ORIENTATION_BOUNDS,
                    &mut state.wave.orientation,
                );
                state.wave.ellipticity = state.wave.ellipticity.round();
                state.wave.orientation = state.wave.orientation.round();
            }
            Mode::WavePhase => {
                bounded_slider(
                    ui,
                    hash!(),
                    "Orientation Angle (°)",
                    config::ORIENTATION_BOUNDS,
                    &mut state.wave.orientation,
                );
                bounded_slider(
                    ui,
                    hash!(),
                    "Phase Difference (°)",
                    config::PHASE_BOUNDS,
                    &mut state.wave.phase_diff,
                );
                state.wave.orientation = state.wave.orientation.round();
                state.wave.phase_diff = state.wave.phase_diff.round();
            }
        }

        if state.mode != Mode::Ellipse {
            ui.separator();
            ui.slider(hash!(), "Azimuth", 0.0..360.0, &mut state.camera.azimuth);
            ui.slider(hash!(), "Elevation", -90.0..90.0, &mut state.camera.elevation);
            ui.slider(hash!(), "Distance", 1.0..5.0, &mut state.camera.radius);

            if let Some(evaluation) = evaluation {
                ui.separator();
                for metric in output::metrics(evaluation) {
                    ui.label(None, &format!("{}: {}", metric.label, metric.value));
                }
            }
        }
    });
}

fn bounded_slider(
    ui: &mut Ui,
    id: u64,
    label: &str,
    bounds: std::ops::RangeInclusive<f32>,
    value: &mut f32,
) {
    ui.slider(id, label, *bounds.start()..*bounds.end(), value);
}

/// Maps the fixed plot axes onto the screen area right of the sidebar.
struct PlotArea {
    left: f32,
    top: f32,
    size: f32,
    limit: f32,
}

impl PlotArea {
    fn new(view: &PlaneView) -> Self {
        let left = SIDEBAR_WIDTH + 4.0 * MARGIN;
        let available_w = (screen_width() - left) * 4.0 / 7.0;
        let available_h = screen_height() - 10.0 * MARGIN;
        Self {
            left,
            top: 5.0 * MARGIN,
            size: available_w.min(available_h),
            limit: *view.x_range.end(),
        }
    }

    fn to_screen(&self, x: f32, y: f32) -> Vec2 {
        let scale = self.size / (2.0 * self.limit);
        vec2(
            self.left + (x + self.limit) * scale,
            self.top + (self.limit - y) * scale,
        )
    }
}

fn draw_ellipse_view(ellipse: &Ellipse) {
    let view = PlaneView::default();
    let area = PlotArea::new(&view);

    // grid and ticks
    for &tick in &view.ticks {
        let a = area.to_screen(tick, -area.limit);
        let b = area.to_screen(tick, area.limit);
        draw_line(a.x, a.y, b.x, b.y, 1.0, Color::new(0.0, 0.0, 0.0, 0.1));
        draw_text(&format!("{}", tick), a.x - 6.0, a.y + 20.0, 18.0, DARKGRAY);
        let a = area.to_screen(-area.limit, tick);
        let b = area.to_screen(area.limit, tick);
        draw_line(a.x, a.y, b.x, b.y, 1.0, Color::new(0.0, 0.0, 0.0, 0.1));
        draw_text(&format!("{}", tick), a.x - 24.0, a.y + 5.0, 18.0, DARKGRAY);
    }
    for (start, end) in &view.crosshair {
        let a = area.to_screen(start.x, start.y);
        let b = area.to_screen(end.x, end.y);
        draw_dashed_line(a, b, AXIS_COLOR);
    }
    draw_rectangle_lines(area.left, area.top, area.size, area.size, 1.0, BLACK);

    let points = ellipse.trajectory.points_2d();
    for pair in points.windows(2) {
        let a = area.to_screen(pair[0].x, pair[0].y);
        let b = area.to_screen(pair[1].x, pair[1].y);
        draw_line(a.x, a.y, b.x, b.y, 2.0, ELLIPSE_COLOR);
    }

    draw_text(
        "Polarization Visualization",
        area.left,
        area.top - 15.0,
        28.0,
        BLACK,
    );
    draw_text(
        "Horizontal Component (H)",
        area.left + area.size / 2.0 - 100.0,
        area.top + area.size + 45.0,
        22.0,
        BLACK,
    );
    draw_text(
        "Vertical Component (V)",
        area.left + 8.0,
        area.top + 22.0,
        22.0,
        BLACK,
    );

    // metrics panel
    let x = area.left + area.size + 6.0 * MARGIN;
    let mut y = area.top + 20.0;
    draw_text("Wave Parameters", x, y, 30.0, BLACK);
    let evaluation = Evaluation::Ellipse(ellipse.clone());
    for metric in output::metrics(&evaluation) {
        y += 50.0;
        draw_text(&metric.label, x, y, 20.0, DARKGRAY);
        draw_text(&metric.value, x, y + 30.0, 36.0, BLACK);
    }
}

fn draw_dashed_line(a: Vec2, b: Vec2, color: Color) {
    let length = a.distance(b);
    let dash = 8.0;
    let steps = (length / dash) as usize;
    for i in (0..steps).step_by(2) {
        let p = a.lerp(b, i as f32 / steps as f32);
        let q = a.lerp(b, (i + 1) as f32 / steps as f32);
        draw_line(p.x, p.y, q.x, q.y, 1.0, color);
    }
}

/// Scales the propagation axis so the scene keeps its aspect ratio and
/// centres it on the origin.
struct SpaceTransform {
    length: f32,
    z_scale: f32,
}

impl SpaceTransform {
    fn new(length: f32) -> Self {
        let [ax, _, az] = config::SPACE_ASPECT;
        let span = 2.0 * config::SPACE_TRANSVERSE_LIMIT;
        Self {
            length,
            z_scale: az / ax * span / length,
        }
    }

    fn to_world(&self, p: &Point3<f32>) -> Vec3 {
        vec3(p.x, p.y, (p.z - 0.5 * self.length) * self.z_scale)
    }
}

fn draw_wave_view(wave: &Wave, state: &Settings) {
    let scene = match WaveScene::new(wave, &state.camera) {
        Ok(scene) => scene,
        Err(err) => {
            tracing::warn!("Could not build the wave scene: {:#}", err);
            return;
        }
    };
    let transform = SpaceTransform::new(wave.length);
    let span = 2.0 * config::SPACE_TRANSVERSE_LIMIT;
    let eye = scene.camera.eye;

    set_camera(&Camera3D {
        position: vec3(eye.x, eye.y, eye.z) * span,
        target: vec3(0.0, 0.0, 0.0),
        up: vec3(scene.camera.up.x, scene.camera.up.y, scene.camera.up.z),
        ..Default::default()
    });

    // axes
    let limit = *scene.view.transverse_range.end();
    let origin = Point3::new(0.0, 0.0, 0.0);
    let axes = [
        (Point3::new(-limit, 0.0, 0.0), Point3::new(limit, 0.0, 0.0)),
        (Point3::new(0.0, -limit, 0.0), Point3::new(0.0, limit, 0.0)),
        (origin, Point3::new(0.0, 0.0, *scene.view.longitudinal_range.end())),
    ];
    for (start, end) in &axes {
        draw_line_3d(transform.to_world(start), transform.to_world(end), AXIS_COLOR);
    }

    for wall in &scene.walls {
        let corners: Vec<Vec3> = wall.corners.iter().map(|c| transform.to_world(c)).collect();
        let min = corners.iter().fold(corners[0], |acc, c| acc.min(*c));
        let max = corners.iter().fold(corners[0], |acc, c| acc.max(*c));
        let size = (max - min).max(vec3(0.01, 0.01, 0.01));
        draw_cube((min + max) * 0.5, size, None, WALL_COLOR);
    }

    let [x_projection, y_projection] = &scene.projections;
    draw_polyline_3d(&x_projection.points, &transform, RED);
    draw_polyline_3d(&y_projection.points, &transform, GREEN);

    if let Some(points) = wave.trajectory.points_3d() {
        draw_polyline_3d(&points, &transform, WAVE_COLOR);
    }

    set_default_camera();
}

fn draw_polyline_3d(points: &[Point3<f32>], transform: &SpaceTransform, color: Color) {
    for pair in points.windows(2) {
        draw_line_3d(
            transform.to_world(&pair[0]),
            transform.to_world(&pair[1]),
            color,
        );
    }
}
