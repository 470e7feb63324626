//! Tour scene building.
//!
//! Painting order: header, glow copy of the tour, revealed tour stroke,
//! connection dots, node glow rings, node markers, labels, legend.

use crate::animation::{FrameTime, HoverState, StrokeReveal};
use crate::config::VizConfig;
use crate::scene::{Color, DashReveal, RenderCommand, Scene, TextAnchor};
use crate::snapshot::Ordering;

use super::layout::{closed_path, closed_perimeter, Point, TourLayout};

/// Fixed illustrative layout of the idle scene.
pub const PLACEHOLDER_POINTS: [(f64, f64); 5] = [
    (60.0, 30.0),
    (180.0, 30.0),
    (40.0, 90.0),
    (200.0, 90.0),
    (120.0, 60.0),
];

/// Marker radius of the idle scene.
pub const PLACEHOLDER_RADIUS: f64 = 5.0;

/// Idle scene surface width.
pub const PLACEHOLDER_WIDTH: f64 = 240.0;
/// Idle scene surface height.
pub const PLACEHOLDER_HEIGHT: f64 = 120.0;

/// Everything needed to paint one tour frame.
#[derive(Debug, Clone, Copy)]
pub struct TourFrame<'a> {
    pub layout: &'a TourLayout,
    pub ordering: Option<&'a Ordering>,
    pub hover: &'a HoverState,
    pub now: FrameTime,
    /// When the displayed ordering last changed.
    pub reveal_started: FrameTime,
    /// History length.
    pub iterations: usize,
    pub cost: Option<f64>,
    pub animating: bool,
}

/// Polygon vertices for `ordering`, dropping indices outside the layout.
#[must_use]
pub fn tour_vertices(layout: &TourLayout, ordering: &Ordering) -> Vec<Point> {
    let vertices = layout.vertices(ordering.as_slice().iter().copied());
    if vertices.len() < ordering.len() {
        tracing::warn!(
            nodes = layout.node_count(),
            dropped = ordering.len() - vertices.len(),
            "ordering references missing nodes"
        );
    }
    vertices
}

/// Length the reveal animation travels: the closed perimeter of the tour.
#[must_use]
pub fn reveal_length(layout: &TourLayout, ordering: &Ordering) -> f64 {
    closed_perimeter(&tour_vertices(layout, ordering))
}

/// Paint the tour.
#[must_use]
pub fn render_tour(config: &VizConfig, frame: &TourFrame<'_>) -> Scene {
    let tour = &config.tour;
    let mut scene = Scene::new(tour.width, tour.height);

    header(&mut scene, frame);

    let vertices = frame
        .ordering
        .map(|o| tour_vertices(frame.layout, o))
        .unwrap_or_default();

    if !vertices.is_empty() {
        let path = closed_path(&vertices);
        let length = closed_perimeter(&vertices);
        let reveal = StrokeReveal::new(
            length,
            config.animation.reveal_duration_ms,
            frame.reveal_started,
        );

        scene.push(RenderCommand::DrawPolyline {
            points: path.clone(),
            color: Color::WHITE.with_alpha(51),
            gradient: Color::PATH_GRADIENT.to_vec(),
            width: tour.stroke_width * 2.0,
            reveal: None,
        });
        scene.push(RenderCommand::DrawPolyline {
            points: path,
            color: Color::WHITE,
            gradient: Color::PATH_GRADIENT.to_vec(),
            width: tour.stroke_width,
            reveal: Some(DashReveal {
                dash_length: length,
                dash_offset: reveal.dash_offset_at(frame.now),
                duration_ms: config.animation.reveal_duration_ms,
            }),
        });

        for v in &vertices {
            scene.push(RenderCommand::DrawCircle {
                x: v.x,
                y: v.y,
                radius: tour.dot_radius,
                color: Color::CONNECTION_DOT,
                filled: true,
                stroke_width: 0.0,
            });
        }
    }

    for (i, p) in frame.layout.positions().iter().enumerate() {
        let emphasis = frame.hover.emphasis(
            i,
            frame.now,
            tour.node_radius,
            tour.hover_radius,
            config.animation.hover_transition_ms,
        );
        scene.push(RenderCommand::DrawCircle {
            x: p.x,
            y: p.y,
            radius: tour.glow_radius,
            color: Color::NODE.with_alpha(50),
            filled: true,
            stroke_width: 0.0,
        });
        scene.push(RenderCommand::DrawCircle {
            x: p.x,
            y: p.y,
            radius: emphasis.radius,
            color: Color::NODE,
            filled: true,
            stroke_width: emphasis.stroke_width,
        });
        scene.text_anchored(
            p.x,
            p.y + 4.0,
            i.to_string(),
            Color::BACKGROUND,
            10.0,
            TextAnchor::Middle,
        );
    }

    legend(&mut scene, tour.height);
    scene
}

fn header(scene: &mut Scene, frame: &TourFrame<'_>) {
    scene.text(
        12.0,
        20.0,
        format!("NODES: {}", frame.layout.node_count()),
        Color::SLATE,
        11.0,
    );
    scene.text(
        12.0,
        36.0,
        format!("ITER: {}", frame.iterations),
        Color::SLATE,
        11.0,
    );
    if let Some(cost) = frame.cost {
        scene.text(12.0, 52.0, format!("COST: {cost:.2}"), Color::SLATE, 11.0);
    }

    let (status, color) = if frame.animating {
        ("OPTIMIZING PATH...", Color::PURPLE)
    } else {
        ("SOLUTION READY", Color::STATUS_ACTIVE)
    };
    scene.text_anchored(scene.width - 12.0, 20.0, status, color, 11.0, TextAnchor::End);
}

fn legend(scene: &mut Scene, height: f64) {
    let y = height - 14.0;
    scene.push(RenderCommand::DrawCircle {
        x: 16.0,
        y: y - 4.0,
        radius: 4.0,
        color: Color::NODE,
        filled: true,
        stroke_width: 0.0,
    });
    scene.text(24.0, y, "NODES", Color::SLATE, 9.0);
    scene.push(RenderCommand::DrawPolyline {
        points: vec![(80.0, y - 4.0), (100.0, y - 4.0)],
        color: Color::WHITE,
        gradient: vec![Color::NODE, Color::PURPLE],
        width: 2.0,
        reveal: None,
    });
    scene.text(106.0, y, "PATH", Color::SLATE, 9.0);
    scene.push(RenderCommand::DrawCircle {
        x: 156.0,
        y: y - 4.0,
        radius: 2.5,
        color: Color::CONNECTION_DOT,
        filled: true,
        stroke_width: 0.0,
    });
    scene.text(164.0, y, "CONNECTION POINTS", Color::SLATE, 9.0);
}

/// The "awaiting data" scene. Never reads real data.
#[must_use]
pub fn render_placeholder() -> Scene {
    let mut scene = Scene::placeholder(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    scene.text_anchored(
        PLACEHOLDER_WIDTH / 2.0,
        12.0,
        "AWAITING TSP DATA",
        Color::NODE,
        10.0,
        TextAnchor::Middle,
    );
    for (i, (x, y)) in PLACEHOLDER_POINTS.iter().enumerate() {
        scene.push(RenderCommand::DrawCircle {
            x: *x,
            y: *y,
            radius: PLACEHOLDER_RADIUS,
            color: Color::NODE.with_alpha(128),
            filled: true,
            stroke_width: 0.0,
        });
        scene.text_anchored(
            *x,
            *y + 5.0,
            i.to_string(),
            Color::NODE,
            8.0,
            TextAnchor::Middle,
        );
    }
    scene.text_anchored(
        PLACEHOLDER_WIDTH / 2.0,
        114.0,
        "Run an optimization to see the tour",
        Color::SLATE,
        6.0,
        TextAnchor::Middle,
    );
    scene
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::tour::layout::Circle;
    use proptest::prelude::*;

    proptest! {
        /// Reveal length equals the closed perimeter for any permutation,
        /// and respects the triangle inequality edge by edge.
        #[test]
        fn prop_reveal_matches_perimeter(order in Just((0usize..12).collect::<Vec<_>>()).prop_shuffle()) {
            let layout = TourLayout::new(12, &Circle::from_config(&VizConfig::default().tour));
            let ordering = Ordering::new(order.clone());
            let vertices = layout.vertices(order.iter().copied());
            let length = reveal_length(&layout, &ordering);
            prop_assert!((length - closed_perimeter(&vertices)).abs() < 1e-9);

            let first = vertices[0];
            let last = vertices[vertices.len() - 1];
            let open: f64 = vertices.windows(2).map(|w| w[0].distance(&w[1])).sum();
            prop_assert!(open + 1e-9 >= last.distance(&first));
        }
    }
}
