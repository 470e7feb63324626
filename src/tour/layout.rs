//! Circular node layout.
//!
//! Node positions are synthesized from the node count alone: N points
//! evenly spaced on a circle, node 0 at angle 0 (rightmost point) and the
//! rest following in increasing angle. No external coordinates are read.

use serde::{Deserialize, Serialize};

use crate::config::TourConfig;

/// A 2-D position on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// As an `(x, y)` tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Circle the nodes are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Circle from the tour surface settings.
    #[must_use]
    pub const fn from_config(config: &TourConfig) -> Self {
        Self {
            center: Point::new(config.center_x, config.center_y),
            radius: config.radius,
        }
    }
}

/// Positions of N nodes on a circle.
#[must_use]
pub fn circle_layout(n: usize, circle: &Circle) -> Vec<Point> {
    if n == 0 {
        return Vec::new();
    }
    let step = std::f64::consts::TAU / n as f64;
    (0..n)
        .map(|i| {
            let theta = step * i as f64;
            Point::new(
                circle.center.x + circle.radius * theta.cos(),
                circle.center.y + circle.radius * theta.sin(),
            )
        })
        .collect()
}

/// Laid-out nodes for one node count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourLayout {
    positions: Vec<Point>,
}

impl TourLayout {
    /// Lay out `n` nodes on `circle`.
    #[must_use]
    pub fn new(n: usize, circle: &Circle) -> Self {
        Self {
            positions: circle_layout(n, circle),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of node `index`, if it exists.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }

    /// All positions, by node index.
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Vertices of the tour through `indices`, skipping any index that
    /// addresses no node.
    #[must_use]
    pub fn vertices<I: IntoIterator<Item = usize>>(&self, indices: I) -> Vec<Point> {
        indices
            .into_iter()
            .filter_map(|i| self.position(i))
            .collect()
    }
}

/// Layout memoized by node count.
///
/// Redraws ask for the layout every frame; it is only recomputed when the
/// node count or the circle changes.
#[derive(Debug, Clone)]
pub struct TourLayoutCache {
    circle: Circle,
    cached: Option<TourLayout>,
    computed: u64,
}

impl TourLayoutCache {
    /// Empty cache for `circle`.
    #[must_use]
    pub const fn new(circle: Circle) -> Self {
        Self {
            circle,
            cached: None,
            computed: 0,
        }
    }

    /// Layout for `n` nodes.
    pub fn get(&mut self, n: usize) -> &TourLayout {
        let stale = self
            .cached
            .as_ref()
            .map_or(true, |layout| layout.node_count() != n);
        if stale {
            self.computed += 1;
            tracing::debug!(nodes = n, "laying out tour nodes");
            self.cached = Some(TourLayout::new(n, &self.circle));
        }
        let circle = self.circle;
        self.cached.get_or_insert_with(|| TourLayout::new(n, &circle))
    }

    /// How many times a layout was computed.
    #[must_use]
    pub const fn computed_count(&self) -> u64 {
        self.computed
    }
}

/// Closed-polygon perimeter through `vertices` in order, returning to the
/// first vertex.
#[must_use]
pub fn closed_perimeter(vertices: &[Point]) -> f64 {
    match vertices {
        [] | [_] => 0.0,
        [first, .., last] => {
            let open: f64 = vertices.windows(2).map(|w| w[0].distance(&w[1])).sum();
            open + last.distance(first)
        }
    }
}

/// The vertices closed back onto the first one, ready to stroke.
#[must_use]
pub fn closed_path(vertices: &[Point]) -> Vec<(f64, f64)> {
    let mut path: Vec<(f64, f64)> = vertices.iter().map(Point::as_tuple).collect();
    if let Some(first) = vertices.first() {
        path.push(first.as_tuple());
    }
    path
}
