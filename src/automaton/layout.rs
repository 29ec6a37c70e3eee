//! Canvas geometry for states and transitions
//!
//! Every transition is drawn as a quadratic Bézier curve. Self-loops on the
//! same state stack upward; transitions between the same pair of states fan
//! out along the normal of the line joining them, so parallel edges never
//! overlap. Labels sit at a fixed distance from the midpoint of their curve.

use crate::automaton::{Automaton, Position};
use crate::config::EditorConfig;
use std::collections::HashMap;

/// Control polygon of a quadratic Bézier curve plus its label anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub start: Position,
    pub control: Position,
    pub end: Position,
    pub label: Position,
}

impl EdgeGeometry {
    /// Point of the curve at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Position {
        let u = 1.0 - t;
        Position::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    pub fn midpoint(&self) -> Position {
        self.point_at(0.5)
    }

    /// Polyline approximation with `segments` segments
    pub fn sample(&self, segments: usize) -> Vec<Position> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// The two barbs of the arrow head at the end of the curve
    pub fn arrow_head(&self, length: f64) -> [(Position, Position); 2] {
        // the tangent at t = 1 points from the control point to the end
        let dx = self.end.x - self.control.x;
        let dy = self.end.y - self.control.y;
        let norm = dx.hypot(dy).max(f64::EPSILON);
        let (ux, uy) = (dx / norm, dy / norm);
        let angle = std::f64::consts::FRAC_PI_6;
        let (sin, cos) = angle.sin_cos();

        let barb = |sign: f64| {
            let bx = -(ux * cos - sign * uy * sin);
            let by = -(sign * ux * sin + uy * cos);
            Position::new(self.end.x + bx * length, self.end.y + by * length)
        };
        [(self.end, barb(1.0)), (self.end, barb(-1.0))]
    }
}

/// Geometry of the `index`-th self-loop on the state centred at `center`
pub fn loop_geometry(center: Position, index: usize, config: &EditorConfig) -> EdgeGeometry {
    let r = config.state_radius;
    let height = r + config.loop_height + index as f64 * config.loop_spacing;

    let start = Position::new(center.x - r * 0.6, center.y - r);
    let end = Position::new(center.x + r * 0.6, center.y - r);
    let control = Position::new(center.x, center.y - height);

    let mid = bezier_midpoint(start, control, end);
    EdgeGeometry {
        start,
        control,
        end,
        label: Position::new(mid.x, mid.y - config.loop_label_gap),
    }
}

/// Geometry of the `index`-th transition between two distinct states.
///
/// `index` counts transitions joining the same unordered pair, whatever
/// their direction.
pub fn edge_geometry(
    from: Position,
    to: Position,
    index: usize,
    config: &EditorConfig,
) -> EdgeGeometry {
    let r = config.state_radius;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut dist = dx.hypot(dy);
    if dist == 0.0 {
        dist = 1.0;
    }

    // trim both ends so the curve starts and stops on the circles
    let start = Position::new(from.x + dx * (r / dist), from.y + dy * (r / dist));
    let end = Position::new(to.x - dx * (r / dist), to.y - dy * (r / dist));
    let mid = Position::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);

    let nx = -dy / dist;
    let ny = dx / dist;
    let offset = (index + 1) as f64 * config.edge_spacing;
    let control = Position::new(mid.x + nx * offset, mid.y + ny * offset);

    let curve_mid = bezier_midpoint(start, control, end);
    EdgeGeometry {
        start,
        control,
        end,
        label: Position::new(
            curve_mid.x - nx * config.edge_label_gap,
            curve_mid.y - ny * config.edge_label_gap,
        ),
    }
}

fn bezier_midpoint(start: Position, control: Position, end: Position) -> Position {
    Position::new(
        0.25 * start.x + 0.5 * control.x + 0.25 * end.x,
        0.25 * start.y + 0.5 * control.y + 0.25 * end.y,
    )
}

/// Line segment of the arrow pointing into the initial state
pub fn initial_arrow(center: Position, config: &EditorConfig) -> (Position, Position) {
    let r = config.state_radius;
    (
        Position::new(center.x - r - config.initial_arrow, center.y),
        Position::new(center.x - r, center.y),
    )
}

/// Radius of the inner ring marking a final state
pub fn final_ring_radius(config: &EditorConfig) -> f64 {
    config.state_radius - config.final_ring_inset
}

/// A transition ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionLayout {
    /// Position of the transition in the transition list
    pub index: usize,
    pub symbol: String,
    pub geometry: EdgeGeometry,
}

/// Lay out every transition of the automaton, in transition order
pub fn layout_transitions(automaton: &Automaton, config: &EditorConfig) -> Vec<TransitionLayout> {
    let mut loops_seen: HashMap<&str, usize> = HashMap::new();
    let mut pairs_seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut layouts = Vec::new();

    for (index, transition) in automaton.transitions().into_iter().enumerate() {
        let (Some(from), Some(to)) = (
            automaton.get_state(&transition.from_state),
            automaton.get_state(&transition.to_state),
        ) else {
            continue;
        };

        let geometry = if transition.is_loop() {
            let slot = loops_seen.entry(transition.from_state.as_str()).or_insert(0);
            let geometry = loop_geometry(from.position, *slot, config);
            *slot += 1;
            geometry
        } else {
            let a = transition.from_state.as_str();
            let b = transition.to_state.as_str();
            let key = if a <= b { (a, b) } else { (b, a) };
            let slot = pairs_seen.entry(key).or_insert(0);
            let geometry = edge_geometry(from.position, to.position, *slot, config);
            *slot += 1;
            geometry
        };

        layouts.push(TransitionLayout {
            index,
            symbol: transition.symbol.clone(),
            geometry,
        });
    }

    layouts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Position, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_first_loop() {
        let config = EditorConfig::default();
        let g = loop_geometry(Position::new(100.0, 100.0), 0, &config);
        assert_close(g.start, 85.0, 75.0);
        assert_close(g.end, 115.0, 75.0);
        assert_close(g.control, 100.0, 50.0);
        // midpoint (100, 62.5) lifted by the label gap
        assert_close(g.label, 100.0, 54.5);
        assert_close(g.midpoint(), 100.0, 62.5);
    }

    #[test]
    fn test_loops_stack_upward() {
        let config = EditorConfig::default();
        let first = loop_geometry(Position::new(100.0, 100.0), 0, &config);
        let second = loop_geometry(Position::new(100.0, 100.0), 1, &config);
        assert_close(second.control, 100.0, 25.0);
        assert!(second.label.y < first.label.y);
    }

    #[test]
    fn test_straight_edge() {
        let config = EditorConfig::default();
        let g = edge_geometry(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0, &config);
        assert_close(g.start, 25.0, 0.0);
        assert_close(g.end, 75.0, 0.0);
        assert_close(g.control, 50.0, 25.0);
        assert_close(g.midpoint(), 50.0, 12.5);
        assert_close(g.label, 50.0, 2.5);
    }

    #[test]
    fn test_parallel_edges_fan_out() {
        let config = EditorConfig::default();
        let from = Position::new(0.0, 0.0);
        let to = Position::new(100.0, 0.0);
        let offsets: Vec<f64> = (0..3)
            .map(|i| edge_geometry(from, to, i, &config).control.y)
            .collect();
        assert_eq!(offsets, vec![25.0, 50.0, 75.0]);
    }

    #[test]
    fn test_coincident_states_do_not_divide_by_zero() {
        let config = EditorConfig::default();
        let p = Position::new(10.0, 10.0);
        let g = edge_geometry(p, p, 0, &config);
        assert!(g.control.x.is_finite() && g.control.y.is_finite());
    }

    #[test]
    fn test_sample_endpoints() {
        let config = EditorConfig::default();
        let g = edge_geometry(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0, &config);
        let points = g.sample(8);
        assert_eq!(points.len(), 9);
        assert_close(points[0], 25.0, 0.0);
        assert_close(points[8], 75.0, 0.0);
        assert_close(points[4], 50.0, 12.5);
    }

    #[test]
    fn test_arrow_head_is_behind_tip() {
        let config = EditorConfig::default();
        let g = edge_geometry(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0, &config);
        for (tip, barb) in g.arrow_head(6.0) {
            assert_close(tip, 75.0, 0.0);
            // the curve arrives moving right and up toward y = 0
            assert!(barb.x < tip.x);
            let len = (barb.x - tip.x).hypot(barb.y - tip.y);
            assert!((len - 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_initial_arrow_and_ring() {
        let config = EditorConfig::default();
        let (from, to) = initial_arrow(Position::new(100.0, 100.0), &config);
        assert_close(from, 45.0, 100.0);
        assert_close(to, 75.0, 100.0);
        assert_eq!(final_ring_radius(&config), 21.0);
    }

    #[test]
    fn test_layout_groups_by_pair_and_loop() {
        let config = EditorConfig::default();
        let mut automaton = Automaton::new();
        let q0 = automaton.add_state(Position::new(0.0, 0.0));
        let q1 = automaton.add_state(Position::new(100.0, 0.0));
        automaton.add_transition(&q0, &q1, "a").unwrap();
        automaton.add_transition(&q0, &q0, "b").unwrap();
        automaton.add_transition(&q1, &q0, "c").unwrap();
        automaton.add_transition(&q0, &q0, "d").unwrap();

        let layouts = layout_transitions(&automaton, &config);
        assert_eq!(layouts.len(), 4);
        assert_eq!(layouts[0].geometry, edge_geometry(Position::new(0.0, 0.0), Position::new(100.0, 0.0), 0, &config));
        assert_eq!(layouts[1].geometry, loop_geometry(Position::new(0.0, 0.0), 0, &config));
        // second member of the {q0, q1} pair, drawn in its own direction
        assert_eq!(layouts[2].geometry, edge_geometry(Position::new(100.0, 0.0), Position::new(0.0, 0.0), 1, &config));
        assert_eq!(layouts[3].geometry, loop_geometry(Position::new(0.0, 0.0), 1, &config));
        assert_eq!(layouts[3].symbol, "d");
        assert_eq!(layouts[3].index, 3);
    }
}
