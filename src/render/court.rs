use std::f64::consts::PI;
use crate::render::transform::CoordinatePipeline;
use crate::state::record::Position;

// Half-court dimensions in feet, hoop centre at the origin.
const BASELINE_Y: f64 = -5.25;
const HALF_COURT_Y: f64 = 41.75;
const SIDELINE_X: f64 = 25.0;
const HOOP_RADIUS: f64 = 0.75;
const BACKBOARD_Y: f64 = -1.25;
const BACKBOARD_HALF_WIDTH: f64 = 3.0;
const LANE_HALF_WIDTH: f64 = 8.0;
const FREE_THROW_Y: f64 = 13.75;
const FREE_THROW_RADIUS: f64 = 6.0;
const RESTRICTED_RADIUS: f64 = 4.0;
const THREE_RADIUS: f64 = 23.75;
const CORNER_THREE_X: f64 = 22.0;
const CENTER_CIRCLE_RADIUS: f64 = 6.0;

const ARC_SEGMENTS: usize = 48;

fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Position> {
    vec![Position::new(x0, y0), Position::new(x1, y1)]
}

/// Sample an arc counter-clockwise from `start` to `end` (radians).
fn arc(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> Vec<Position> {
    (0..=ARC_SEGMENTS)
        .map(|i| {
            let t = start + (end - start) * i as f64 / ARC_SEGMENTS as f64;
            Position::new(cx + r * t.cos(), cy + r * t.sin())
        })
        .collect()
}

/// Court markings as data-space polylines.
pub fn court_outline() -> Vec<Vec<Position>> {
    let corner_y = (THREE_RADIUS * THREE_RADIUS - CORNER_THREE_X * CORNER_THREE_X).sqrt();
    let three_start = corner_y.atan2(CORNER_THREE_X);

    vec![
        // Boundary: baseline, sidelines, half-court line
        vec![
            Position::new(-SIDELINE_X, HALF_COURT_Y),
            Position::new(-SIDELINE_X, BASELINE_Y),
            Position::new(SIDELINE_X, BASELINE_Y),
            Position::new(SIDELINE_X, HALF_COURT_Y),
            Position::new(-SIDELINE_X, HALF_COURT_Y),
        ],
        arc(0.0, 0.0, HOOP_RADIUS, 0.0, 2.0 * PI),
        line(-BACKBOARD_HALF_WIDTH, BACKBOARD_Y, BACKBOARD_HALF_WIDTH, BACKBOARD_Y),
        // Lane
        vec![
            Position::new(-LANE_HALF_WIDTH, BASELINE_Y),
            Position::new(-LANE_HALF_WIDTH, FREE_THROW_Y),
            Position::new(LANE_HALF_WIDTH, FREE_THROW_Y),
            Position::new(LANE_HALF_WIDTH, BASELINE_Y),
        ],
        arc(0.0, FREE_THROW_Y, FREE_THROW_RADIUS, 0.0, PI),
        arc(0.0, 0.0, RESTRICTED_RADIUS, 0.0, PI),
        // Three-point line: corners then arc
        line(-CORNER_THREE_X, BASELINE_Y, -CORNER_THREE_X, corner_y),
        line(CORNER_THREE_X, BASELINE_Y, CORNER_THREE_X, corner_y),
        arc(0.0, 0.0, THREE_RADIUS, three_start, PI - three_start),
        arc(0.0, HALF_COURT_Y, CENTER_CIRCLE_RADIUS, PI, 2.0 * PI),
    ]
}

/// Project the court through the chart's pipeline into surface-local pixels.
pub fn project_court(outline: &[Vec<Position>], pipeline: &CoordinatePipeline) -> Vec<Vec<[f64; 2]>> {
    outline
        .iter()
        .map(|path| path.iter().map(|&p| pipeline.to_screen(p)).collect())
        .collect()
}
