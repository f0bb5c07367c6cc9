//! Composite five-point Gauss–Legendre quadrature on graded panels.

const NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

const WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

/// Panels per e-fold of distance from an endpoint.
const PANELS_PER_EFOLD: f64 = 8.0;

fn push_panel(nodes: &mut Vec<(f64, f64)>, lo: f64, hi: f64) {
    let centre = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);
    for (x, w) in NODES.iter().zip(WEIGHTS.iter()) {
        nodes.push((centre + half * x, half * w));
    }
}

/// Abscissae and weights covering `[a, b]` with panels that widen
/// geometrically away from both endpoints.
///
/// Panel edges sit at distance `scale·((1 + half/scale)^(k/n) - 1)` from the
/// nearer endpoint, so structure on the length `scale` next to either end is
/// resolved and the interior is covered at a fixed relative width. Each half
/// gets at least `min_panels / 2` panels and eight panels per e-fold of
/// `1 + half/scale`. An empty or reversed interval yields no nodes.
pub fn graded_nodes(a: f64, b: f64, scale: f64, min_panels: usize) -> Vec<(f64, f64)> {
    if b <= a || scale <= 0.0 {
        return Vec::new();
    }
    let half = 0.5 * (b - a);
    let stretch = 1.0 + half / scale;
    let per_half = ((min_panels + 1) / 2)
        .max((PANELS_PER_EFOLD * stretch.ln()).ceil() as usize)
        .max(1);
    let edges: Vec<f64> = (0..=per_half)
        .map(|k| {
            if k == per_half {
                half
            } else {
                scale * (stretch.powf(k as f64 / per_half as f64) - 1.0)
            }
        })
        .collect();
    let mut nodes = Vec::with_capacity(2 * per_half * NODES.len());
    for pair in edges.windows(2) {
        push_panel(&mut nodes, a + pair[0], a + pair[1]);
    }
    for pair in edges.windows(2).rev() {
        push_panel(&mut nodes, b - pair[1], b - pair[0]);
    }
    nodes
}
