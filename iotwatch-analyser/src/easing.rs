// Standard "ease" timing curve, cubic Bézier through (0.42, 0) and (1, 1)
const X1: f64 = 0.42;
const Y1: f64 = 0.0;
const X2: f64 = 1.0;
const Y2: f64 = 1.0;

const ITERATIONS: usize = 40;

fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

/// Eased progress for linear progress `t`, clamped to [0, 1].
pub fn ease(t: f64) -> f64 {
    if t.is_nan() || t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // x(s) is monotonic on [0, 1] since both x control points lie in [0, 1]
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if bezier(mid, X1, X2) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    bezier((lo + hi) / 2.0, Y1, Y2)
}
