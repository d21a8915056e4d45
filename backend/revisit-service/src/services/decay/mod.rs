/// Temporal Decay
///
/// Maps days since the last visit to a weight in [0, 1]. The curve is
/// piecewise linear for the first 90 days and exponential afterwards:
///
/// | days      | weight            |
/// |-----------|-------------------|
/// | < 0       | 1.0               |
/// | [0, 7]    | 1.0 → 0.9         |
/// | (7, 30]   | 0.9 → 0.6         |
/// | (30, 90]  | 0.6 → 0.2         |
/// | > 90      | max(0.05, 0.2·e^(-d/180)) |

const WEEK_DAYS: f64 = 7.0;
const MONTH_DAYS: f64 = 30.0;
const QUARTER_DAYS: f64 = 90.0;

/// Long-tail half-scale for visits older than a quarter
const TAIL_SCALE_DAYS: f64 = 180.0;
const TAIL_FLOOR: f64 = 0.05;

/// Decay weight for a visit `days_since_visit` days ago.
pub fn decay(days_since_visit: f64) -> f64 {
    if days_since_visit.is_nan() {
        return TAIL_FLOOR;
    }

    let weight = if days_since_visit < 0.0 {
        1.0
    } else if days_since_visit <= WEEK_DAYS {
        lerp(1.0, 0.9, days_since_visit / WEEK_DAYS)
    } else if days_since_visit <= MONTH_DAYS {
        lerp(0.9, 0.6, (days_since_visit - WEEK_DAYS) / (MONTH_DAYS - WEEK_DAYS))
    } else if days_since_visit <= QUARTER_DAYS {
        lerp(0.6, 0.2, (days_since_visit - MONTH_DAYS) / (QUARTER_DAYS - MONTH_DAYS))
    } else {
        (0.2 * (-days_since_visit / TAIL_SCALE_DAYS).exp()).max(TAIL_FLOOR)
    };

    weight.clamp(0.0, 1.0)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
