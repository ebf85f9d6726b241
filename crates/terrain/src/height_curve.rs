use serde::{Deserialize, Serialize};

/// One `(time, value)` control point of a [`HeightCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear remapping of normalized height before it is scaled by the
/// mesh height multiplier.
///
/// Keys are kept sorted by `time`. Inputs before the first key or after the
/// last key take that key's value. A curve without keys is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl Default for HeightCurve {
    /// Flat up to shallow water, then rising to full height.
    fn default() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.4, 0.0),
            CurveKey::new(0.55, 0.12),
            CurveKey::new(1.0, 1.0),
        ])
    }
}

impl From<Vec<CurveKey>> for HeightCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}

impl HeightCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.time.is_finite() && k.value.is_finite());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// `f(t) = t`.
    pub fn linear() -> Self {
        Self::new(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn sample(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; t > first.time guarantees idx >= 1.
        let idx = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[idx - 1];
        let b = self.keys[idx];
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        let f = (t - a.time) / span;
        a.value + (b.value - a.value) * f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve_is_identity() {
        let curve = HeightCurve::new(Vec::new());
        assert_eq!(curve.sample(0.37), 0.37);
    }

    #[test]
    fn test_linear_curve() {
        let curve = HeightCurve::linear();
        assert!((curve.sample(0.25) - 0.25).abs() < 1e-6);
        assert_eq!(curve.sample(1.0), 1.0);
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = HeightCurve::new(vec![CurveKey::new(0.2, 0.1), CurveKey::new(0.8, 0.9)]);
        assert_eq!(curve.sample(0.0), 0.1);
        assert_eq!(curve.sample(1.0), 0.9);
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = HeightCurve::new(vec![
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.5, 0.0),
            CurveKey::new(1.0, 1.0),
        ]);
        assert_eq!(curve.sample(0.3), 0.0);
        assert!((curve.sample(0.75) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unsorted_keys_are_sorted() {
        let curve = HeightCurve::new(vec![CurveKey::new(1.0, 1.0), CurveKey::new(0.0, 0.0)]);
        assert_eq!(curve.keys()[0].time, 0.0);
        assert!((curve.sample(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_serde_as_key_list() {
        let json = r#"[{"time":0.0,"value":0.0},{"time":1.0,"value":2.0}]"#;
        let curve: HeightCurve = serde_json::from_str(json).expect("parse curve");
        assert!((curve.sample(0.5) - 1.0).abs() < 1e-6);
        let back = serde_json::to_string(&curve).expect("serialize curve");
        assert!(back.contains("\"value\":2.0"), "got: {back}");
    }
}
