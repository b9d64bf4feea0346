// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

/// A direction on the panorama sphere, in radians.
///
/// `yaw` is kept in `(-PI, PI]`, `pitch` in `[-PI/2, PI/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalCoord {
    pub yaw: f64,
    pub pitch: f64,
}

impl SphericalCoord {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }.normalized()
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }

    pub fn normalized(self) -> Self {
        Self {
            yaw: wrap_yaw(self.yaw),
            pitch: self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn offset(self, delta: CoordDelta) -> Self {
        Self::new(self.yaw + delta.yaw, self.pitch + delta.pitch)
    }
}

/// A pointer-move delta already converted into coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordDelta {
    pub yaw: f64,
    pub pitch: f64,
}

impl CoordDelta {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }

    /// Limits the pitch component so no point in `points` is pushed past a pole.
    ///
    /// Applying the result to every point keeps their relative layout intact.
    pub fn clamped_for(self, points: &[SphericalCoord]) -> Self {
        let (lowest, highest) = points.iter().fold((FRAC_PI_2, -FRAC_PI_2), |(lo, hi), p| {
            (lo.min(p.pitch), hi.max(p.pitch))
        });
        if lowest > highest {
            return self;
        }
        let pitch = self.pitch.clamp(-FRAC_PI_2 - lowest, FRAC_PI_2 - highest);
        Self { pitch, ..self }
    }
}

fn wrap_yaw(yaw: f64) -> f64 {
    if !yaw.is_finite() {
        return yaw;
    }
    let wrapped = (yaw + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Centroid of a point set, averaging yaw on the unit circle so sets straddling the seam at
/// `±PI` stay together.
pub fn centroid(points: &[SphericalCoord]) -> Option<SphericalCoord> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sin_sum, cos_sum, pitch_sum) = points.iter().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p.yaw.sin(), acc.1 + p.yaw.cos(), acc.2 + p.pitch)
    });
    Some(SphericalCoord::new(sin_sum.atan2(cos_sum), pitch_sum / n))
}

/// Rotates `point` about `center` by `angle` radians in the local yaw/pitch plane.
pub fn rotate_about(point: SphericalCoord, center: SphericalCoord, angle: f64) -> SphericalCoord {
    let dy = wrap_yaw(point.yaw - center.yaw);
    let dp = point.pitch - center.pitch;
    let (sin, cos) = angle.sin_cos();
    SphericalCoord::new(
        center.yaw + dy * cos - dp * sin,
        center.pitch + dy * sin + dp * cos,
    )
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use rstest::rstest;

    use super::{centroid, rotate_about, CoordDelta, SphericalCoord};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn yaw_wraps_and_pitch_clamps() {
        let c = SphericalCoord::new(2.0 * PI + 0.5, 2.0);
        assert!(close(c.yaw, 0.5));
        assert!(close(c.pitch, FRAC_PI_2));

        let c = SphericalCoord::new(-PI, 0.0);
        assert!(close(c.yaw, PI));
    }

    #[test]
    fn offset_applies_delta() {
        let c = SphericalCoord::new(0.1, 0.2).offset(CoordDelta::new(0.5, -0.1));
        assert!(close(c.yaw, 0.6));
        assert!(close(c.pitch, 0.1));
    }

    #[rstest]
    #[case::up_past_north(2.0, FRAC_PI_2 - 0.3)]
    #[case::down_past_south(-2.0, -FRAC_PI_2 + 0.1)]
    #[case::within_range(0.25, 0.25)]
    fn pitch_delta_stops_the_extreme_point_at_the_pole(
        #[case] requested: f64,
        #[case] expected: f64,
    ) {
        let points = [SphericalCoord::new(0.0, 0.1), SphericalCoord::new(0.2, 0.3)];
        let delta = CoordDelta::new(0.4, requested).clamped_for(&points);
        assert!(close(delta.pitch, expected));
        assert!(close(delta.yaw, 0.4));
    }

    #[test]
    fn pitch_delta_is_untouched_without_points() {
        let delta = CoordDelta::new(0.0, 3.0).clamped_for(&[]);
        assert!(close(delta.pitch, 3.0));
    }

    #[test]
    fn centroid_handles_seam() {
        let points = [SphericalCoord::new(PI - 0.1, 0.0), SphericalCoord::new(-PI + 0.1, 0.0)];
        let c = centroid(&points).unwrap();
        assert!(close(c.yaw.abs(), PI));
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn rotate_quarter_turn() {
        let center = SphericalCoord::new(0.0, 0.0);
        let p = rotate_about(SphericalCoord::new(0.2, 0.0), center, FRAC_PI_2);
        assert!(close(p.yaw, 0.0));
        assert!(close(p.pitch, 0.2));
    }
}
