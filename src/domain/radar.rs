//! Maps a [`Reading`] onto the radar scope.

use crate::domain::models::Reading;

/// Angle at which a reading straight ahead is drawn
const ROTATION_ORIGIN_DEG: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPlacement {
    /// Offset of the blip from the top of the scope
    pub top_margin: f32,
    /// Rotation of the blip layer in degrees
    pub rotation_deg: f32,
    /// Distance as a share of the scope radius, clamped to [0, 1]
    pub range_fraction: f32,
}

impl RadarPlacement {
    pub fn from_reading(reading: &Reading, baseline: f32) -> Self {
        let distance = reading.distance.round() as f32;
        let bearing = reading.bearing as f32;

        let folded = if bearing < 180.0 {
            bearing
        } else {
            360.0 - bearing
        };

        let range_fraction = if baseline > 0.0 {
            (reading.distance as f32 / baseline).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            top_margin: baseline - distance,
            rotation_deg: ROTATION_ORIGIN_DEG - folded,
            range_fraction,
        }
    }

    /// Rotation in radians, clockwise from the top of the scope
    pub fn rotation_rad(&self) -> f32 {
        self.rotation_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(distance: f64, bearing: f64) -> RadarPlacement {
        RadarPlacement::from_reading(&Reading { distance, bearing }, 350.0)
    }

    #[test]
    fn test_top_margin_uses_rounded_distance() {
        assert_eq!(place(12.5, 0.0).top_margin, 337.0);
        assert_eq!(place(12.4, 0.0).top_margin, 338.0);
        assert_eq!(place(400.0, 0.0).top_margin, -50.0);
    }

    #[test]
    fn test_rotation_folds_at_180() {
        assert_eq!(place(1.0, 90.0).rotation_deg, 10.0);
        assert_eq!(place(1.0, 0.0).rotation_deg, 100.0);
        assert_eq!(place(1.0, 180.0).rotation_deg, -80.0);
        assert_eq!(place(1.0, 270.0).rotation_deg, 10.0);
    }

    #[test]
    fn test_range_fraction_is_clamped() {
        assert_eq!(place(175.0, 0.0).range_fraction, 0.5);
        assert_eq!(place(1000.0, 0.0).range_fraction, 1.0);
        assert_eq!(place(-5.0, 0.0).range_fraction, 0.0);
    }
}
