//! Horizontal constraint calculations
//!
//! The horizontal plane is handled in three regimes:
//!   1. Inside the danger zone the command passes through untouched.
//!   2. Outside it the command is blended towards the nearest point on the safe zone
//!      boundary, with a quadratic ease-in that saturates once the command is more than
//!      twice the margin away from the boundary.
//!   3. Anything the geometry cannot answer for (non-finite commands, indeterminate
//!      projections) is clamped to the footprint centroid instead of propagating NaN into
//!      the rope lengths.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use geo::{Closest, ClosestPoint, Contains, EuclideanDistance, Point};

// Internal
use super::{PosCtrl, PosCtrlError};
use crate::cmd_gen::CommandedPosition;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PosCtrl {
    /// Calculate the constrained horizontal target for the given command.
    pub(crate) fn calc_horizontal_target(
        &mut self,
        cmd: &CommandedPosition
    ) -> Result<(f64, f64), PosCtrlError> {
        let bounds = match self.bounds {
            Some(ref b) => b,
            None => return Err(PosCtrlError::NotInitialised)
        };

        // Non-finite commands cannot be projected onto anything
        if !(cmd.x_m.is_finite() && cmd.z_m.is_finite()) {
            self.report.centroid_fallback = true;
            return Ok((bounds.centroid.x(), bounds.centroid.y()));
        }

        let cmd_point = Point::new(cmd.x_m, cmd.z_m);

        // Fast path, commands strictly inside the danger zone pass through untouched
        if bounds.danger_zone.contains(&cmd_point) {
            return Ok((cmd.x_m, cmd.z_m));
        }

        // Project the command onto the safe zone boundary
        let nearest = match bounds.safe_zone.exterior().closest_point(&cmd_point) {
            Closest::Intersection(p) => p,
            Closest::SinglePoint(p) => p,
            Closest::Indeterminate => {
                self.report.centroid_fallback = true;
                return Ok((bounds.centroid.x(), bounds.centroid.y()));
            }
        };

        // Quadratic ease-in towards the boundary, saturating at 2 margins out
        let dist_to_safe_m = cmd_point.euclidean_distance(&nearest);
        let force = clamp(&(dist_to_safe_m / (2.0 * bounds.margin_m)), &0.0, &1.0).powi(2);

        let x_m = cmd.x_m * (1.0 - force) + nearest.x() * force;
        let z_m = cmd.z_m * (1.0 - force) + nearest.y() * force;

        if !(x_m.is_finite() && z_m.is_finite()) {
            self.report.centroid_fallback = true;
            return Ok((bounds.centroid.x(), bounds.centroid.y()));
        }

        self.report.push_back_force = force;
        self.report.horiz_limited = force > 0.0;

        Ok((x_m, z_m))
    }

    /// Calculate the constrained height target, a plain saturation independent of the
    /// horizontal logic.
    pub(crate) fn calc_height_target(&mut self, cmd_y_m: f64) -> Result<f64, PosCtrlError> {
        let bounds = match self.bounds {
            Some(ref b) => b,
            None => return Err(PosCtrlError::NotInitialised)
        };

        // NaN would slip through a comparison based clamp
        if cmd_y_m.is_nan() {
            self.report.height_limited = true;
            return Ok(bounds.min_allowed_height_m);
        }

        let y_m = clamp(
            &cmd_y_m,
            &bounds.min_allowed_height_m,
            &bounds.min_height_m
        );

        self.report.height_limited = y_m != cmd_y_m;

        Ok(y_m)
    }
}
