//! Pure derivation functions from raw measurements to output fields.
//!
//! Each function states its availability precondition through an `Option`
//! argument and emits the matching placeholder when the precondition fails,
//! so a placeholder can never be confused with a computed zero.

use crate::algorithm::sentinel::{
    ISOLATION_PILEUP_CORRECTION, KINEMATICS_UNAVAILABLE, KINEMATICS_UNAVAILABLE_INT,
};
use crate::data::reco::{PfIsolation, Point3, RecoMuon, TrackFit};

/// Kinematic quadruple of one track hypothesis, or the placeholder quadruple
/// when the fit is absent.
pub fn track_kinematics(track: Option<&TrackFit>) -> (f64, f64, f64, i32) {
    match track {
        Some(t) => (t.pt, t.eta, t.phi, t.charge),
        None => (
            KINEMATICS_UNAVAILABLE,
            KINEMATICS_UNAVAILABLE,
            KINEMATICS_UNAVAILABLE,
            KINEMATICS_UNAVAILABLE_INT,
        ),
    }
}

/// Combined relative isolation inside one cone, with the fixed pile-up
/// correction applied to the neutral sums:
/// `(charged + max(0, photon + neutral - 0.5 * pileup)) / pt`.
pub fn combined_relative_isolation(iso: &PfIsolation, pt: f64) -> f64 {
    (iso.sum_charged_hadron_pt
        + (iso.sum_photon_et + iso.sum_neutral_hadron_et
            - ISOLATION_PILEUP_CORRECTION * iso.sum_pu_pt)
            .max(0.0))
        / pt
}

/// Track used for impact parameters: the combined fit when present, the
/// inner fit as fallback.
pub fn impact_parameter_track(mu: &RecoMuon) -> Option<&TrackFit> {
    mu.global_track.as_ref().or(mu.inner_track.as_ref())
}

/// Transverse and longitudinal displacement of `track` w.r.t. `point`, or
/// the kinematics placeholder pair when no fit is available.
pub fn displacement(track: Option<&TrackFit>, point: Point3) -> (f64, f64) {
    match track {
        Some(t) => (t.dxy(point), t.dz(point)),
        None => (KINEMATICS_UNAVAILABLE, KINEMATICS_UNAVAILABLE),
    }
}

/// Displacement uncertainties of `track`, with the same fallback as
/// [`displacement`].
pub fn displacement_error(track: Option<&TrackFit>) -> (f64, f64) {
    match track {
        Some(t) => (t.dxy_err, t.dz_err),
        None => (KINEMATICS_UNAVAILABLE, KINEMATICS_UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_relative_isolation_worked_example() {
        let iso = PfIsolation {
            sum_charged_hadron_pt: 2.0,
            sum_neutral_hadron_et: 0.5,
            sum_photon_et: 1.0,
            sum_pu_pt: 3.0,
        };
        // (2.0 + max(0, 1.0 + 0.5 - 0.5 * 3.0)) / 10.0 = 0.2 exactly.
        assert_eq!(combined_relative_isolation(&iso, 10.0), 0.2);
    }

    #[test]
    fn test_combined_relative_isolation_clamps_negative_neutral_sum() {
        let iso = PfIsolation {
            sum_charged_hadron_pt: 1.0,
            sum_neutral_hadron_et: 0.1,
            sum_photon_et: 0.1,
            sum_pu_pt: 10.0,
        };
        // Neutral term is negative after the correction and must clamp to 0.
        assert_eq!(combined_relative_isolation(&iso, 2.0), 0.5);
    }

    #[test]
    fn test_track_kinematics_placeholder_when_absent() {
        let (pt, eta, phi, charge) = track_kinematics(None);
        assert_eq!(pt, -1000.0);
        assert_eq!(eta, -1000.0);
        assert_eq!(phi, -1000.0);
        assert_eq!(charge, -1000);
    }

    #[test]
    fn test_displacement_placeholder_when_absent() {
        let (dxy, dz) = displacement(None, Point3::default());
        assert_eq!(dxy, -1000.0);
        assert_eq!(dz, -1000.0);
        let (edxy, edz) = displacement_error(None);
        assert_eq!(edxy, -1000.0);
        assert_eq!(edz, -1000.0);
    }
}
