//! Selection working points for reconstructed muons.
//!
//! Each predicate is an independent pass/fail classification; none excludes
//! a candidate from the output. `loose` and `medium` need only the candidate
//! itself, while `soft`, `tight` and `high_pt` are evaluated against a
//! reference vertex and must not be called without one — the builder leaves
//! their flags at fail when the vertex collection is empty.

use crate::data::reco::{RecoMuon, RecoVertex, TrackFit};

/// Segment-compatibility threshold when the global fit is good.
const SEGMENT_COMPATIBILITY_GOOD_GLOBAL: f64 = 0.303;

/// Segment-compatibility threshold otherwise.
const SEGMENT_COMPATIBILITY_DEFAULT: f64 = 0.451;

/// Particle-flow identified and reconstructed in at least one of the two
/// main subsystems.
pub fn is_loose(mu: &RecoMuon) -> bool {
    mu.is_pf && (mu.is_global || mu.is_tracker)
}

/// A global fit tight enough to lower the segment-compatibility requirement.
fn is_good_global(mu: &RecoMuon) -> bool {
    match &mu.global_track {
        Some(glb) => {
            mu.is_global
                && glb.norm_chi2 < 3.0
                && mu.combined_quality.chi2_local_position < 12.0
                && mu.combined_quality.trk_kink < 20.0
        }
        None => false,
    }
}

/// Loose, with a well-measured inner track and a muon-system signature
/// compatible with the extrapolated track.
pub fn is_medium(mu: &RecoMuon) -> bool {
    let inner = match &mu.inner_track {
        Some(t) => t,
        None => return false,
    };
    if !is_loose(mu) || inner.valid_hit_frac <= 0.8 {
        return false;
    }
    let threshold = if is_good_global(mu) {
        SEGMENT_COMPATIBILITY_GOOD_GLOBAL
    } else {
        SEGMENT_COMPATIBILITY_DEFAULT
    };
    mu.segment_compatibility > threshold
}

/// Low-momentum working point: tight one-station arbitration plus a
/// high-purity, well-measured inner track close to the vertex.
pub fn is_soft(mu: &RecoMuon, vertex: &RecoVertex) -> bool {
    if !mu.one_station_tight {
        return false;
    }
    let inner = match &mu.inner_track {
        Some(t) => t,
        None => return false,
    };
    inner.tracker_layers_with_meas > 5
        && inner.pixel_layers_with_meas > 0
        && inner.high_purity
        && inner.dxy(vertex.position()).abs() < 0.3
        && inner.dz(vertex.position()).abs() < 20.0
}

/// Standard analysis working point: good global fit matched in several
/// stations, with an inner track compatible with the vertex.
pub fn is_tight(mu: &RecoMuon, vertex: &RecoVertex) -> bool {
    if !mu.is_global || !mu.is_pf {
        return false;
    }
    let (glb, inner): (&TrackFit, &TrackFit) = match (&mu.global_track, &mu.inner_track) {
        (Some(g), Some(i)) => (g, i),
        _ => return false,
    };
    glb.norm_chi2 < 10.0
        && glb.valid_muon_hits > 0
        && mu.matched_stations > 1
        && inner.dxy(vertex.position()).abs() < 0.2
        && inner.dz(vertex.position()).abs() < 0.5
        && inner.valid_pixel_hits > 0
        && inner.tracker_layers_with_meas > 5
}

/// High-momentum working point: relies on the best-estimate fit's momentum
/// resolution instead of the global fit quality.
pub fn is_high_pt(mu: &RecoMuon, vertex: &RecoVertex) -> bool {
    if !mu.is_global {
        return false;
    }
    let (glb, inner, tune_p) = match (&mu.global_track, &mu.inner_track, &mu.tune_p_track) {
        (Some(g), Some(i), Some(t)) => (g, i, t),
        _ => return false,
    };
    glb.valid_muon_hits > 0
        && mu.matched_stations > 1
        && tune_p.pt_err / tune_p.pt < 0.3
        && inner.dxy(vertex.position()).abs() < 0.2
        && inner.dz(vertex.position()).abs() < 0.5
        && inner.valid_pixel_hits > 0
        && inner.tracker_layers_with_meas > 5
}
