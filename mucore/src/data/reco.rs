//! Read-only input collections supplied per event by the host framework.
//!
//! A reconstructed muon is modeled as a capability type: every optional track
//! hypothesis or sub-measurement is an `Option`, so each derived output field
//! can state its availability precondition directly instead of re-checking
//! scattered boolean queries.

use serde::{Deserialize, Serialize};

/// A point in the detector coordinate system, used as the reference for
/// impact-parameter computations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }
}

/// One fitted track hypothesis of a reconstructed muon.
///
/// Carries the kinematics at the point of closest approach, the hit pattern
/// of the fit and the fit uncertainties. Hit-pattern counts that a given
/// hypothesis cannot provide (e.g. pixel hits on a standalone fit) are simply
/// zero in the source collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFit {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub charge: i32,
    /// Point of closest approach of the fitted trajectory.
    pub reference_point: Point3,
    pub pt_err: f64,
    pub dxy_err: f64,
    pub dz_err: f64,
    pub valid_hits: i32,
    pub norm_chi2: f64,
    pub valid_muon_hits: i32,
    pub valid_pixel_hits: i32,
    pub pixel_layers_with_meas: i32,
    pub tracker_layers_with_meas: i32,
    pub valid_hit_frac: f64,
    pub high_purity: bool,
}

impl TrackFit {
    pub fn px(&self) -> f64 {
        self.pt * self.phi.cos()
    }

    pub fn py(&self) -> f64 {
        self.pt * self.phi.sin()
    }

    pub fn pz(&self) -> f64 {
        self.pt * self.eta.sinh()
    }

    /// Transverse displacement of the trajectory w.r.t. `point`, signed by
    /// the cross product of displacement and transverse momentum.
    pub fn dxy(&self, point: Point3) -> f64 {
        let dx = self.reference_point.x - point.x;
        let dy = self.reference_point.y - point.y;
        (-dx * self.py() + dy * self.px()) / self.pt
    }

    /// Longitudinal displacement of the trajectory w.r.t. `point`, evaluated
    /// at the transverse point of closest approach.
    pub fn dz(&self, point: Point3) -> f64 {
        let dx = self.reference_point.x - point.x;
        let dy = self.reference_point.y - point.y;
        let dz = self.reference_point.z - point.z;
        dz - (dx * self.px() + dy * self.py()) / self.pt * (self.pz() / self.pt)
    }
}

/// Particle-flow isolation sums inside one cone around the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PfIsolation {
    pub sum_charged_hadron_pt: f64,
    pub sum_neutral_hadron_et: f64,
    pub sum_photon_et: f64,
    pub sum_pu_pt: f64,
}

/// Fit-combination estimators of the global fit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CombinedQuality {
    pub chi2_local_position: f64,
    pub trk_kink: f64,
}

/// Timing measurement of a muon candidate; present only when valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuonTime {
    pub n_dof: i32,
    pub time_at_ip: f64,
    pub time_err: f64,
}

/// One reconstructed muon candidate with all of its sub-measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoMuon {
    // Primary kinematic measurement, always present.
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub charge: i32,

    // Detector-subsystem membership, decided upstream.
    pub is_global: bool,
    pub is_tracker: bool,
    pub is_tracker_arb: bool,
    pub is_rpc: bool,
    pub is_standalone: bool,
    pub is_pf: bool,

    // Track hypotheses. The best-overall track is always resolvable; the
    // others exist only when the corresponding fit succeeded.
    pub global_track: Option<TrackFit>,
    pub inner_track: Option<TrackFit>,
    pub outer_track: Option<TrackFit>,
    pub tune_p_track: Option<TrackFit>,
    pub best_track: TrackFit,

    pub iso_r03: PfIsolation,
    pub iso_r04: PfIsolation,

    pub matched_stations: i32,
    pub segment_compatibility: f64,
    pub combined_quality: CombinedQuality,
    /// Tight one-station arbitrated segment match, computed upstream.
    pub one_station_tight: bool,

    pub time: Option<MuonTime>,
}

/// One reconstructed vertex. `valid` is the upstream geometric-fit validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoVertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub covariance: [[f64; 3]; 3],
    pub valid: bool,
}

impl RecoVertex {
    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Beam reference point of the event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeamSpot {
    pub position: Point3,
}

/// Decision of one registered trigger path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerPath {
    pub name: String,
    pub accepted: bool,
}

/// Per-event trigger decision table, in registry order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerResults {
    pub paths: Vec<TriggerPath>,
}

/// One filter of the trigger summary with the keys of its matched objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerFilter {
    pub tag: String,
    pub object_keys: Vec<usize>,
}

/// Kinematics of one trigger object, indexed by key from the filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerObjectKinematics {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
}

/// Trigger-object summary: filters and the shared object pool they key into.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerSummary {
    pub filters: Vec<TriggerFilter>,
    pub objects: Vec<TriggerObjectKinematics>,
}

/// Pile-up summary for one simulated bunch crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileupSummary {
    pub bunch_crossing: i32,
    pub true_num_interactions: f64,
    pub actual_num_interactions: i32,
}

/// Generator weight record of a simulated event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenEventInfo {
    pub weight: f64,
}

/// One generator-truth particle as delivered by the source collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenParticleRaw {
    pub pdg_id: i32,
    pub status: i32,
    pub energy: f64,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    /// pdgIds of the direct mothers, in source order. May be empty.
    pub mothers: Vec<i32>,
}

/// One missing-energy reading. The source delivers these as single-entry
/// collections; an empty collection counts as an absent input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetReading {
    pub et: f64,
}

/// Everything the host supplies for one event. Absent optional collections
/// are `None`; the resolver turns that into a skipped builder, never a
/// failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventInputs {
    pub run_number: u32,
    pub luminosity_block_number: u32,
    pub event_number: u64,
    pub is_real_data: bool,

    pub trigger_results: Option<TriggerResults>,
    pub trigger_summary: Option<TriggerSummary>,
    pub muons: Option<Vec<RecoMuon>>,
    pub vertices: Option<Vec<RecoVertex>>,
    pub beam_spot: Option<BeamSpot>,
    pub pf_met: Option<Vec<MetReading>>,
    pub pf_ch_met: Option<Vec<MetReading>>,
    pub calo_met: Option<Vec<MetReading>>,
    pub gen_particles: Option<Vec<GenParticleRaw>>,
    pub pileup_info: Option<Vec<PileupSummary>>,
    pub gen_info: Option<GenEventInfo>,
}
