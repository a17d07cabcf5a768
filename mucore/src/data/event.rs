use serde::{Deserialize, Serialize};

use crate::algorithm::sentinel::{
    DIAGNOSTIC_UNAVAILABLE, DIAGNOSTIC_UNAVAILABLE_INT, FLAG_FAIL, KINEMATICS_UNAVAILABLE,
    KINEMATICS_UNAVAILABLE_INT, VERTEX_COUNT_UNAVAILABLE,
};

/// Identity of one source event. Written once per record, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventId {
    pub run_number: u32,
    pub luminosity_block_number: u32,
    pub event_number: u64,
}

/// Generator-level pile-up and weight information. Interaction counts are
/// taken from the in-time bunch crossing only and stay at -1 when no in-time
/// entry exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenInfo {
    pub true_number_of_interactions: f64,
    pub actual_number_of_interactions: f64,
    pub gen_weight: f64,
}

/// One generator-truth particle, flattened.
///
/// `mothers` lists the pdgId of each direct mother in source order. Entries
/// past the first two of the truth collection that come with no recorded
/// mother get a single sentinel mother id of 0 (known defect of the upstream
/// truth collection, recorded as-is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenParticle {
    pub pdg_id: i32,
    pub status: i32,
    pub energy: f64,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub mothers: Vec<i32>,
}

/// One (filter, matched object) pair from the trigger summary. A single
/// physical object matched by several filters appears once per filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HltObject {
    pub filter_tag: String,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
}

/// Accepted trigger-path names and flattened trigger objects. The two
/// sequences are independent; paths carry no object references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HltSummary {
    pub triggers: Vec<String>,
    pub objects: Vec<HltObject>,
}

/// Missing-energy summary, one scalar per reconstruction flavour. Each stays
/// at the diagnostic placeholder when its input is absent for the event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetRecord {
    pub pf_met: f64,
    pub pf_ch_met: f64,
    pub calo_met: f64,
}

impl Default for MetRecord {
    fn default() -> Self {
        MetRecord {
            pf_met: DIAGNOSTIC_UNAVAILABLE,
            pf_ch_met: DIAGNOSTIC_UNAVAILABLE,
            calo_met: DIAGNOSTIC_UNAVAILABLE,
        }
    }
}

/// One reconstructed muon, flattened to the fixed table schema.
///
/// Every field gated on an optional sub-measurement follows the placeholder
/// conventions of [`crate::algorithm::sentinel`]; `Default` yields a row with
/// every gated field already at its placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuonRecord {
    // Kinematics of the primary measurement, always present.
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub charge: i32,

    // Kinematics at the alternative track hypotheses.
    pub pt_global: f64,
    pub eta_global: f64,
    pub phi_global: f64,
    pub charge_global: i32,
    pub pt_tune_p: f64,
    pub eta_tune_p: f64,
    pub phi_tune_p: f64,
    pub charge_tune_p: i32,
    pub pt_tracker: f64,
    pub eta_tracker: f64,
    pub phi_tracker: f64,
    pub charge_tracker: i32,

    // Particle-flow isolation components at the wider cone.
    pub charged_hadron_iso: f64,
    pub charged_hadron_iso_pu: f64,
    pub neutral_hadron_iso: f64,
    pub photon_iso: f64,

    // Combined relative isolation at both cone sizes.
    pub iso_pflow_04: f64,
    pub iso_pflow_03: f64,

    // Detector-subsystem membership flags.
    pub is_global: i32,
    pub is_tracker: i32,
    pub is_tracker_arb: i32,
    pub is_rpc: i32,
    pub is_standalone: i32,
    pub is_pf: i32,

    // Hit-count and fit-quality diagnostics.
    pub n_hits_global: i32,
    pub n_hits_tracker: i32,
    pub n_hits_standalone: i32,
    pub glb_norm_chi2: f64,
    pub trk_norm_chi2: f64,
    pub trk_muon_matched_stations: i32,
    pub glb_muon_valid_hits: i32,
    pub trk_pixel_valid_hits: i32,
    pub trk_pixel_layers_with_meas: i32,
    pub trk_tracker_layers_with_meas: i32,
    pub best_mu_pt_err: f64,
    pub trk_valid_hit_frac: f64,
    pub trk_sta_chi2: f64,
    pub trk_kink: f64,
    pub mu_segm_comp: f64,

    // Selection flags.
    pub is_loose: i32,
    pub is_medium: i32,
    pub is_soft: i32,
    pub is_tight: i32,
    pub is_high_pt: i32,
    pub is_trk_mu_ost: i32,
    pub is_trk_hp: i32,

    // Impact parameters w.r.t. the leading vertex and the beam spot.
    pub dxy: f64,
    pub dz: f64,
    pub edxy: f64,
    pub edz: f64,
    pub dxy_best: f64,
    pub dz_best: f64,
    pub dxy_inner: f64,
    pub dz_inner: f64,
    pub dxy_bs: f64,
    pub dz_bs: f64,

    // Timing.
    pub muon_time_dof: i32,
    pub muon_time: f64,
    pub muon_time_err: f64,
}

impl Default for MuonRecord {
    fn default() -> Self {
        MuonRecord {
            pt: 0.0,
            eta: 0.0,
            phi: 0.0,
            charge: 0,
            pt_global: KINEMATICS_UNAVAILABLE,
            eta_global: KINEMATICS_UNAVAILABLE,
            phi_global: KINEMATICS_UNAVAILABLE,
            charge_global: KINEMATICS_UNAVAILABLE_INT,
            pt_tune_p: KINEMATICS_UNAVAILABLE,
            eta_tune_p: KINEMATICS_UNAVAILABLE,
            phi_tune_p: KINEMATICS_UNAVAILABLE,
            charge_tune_p: KINEMATICS_UNAVAILABLE_INT,
            pt_tracker: KINEMATICS_UNAVAILABLE,
            eta_tracker: KINEMATICS_UNAVAILABLE,
            phi_tracker: KINEMATICS_UNAVAILABLE,
            charge_tracker: KINEMATICS_UNAVAILABLE_INT,
            charged_hadron_iso: 0.0,
            charged_hadron_iso_pu: 0.0,
            neutral_hadron_iso: 0.0,
            photon_iso: 0.0,
            iso_pflow_04: 0.0,
            iso_pflow_03: 0.0,
            is_global: FLAG_FAIL,
            is_tracker: FLAG_FAIL,
            is_tracker_arb: FLAG_FAIL,
            is_rpc: FLAG_FAIL,
            is_standalone: FLAG_FAIL,
            is_pf: FLAG_FAIL,
            n_hits_global: DIAGNOSTIC_UNAVAILABLE_INT,
            n_hits_tracker: DIAGNOSTIC_UNAVAILABLE_INT,
            n_hits_standalone: DIAGNOSTIC_UNAVAILABLE_INT,
            glb_norm_chi2: DIAGNOSTIC_UNAVAILABLE,
            trk_norm_chi2: DIAGNOSTIC_UNAVAILABLE,
            trk_muon_matched_stations: DIAGNOSTIC_UNAVAILABLE_INT,
            glb_muon_valid_hits: DIAGNOSTIC_UNAVAILABLE_INT,
            trk_pixel_valid_hits: DIAGNOSTIC_UNAVAILABLE_INT,
            trk_pixel_layers_with_meas: DIAGNOSTIC_UNAVAILABLE_INT,
            trk_tracker_layers_with_meas: DIAGNOSTIC_UNAVAILABLE_INT,
            best_mu_pt_err: DIAGNOSTIC_UNAVAILABLE,
            trk_valid_hit_frac: DIAGNOSTIC_UNAVAILABLE,
            trk_sta_chi2: DIAGNOSTIC_UNAVAILABLE,
            trk_kink: DIAGNOSTIC_UNAVAILABLE,
            mu_segm_comp: DIAGNOSTIC_UNAVAILABLE,
            is_loose: FLAG_FAIL,
            is_medium: FLAG_FAIL,
            is_soft: FLAG_FAIL,
            is_tight: FLAG_FAIL,
            is_high_pt: FLAG_FAIL,
            is_trk_mu_ost: FLAG_FAIL,
            is_trk_hp: FLAG_FAIL,
            dxy: KINEMATICS_UNAVAILABLE,
            dz: KINEMATICS_UNAVAILABLE,
            edxy: KINEMATICS_UNAVAILABLE,
            edz: KINEMATICS_UNAVAILABLE,
            dxy_best: DIAGNOSTIC_UNAVAILABLE,
            dz_best: DIAGNOSTIC_UNAVAILABLE,
            dxy_inner: DIAGNOSTIC_UNAVAILABLE,
            dz_inner: DIAGNOSTIC_UNAVAILABLE,
            dxy_bs: KINEMATICS_UNAVAILABLE,
            dz_bs: KINEMATICS_UNAVAILABLE,
            muon_time_dof: DIAGNOSTIC_UNAVAILABLE_INT,
            muon_time: DIAGNOSTIC_UNAVAILABLE,
            muon_time_err: DIAGNOSTIC_UNAVAILABLE,
        }
    }
}

/// The flat per-event record appended to the persisted table.
///
/// `Default` is the documented reset state: cleared sequences, zeroed vertex
/// position and covariance, vertex count -1 and MET scalars at -999. Every
/// sequence is rebuilt from scratch for each event; nothing carries over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub run_number: u32,
    pub luminosity_block_number: u32,
    pub event_number: u64,

    pub primary_vertex: [f64; 3],
    pub cov_primary_vertex: [[f64; 3]; 3],
    pub n_vtx: i32,

    pub mets: MetRecord,
    pub hlt: HltSummary,

    pub gen_infos: Vec<GenInfo>,
    pub gen_particles: Vec<GenParticle>,
    pub muons: Vec<MuonRecord>,
}

impl Default for EventRecord {
    fn default() -> Self {
        EventRecord {
            run_number: 0,
            luminosity_block_number: 0,
            event_number: 0,
            primary_vertex: [0.0; 3],
            cov_primary_vertex: [[0.0; 3]; 3],
            n_vtx: VERTEX_COUNT_UNAVAILABLE,
            mets: MetRecord::default(),
            hlt: HltSummary::default(),
            gen_infos: Vec::new(),
            gen_particles: Vec::new(),
            muons: Vec::new(),
        }
    }
}

impl EventRecord {
    /// Identity of the event this record was built from.
    pub fn event_id(&self) -> EventId {
        EventId {
            run_number: self.run_number,
            luminosity_block_number: self.luminosity_block_number,
            event_number: self.event_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_reset_state() {
        let record = EventRecord::default();
        assert_eq!(record.n_vtx, -1);
        assert_eq!(record.mets.pf_met, -999.0);
        assert_eq!(record.mets.pf_ch_met, -999.0);
        assert_eq!(record.mets.calo_met, -999.0);
        assert_eq!(record.primary_vertex, [0.0; 3]);
        assert!(record.hlt.triggers.is_empty());
        assert!(record.hlt.objects.is_empty());
        assert!(record.muons.is_empty());
    }

    #[test]
    fn test_default_muon_row_placeholders() {
        let row = MuonRecord::default();
        assert_eq!(row.pt_global, -1000.0);
        assert_eq!(row.charge_global, -1000);
        assert_eq!(row.n_hits_global, -999);
        assert_eq!(row.dxy, -1000.0);
        assert_eq!(row.dxy_best, -999.0);
        assert_eq!(row.muon_time_dof, -999);
        assert_eq!(row.is_tight, 0);
    }
}
