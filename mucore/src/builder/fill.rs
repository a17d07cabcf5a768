//! Entity builders: one per raw collection.
//!
//! Each builder consumes its collection and appends output sub-records to the
//! event record. Builders never depend on each other and never fail; every
//! missing sub-measurement degrades to its placeholder.

use crate::algorithm::derive::{
    combined_relative_isolation, displacement, displacement_error, impact_parameter_track,
    track_kinematics,
};
use crate::algorithm::quality;
use crate::algorithm::sentinel::{
    DIAGNOSTIC_UNAVAILABLE, DIAGNOSTIC_UNAVAILABLE_INT, FLAG_FAIL, FLAG_PASS,
    INTERACTIONS_UNAVAILABLE,
};
use crate::data::event::{EventRecord, GenInfo, GenParticle, HltObject, MuonRecord};
use crate::data::reco::{
    BeamSpot, GenEventInfo, GenParticleRaw, MetReading, PileupSummary, RecoMuon, RecoVertex,
    TriggerResults, TriggerSummary,
};

fn flag(pass: bool) -> i32 {
    if pass {
        FLAG_PASS
    } else {
        FLAG_FAIL
    }
}

/// Append the generator-level pile-up and weight summary.
///
/// Exactly one entry is appended per invocation; the interaction counts stay
/// at -1 when no in-time bunch crossing exists in the summary.
pub fn fill_gen_info(record: &mut EventRecord, pileup: &[PileupSummary], gen: &GenEventInfo) {
    let mut gen_info = GenInfo {
        true_number_of_interactions: INTERACTIONS_UNAVAILABLE,
        actual_number_of_interactions: INTERACTIONS_UNAVAILABLE,
        gen_weight: gen.weight,
    };

    for entry in pileup {
        // Out-of-time bunch crossings are read but carry no event counts.
        if entry.bunch_crossing == 0 {
            gen_info.true_number_of_interactions = entry.true_num_interactions;
            gen_info.actual_number_of_interactions = entry.actual_num_interactions as f64;
        }
    }

    record.gen_infos.push(gen_info);
}

/// Append every generator-truth particle, including the two leading entries.
pub fn fill_gen_particles(record: &mut EventRecord, particles: &[GenParticleRaw]) {
    for (i, part) in particles.iter().enumerate() {
        let mut mothers = part.mothers.clone();

        // Known defect of the truth collection: entries past the initial
        // protons can come with no recorded mother. Record a mother id of 0
        // for those so the mother list is never silently empty.
        if i >= 2 && mothers.is_empty() {
            mothers.push(0);
        }

        record.gen_particles.push(GenParticle {
            pdg_id: part.pdg_id,
            status: part.status,
            energy: part.energy,
            pt: part.pt,
            eta: part.eta,
            phi: part.phi,
            vx: part.vx,
            vy: part.vy,
            vz: part.vz,
            mothers,
        });
    }
}

/// Append accepted trigger-path names and flattened trigger objects.
///
/// Paths and objects are independent sequences. Each filter contributes one
/// object entry per matched key, so an object matched by several filters
/// appears once per filter tag.
pub fn fill_trigger(record: &mut EventRecord, results: &TriggerResults, summary: &TriggerSummary) {
    for path in &results.paths {
        if path.accepted {
            record.hlt.triggers.push(path.name.clone());
        }
    }

    for filter in &summary.filters {
        for &key in &filter.object_keys {
            // Keys are guaranteed in-range by the upstream framework; a
            // stale key in hand-built input is skipped rather than trusted.
            if let Some(obj) = summary.objects.get(key) {
                record.hlt.objects.push(HltObject {
                    filter_tag: filter.tag.clone(),
                    pt: obj.pt,
                    eta: obj.eta,
                    phi: obj.phi,
                });
            }
        }
    }
}

/// Count valid vertices and copy the position of the leading one.
///
/// The position is taken from the iteration-first vertex only if that vertex
/// is itself valid: an invalid leading vertex leaves the position fields at
/// their defaults even when later valid vertices exist. Single-pass behavior
/// of the source, kept as-is.
pub fn fill_vertices(record: &mut EventRecord, vertices: &[RecoVertex]) {
    let mut n_vtx = 0;

    for (i, vertex) in vertices.iter().enumerate() {
        if !vertex.valid {
            continue;
        }
        n_vtx += 1;

        if i == 0 {
            record.primary_vertex = [vertex.x, vertex.y, vertex.z];
            record.cov_primary_vertex = vertex.covariance;
        }
    }

    record.n_vtx = n_vtx;
}

/// Overwrite the -999 defaults with each missing-energy reading that is
/// present for the event. The three inputs are independent.
pub fn fill_met(
    record: &mut EventRecord,
    pf_met: Option<&MetReading>,
    pf_ch_met: Option<&MetReading>,
    calo_met: Option<&MetReading>,
) {
    if let Some(met) = pf_met {
        record.mets.pf_met = met.et;
    }
    if let Some(met) = pf_ch_met {
        record.mets.pf_ch_met = met.et;
    }
    if let Some(met) = calo_met {
        record.mets.calo_met = met.et;
    }
}

/// Append one flattened row per reconstructed muon, in input order, with no
/// filtering: selection flags mark rather than exclude.
pub fn fill_muons(
    record: &mut EventRecord,
    muons: &[RecoMuon],
    vertices: &[RecoVertex],
    beam_spot: &BeamSpot,
) {
    for mu in muons {
        let inner = mu.inner_track.as_ref();
        let global = mu.global_track.as_ref();

        let mut row = MuonRecord::default();

        row.pt = mu.pt;
        row.eta = mu.eta;
        row.phi = mu.phi;
        row.charge = mu.charge;

        (row.pt_global, row.eta_global, row.phi_global, row.charge_global) =
            track_kinematics(global);
        (row.pt_tune_p, row.eta_tune_p, row.phi_tune_p, row.charge_tune_p) =
            track_kinematics(mu.tune_p_track.as_ref());
        (row.pt_tracker, row.eta_tracker, row.phi_tracker, row.charge_tracker) =
            track_kinematics(inner);

        let iso04 = &mu.iso_r04;
        let iso03 = &mu.iso_r03;

        row.charged_hadron_iso = iso04.sum_charged_hadron_pt;
        row.charged_hadron_iso_pu = iso04.sum_pu_pt;
        row.neutral_hadron_iso = iso04.sum_neutral_hadron_et;
        row.photon_iso = iso04.sum_photon_et;

        row.iso_pflow_04 = combined_relative_isolation(iso04, mu.pt);
        row.iso_pflow_03 = combined_relative_isolation(iso03, mu.pt);

        row.is_global = flag(mu.is_global);
        row.is_tracker = flag(mu.is_tracker);
        row.is_tracker_arb = flag(mu.is_tracker_arb);
        row.is_rpc = flag(mu.is_rpc);
        row.is_standalone = flag(mu.is_standalone);
        row.is_pf = flag(mu.is_pf);

        row.n_hits_global = global.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.valid_hits);
        row.n_hits_tracker = if mu.is_tracker {
            inner.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.valid_hits)
        } else {
            DIAGNOSTIC_UNAVAILABLE_INT
        };
        row.n_hits_standalone = if mu.is_standalone {
            mu.outer_track
                .as_ref()
                .map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.valid_hits)
        } else {
            DIAGNOSTIC_UNAVAILABLE_INT
        };

        row.glb_norm_chi2 = global.map_or(DIAGNOSTIC_UNAVAILABLE, |t| t.norm_chi2);
        row.trk_norm_chi2 = inner.map_or(DIAGNOSTIC_UNAVAILABLE, |t| t.norm_chi2);
        row.trk_muon_matched_stations = if mu.is_tracker {
            mu.matched_stations
        } else {
            DIAGNOSTIC_UNAVAILABLE_INT
        };
        row.glb_muon_valid_hits = global.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.valid_muon_hits);
        row.trk_pixel_valid_hits =
            inner.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.valid_pixel_hits);
        row.trk_pixel_layers_with_meas =
            inner.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.pixel_layers_with_meas);
        row.trk_tracker_layers_with_meas =
            inner.map_or(DIAGNOSTIC_UNAVAILABLE_INT, |t| t.tracker_layers_with_meas);

        row.best_mu_pt_err = mu.best_track.pt_err;

        row.trk_valid_hit_frac = inner.map_or(DIAGNOSTIC_UNAVAILABLE, |t| t.valid_hit_frac);
        row.trk_sta_chi2 = if mu.is_global {
            mu.combined_quality.chi2_local_position
        } else {
            DIAGNOSTIC_UNAVAILABLE
        };
        row.trk_kink = if mu.is_global {
            mu.combined_quality.trk_kink
        } else {
            DIAGNOSTIC_UNAVAILABLE
        };
        row.mu_segm_comp = if mu.is_global || mu.is_tracker {
            mu.segment_compatibility
        } else {
            DIAGNOSTIC_UNAVAILABLE
        };

        row.is_trk_mu_ost = flag(mu.one_station_tight);
        row.is_trk_hp = flag(inner.map_or(false, |t| t.high_purity));

        row.is_loose = flag(quality::is_loose(mu));
        row.is_medium = flag(quality::is_medium(mu));

        let ip_track = impact_parameter_track(mu);

        (row.dxy_bs, row.dz_bs) = displacement(ip_track, beam_spot.position);
        (row.edxy, row.edz) = displacement_error(ip_track);

        // Vertex-relative quantities and working points are evaluated
        // against the leading vertex only when one exists; otherwise the
        // defaults (placeholders and fail flags) stand.
        if let Some(vertex) = vertices.first() {
            let position = vertex.position();

            (row.dxy, row.dz) = displacement(ip_track, position);

            row.dxy_best = mu.best_track.dxy(position);
            row.dz_best = mu.best_track.dz(position);
            if let Some(t) = inner {
                row.dxy_inner = t.dxy(position);
                row.dz_inner = t.dz(position);
            }

            row.is_soft = flag(quality::is_soft(mu, vertex));
            row.is_tight = flag(quality::is_tight(mu, vertex));
            row.is_high_pt = flag(quality::is_high_pt(mu, vertex));
        }

        if let Some(time) = &mu.time {
            row.muon_time_dof = time.n_dof;
            row.muon_time = time.time_at_ip;
            row.muon_time_err = time.time_err;
        }

        record.muons.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reco::{
        CombinedQuality, PfIsolation, Point3, TrackFit, TriggerFilter, TriggerObjectKinematics,
        TriggerPath,
    };

    fn track() -> TrackFit {
        TrackFit {
            pt: 30.0,
            eta: 0.2,
            phi: -1.1,
            charge: 1,
            reference_point: Point3::default(),
            pt_err: 0.4,
            dxy_err: 0.001,
            dz_err: 0.003,
            valid_hits: 25,
            norm_chi2: 1.0,
            valid_muon_hits: 10,
            valid_pixel_hits: 4,
            pixel_layers_with_meas: 3,
            tracker_layers_with_meas: 11,
            valid_hit_frac: 0.97,
            high_purity: true,
        }
    }

    fn standalone_only_muon() -> RecoMuon {
        RecoMuon {
            pt: 20.0,
            eta: 1.2,
            phi: 0.4,
            charge: -1,
            is_global: false,
            is_tracker: false,
            is_tracker_arb: false,
            is_rpc: false,
            is_standalone: true,
            is_pf: false,
            global_track: None,
            inner_track: None,
            outer_track: Some(track()),
            tune_p_track: None,
            best_track: track(),
            iso_r03: PfIsolation::default(),
            iso_r04: PfIsolation::default(),
            matched_stations: 0,
            segment_compatibility: 0.0,
            combined_quality: CombinedQuality::default(),
            one_station_tight: false,
            time: None,
        }
    }

    fn valid_vertex(z: f64) -> RecoVertex {
        RecoVertex {
            x: 0.01,
            y: -0.02,
            z,
            covariance: [[1e-6; 3]; 3],
            valid: true,
        }
    }

    #[test]
    fn test_gen_info_takes_in_time_crossing_only() {
        let mut record = EventRecord::default();
        let pileup = vec![
            PileupSummary {
                bunch_crossing: -1,
                true_num_interactions: 50.0,
                actual_num_interactions: 48,
            },
            PileupSummary {
                bunch_crossing: 0,
                true_num_interactions: 23.5,
                actual_num_interactions: 21,
            },
            PileupSummary {
                bunch_crossing: 1,
                true_num_interactions: 60.0,
                actual_num_interactions: 61,
            },
        ];
        fill_gen_info(&mut record, &pileup, &GenEventInfo { weight: -0.75 });

        assert_eq!(record.gen_infos.len(), 1);
        let info = &record.gen_infos[0];
        assert_eq!(info.true_number_of_interactions, 23.5);
        assert_eq!(info.actual_number_of_interactions, 21.0);
        assert_eq!(info.gen_weight, -0.75);
    }

    #[test]
    fn test_gen_info_without_in_time_crossing_keeps_defaults() {
        let mut record = EventRecord::default();
        let pileup = vec![PileupSummary {
            bunch_crossing: 2,
            true_num_interactions: 30.0,
            actual_num_interactions: 29,
        }];
        fill_gen_info(&mut record, &pileup, &GenEventInfo { weight: 1.0 });

        assert_eq!(record.gen_infos.len(), 1);
        assert_eq!(record.gen_infos[0].true_number_of_interactions, -1.0);
        assert_eq!(record.gen_infos[0].actual_number_of_interactions, -1.0);
    }

    fn truth_particle(pdg_id: i32, mothers: Vec<i32>) -> GenParticleRaw {
        GenParticleRaw {
            pdg_id,
            status: 1,
            energy: 10.0,
            pt: 5.0,
            eta: 0.0,
            phi: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            mothers,
        }
    }

    #[test]
    fn test_gen_particles_orphan_past_protons_gets_sentinel_mother() {
        let mut record = EventRecord::default();
        let particles = vec![
            truth_particle(2212, vec![]),
            truth_particle(2212, vec![]),
            truth_particle(13, vec![]),
            truth_particle(-13, vec![23]),
        ];
        fill_gen_particles(&mut record, &particles);

        assert_eq!(record.gen_particles.len(), 4);
        // The two leading entries keep their empty mother lists.
        assert!(record.gen_particles[0].mothers.is_empty());
        assert!(record.gen_particles[1].mothers.is_empty());
        // Index 2 with no recorded mothers gets exactly one sentinel 0.
        assert_eq!(record.gen_particles[2].mothers, vec![0]);
        assert_eq!(record.gen_particles[3].mothers, vec![23]);
    }

    #[test]
    fn test_trigger_object_fan_out_across_filters() {
        let mut record = EventRecord::default();
        let results = TriggerResults {
            paths: vec![
                TriggerPath {
                    name: "HLT_IsoMu24_v2".to_string(),
                    accepted: true,
                },
                TriggerPath {
                    name: "HLT_Mu50_v1".to_string(),
                    accepted: false,
                },
            ],
        };
        let summary = TriggerSummary {
            filters: vec![
                TriggerFilter {
                    tag: "hltL3MuFiltered24".to_string(),
                    object_keys: vec![0],
                },
                TriggerFilter {
                    tag: "hltIsoFiltered24".to_string(),
                    object_keys: vec![0, 1],
                },
            ],
            objects: vec![
                TriggerObjectKinematics {
                    pt: 25.0,
                    eta: 0.1,
                    phi: 0.2,
                },
                TriggerObjectKinematics {
                    pt: 31.0,
                    eta: -1.0,
                    phi: 2.0,
                },
            ],
        };
        fill_trigger(&mut record, &results, &summary);

        assert_eq!(record.hlt.triggers, vec!["HLT_IsoMu24_v2".to_string()]);
        assert_eq!(record.hlt.objects.len(), 3);
        // Same physical object under two distinct filter tags, identical
        // kinematics.
        assert_eq!(record.hlt.objects[0].filter_tag, "hltL3MuFiltered24");
        assert_eq!(record.hlt.objects[1].filter_tag, "hltIsoFiltered24");
        assert_eq!(record.hlt.objects[0].pt, record.hlt.objects[1].pt);
        assert_eq!(record.hlt.objects[2].pt, 31.0);
    }

    #[test]
    fn test_vertices_counts_valid_only() {
        let mut record = EventRecord::default();
        let mut invalid = valid_vertex(1.0);
        invalid.valid = false;
        let vertices = vec![valid_vertex(0.5), invalid, valid_vertex(-2.0)];
        fill_vertices(&mut record, &vertices);

        assert_eq!(record.n_vtx, 2);
        assert_eq!(record.primary_vertex, [0.01, -0.02, 0.5]);
    }

    #[test]
    fn test_vertices_invalid_leading_vertex_records_no_position() {
        let mut record = EventRecord::default();
        let mut invalid = valid_vertex(0.5);
        invalid.valid = false;
        let vertices = vec![invalid, valid_vertex(-2.0)];
        fill_vertices(&mut record, &vertices);

        // Later valid vertices are counted but never promoted to the
        // primary-vertex fields.
        assert_eq!(record.n_vtx, 1);
        assert_eq!(record.primary_vertex, [0.0; 3]);
    }

    #[test]
    fn test_met_defaults_and_partial_overwrite() {
        let mut record = EventRecord::default();
        fill_met(&mut record, Some(&MetReading { et: 42.0 }), None, None);
        assert_eq!(record.mets.pf_met, 42.0);
        assert_eq!(record.mets.pf_ch_met, -999.0);
        assert_eq!(record.mets.calo_met, -999.0);
    }

    #[test]
    fn test_muon_without_global_fit_gets_placeholders() {
        let mut record = EventRecord::default();
        let muons = vec![standalone_only_muon()];
        fill_muons(&mut record, &muons, &[valid_vertex(0.0)], &BeamSpot::default());

        assert_eq!(record.muons.len(), 1);
        let row = &record.muons[0];
        assert_eq!(row.pt_global, -1000.0);
        assert_eq!(row.charge_global, -1000);
        assert_eq!(row.pt_tracker, -1000.0);
        assert_eq!(row.n_hits_global, -999);
        assert_eq!(row.glb_norm_chi2, -999.0);
        assert_eq!(row.trk_sta_chi2, -999.0);
        assert_eq!(row.mu_segm_comp, -999.0);
        // No global fit and no inner track: impact parameters unavailable.
        assert_eq!(row.dxy, -1000.0);
        assert_eq!(row.dxy_bs, -1000.0);
        assert_eq!(row.edxy, -1000.0);
        // The standalone fit is still reported.
        assert_eq!(row.n_hits_standalone, 25);
        assert_eq!(row.is_standalone, 1);
    }

    #[test]
    fn test_muon_without_vertices_skips_vertex_relative_fields() {
        let mut record = EventRecord::default();
        let mut mu = standalone_only_muon();
        mu.is_global = true;
        mu.global_track = Some(track());
        mu.inner_track = Some(track());
        fill_muons(&mut record, &[mu], &[], &BeamSpot::default());

        let row = &record.muons[0];
        // Vertex-relative flags stay at fail, impact parameters at their
        // defaults.
        assert_eq!(row.is_soft, 0);
        assert_eq!(row.is_tight, 0);
        assert_eq!(row.is_high_pt, 0);
        assert_eq!(row.dxy, -1000.0);
        assert_eq!(row.dxy_best, -999.0);
        assert_eq!(row.dxy_inner, -999.0);
        // Beam-spot displacement is still computed from the global fit.
        assert!(row.dxy_bs != -1000.0);
    }

    #[test]
    fn test_muon_timing_triple() {
        let mut record = EventRecord::default();
        let mut mu = standalone_only_muon();
        mu.time = Some(crate::data::reco::MuonTime {
            n_dof: 8,
            time_at_ip: 0.9,
            time_err: 0.25,
        });
        fill_muons(&mut record, &[mu.clone()], &[], &BeamSpot::default());
        mu.time = None;
        fill_muons(&mut record, &[mu], &[], &BeamSpot::default());

        assert_eq!(record.muons[0].muon_time_dof, 8);
        assert_eq!(record.muons[0].muon_time, 0.9);
        assert_eq!(record.muons[1].muon_time_dof, -999);
        assert_eq!(record.muons[1].muon_time, -999.0);
        assert_eq!(record.muons[1].muon_time_err, -999.0);
    }
}
