//! Seeded synthetic event generation for tests and demos.
//!
//! Produces event inputs with realistic shapes: muons with partial track
//! availability, occasionally invalid vertices, dropped optional inputs and
//! both real-data and simulated events. Same seed, same events.

use mucore::data::reco::{
    BeamSpot, CombinedQuality, EventInputs, GenEventInfo, GenParticleRaw, MetReading, MuonTime,
    PfIsolation, PileupSummary, Point3, RecoMuon, RecoVertex, TrackFit, TriggerFilter,
    TriggerObjectKinematics, TriggerPath, TriggerResults, TriggerSummary,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const TRIGGER_PATHS: [&str; 3] = ["HLT_IsoMu24_v2", "HLT_Mu50_v1", "HLT_IsoTkMu24_v3"];

pub struct EventGenerator {
    rng: StdRng,
    run_number: u32,
    next_event_number: u64,
}

impl EventGenerator {
    pub fn new(seed: u64) -> Self {
        EventGenerator {
            rng: StdRng::seed_from_u64(seed),
            run_number: 273158,
            next_event_number: 1,
        }
    }

    pub fn events(&mut self, n: usize) -> Vec<EventInputs> {
        (0..n).map(|_| self.next_event()).collect()
    }

    fn track(&mut self, pt: f64, eta: f64, phi: f64, charge: i32) -> TrackFit {
        let smear = |rng: &mut StdRng, x: f64| x * rng.gen_range(0.97..1.03);
        TrackFit {
            pt: smear(&mut self.rng, pt),
            eta: smear(&mut self.rng, eta),
            phi,
            charge,
            reference_point: Point3::new(
                self.rng.gen_range(-0.05..0.05),
                self.rng.gen_range(-0.05..0.05),
                self.rng.gen_range(-10.0..10.0),
            ),
            pt_err: pt * self.rng.gen_range(0.005..0.05),
            dxy_err: self.rng.gen_range(0.0005..0.005),
            dz_err: self.rng.gen_range(0.001..0.01),
            valid_hits: self.rng.gen_range(10..35),
            norm_chi2: self.rng.gen_range(0.5..4.0),
            valid_muon_hits: self.rng.gen_range(0..30),
            valid_pixel_hits: self.rng.gen_range(0..6),
            pixel_layers_with_meas: self.rng.gen_range(0..4),
            tracker_layers_with_meas: self.rng.gen_range(3..14),
            valid_hit_frac: self.rng.gen_range(0.5..1.0),
            high_purity: self.rng.gen_bool(0.85),
        }
    }

    fn muon(&mut self) -> RecoMuon {
        let pt = self.rng.gen_range(5.0..100.0);
        let eta = self.rng.gen_range(-2.4..2.4);
        let phi = self.rng.gen_range(-PI..PI);
        let charge = if self.rng.gen_bool(0.5) { 1 } else { -1 };

        let is_tracker = self.rng.gen_bool(0.85);
        let is_standalone = self.rng.gen_bool(0.6);
        let is_global = is_standalone && self.rng.gen_bool(0.8);

        let inner_track = is_tracker.then(|| self.track(pt, eta, phi, charge));
        let outer_track = is_standalone.then(|| self.track(pt, eta, phi, charge));
        let global_track = is_global.then(|| self.track(pt, eta, phi, charge));
        let tune_p_track = (is_global || inner_track.is_some())
            .then(|| self.track(pt, eta, phi, charge));

        let best_track = global_track
            .clone()
            .or_else(|| inner_track.clone())
            .or_else(|| outer_track.clone())
            .unwrap_or_else(|| self.track(pt, eta, phi, charge));

        let isolation = |rng: &mut StdRng| PfIsolation {
            sum_charged_hadron_pt: rng.gen_range(0.0..5.0),
            sum_neutral_hadron_et: rng.gen_range(0.0..3.0),
            sum_photon_et: rng.gen_range(0.0..3.0),
            sum_pu_pt: rng.gen_range(0.0..6.0),
        };

        RecoMuon {
            pt,
            eta,
            phi,
            charge,
            is_global,
            is_tracker,
            is_tracker_arb: is_tracker && self.rng.gen_bool(0.9),
            is_rpc: self.rng.gen_bool(0.3),
            is_standalone,
            is_pf: self.rng.gen_bool(0.9),
            global_track,
            inner_track,
            outer_track,
            tune_p_track,
            best_track,
            iso_r03: isolation(&mut self.rng),
            iso_r04: isolation(&mut self.rng),
            matched_stations: self.rng.gen_range(0..5),
            segment_compatibility: self.rng.gen_range(0.0..1.0),
            combined_quality: CombinedQuality {
                chi2_local_position: self.rng.gen_range(0.0..30.0),
                trk_kink: self.rng.gen_range(0.0..60.0),
            },
            one_station_tight: is_tracker && self.rng.gen_bool(0.7),
            time: self.rng.gen_bool(0.8).then(|| MuonTime {
                n_dof: self.rng.gen_range(4..40),
                time_at_ip: self.rng.gen_range(-5.0..5.0),
                time_err: self.rng.gen_range(0.1..2.0),
            }),
        }
    }

    fn vertex(&mut self) -> RecoVertex {
        RecoVertex {
            x: self.rng.gen_range(0.05..0.07),
            y: self.rng.gen_range(0.08..0.10),
            z: self.rng.gen_range(-15.0..15.0),
            covariance: [[self.rng.gen_range(1e-7..1e-5); 3]; 3],
            valid: self.rng.gen_bool(0.9),
        }
    }

    fn trigger(&mut self) -> (TriggerResults, TriggerSummary) {
        let paths = TRIGGER_PATHS
            .iter()
            .map(|name| TriggerPath {
                name: name.to_string(),
                accepted: self.rng.gen_bool(0.4),
            })
            .collect();

        let n_objects = self.rng.gen_range(0..3);
        let objects: Vec<TriggerObjectKinematics> = (0..n_objects)
            .map(|_| TriggerObjectKinematics {
                pt: self.rng.gen_range(20.0..80.0),
                eta: self.rng.gen_range(-2.4..2.4),
                phi: self.rng.gen_range(-PI..PI),
            })
            .collect();

        let filters = (0..self.rng.gen_range(0..3))
            .map(|i| TriggerFilter {
                tag: format!("hltL3MuFiltered{}", 24 + i),
                object_keys: (0..objects.len())
                    .filter(|_| self.rng.gen_bool(0.7))
                    .collect(),
            })
            .collect();

        (
            TriggerResults { paths },
            TriggerSummary { filters, objects },
        )
    }

    fn gen_particles(&mut self) -> Vec<GenParticleRaw> {
        let mut particle = |pdg_id: i32, status: i32, mothers: Vec<i32>| {
            let pt = self.rng.gen_range(1.0..80.0);
            GenParticleRaw {
                pdg_id,
                status,
                energy: pt * 1.2,
                pt,
                eta: self.rng.gen_range(-4.0..4.0),
                phi: self.rng.gen_range(-PI..PI),
                vx: 0.0,
                vy: 0.0,
                vz: self.rng.gen_range(-10.0..10.0),
                mothers,
            }
        };
        // Two beam protons, a boson and its decay muons; one orphan to
        // exercise the sentinel-mother rule.
        vec![
            particle(2212, 4, vec![]),
            particle(2212, 4, vec![]),
            particle(23, 22, vec![]),
            particle(13, 1, vec![23]),
            particle(-13, 1, vec![23]),
        ]
    }

    pub fn next_event(&mut self) -> EventInputs {
        let event_number = self.next_event_number;
        self.next_event_number += 1;

        let is_real_data = self.rng.gen_bool(0.5);
        let (trigger_results, trigger_summary) = self.trigger();

        let n_muons = self.rng.gen_range(0..4);
        let muons: Vec<RecoMuon> = (0..n_muons).map(|_| self.muon()).collect();
        let n_vertices = self.rng.gen_range(1..5);
        let vertices: Vec<RecoVertex> = (0..n_vertices).map(|_| self.vertex()).collect();

        let met = |rng: &mut StdRng| {
            rng.gen_bool(0.9)
                .then(|| vec![MetReading { et: rng.gen_range(0.0..150.0) }])
        };

        EventInputs {
            run_number: self.run_number,
            luminosity_block_number: 1 + (event_number / 100) as u32,
            event_number,
            is_real_data,
            trigger_results: Some(trigger_results),
            trigger_summary: Some(trigger_summary),
            muons: Some(muons),
            vertices: Some(vertices),
            beam_spot: Some(BeamSpot {
                position: Point3::new(0.06, 0.09, self.rng.gen_range(-1.0..1.0)),
            }),
            pf_met: met(&mut self.rng),
            pf_ch_met: met(&mut self.rng),
            calo_met: met(&mut self.rng),
            gen_particles: (!is_real_data).then(|| self.gen_particles()),
            pileup_info: (!is_real_data).then(|| {
                vec![
                    PileupSummary {
                        bunch_crossing: -1,
                        true_num_interactions: self.rng.gen_range(10.0..60.0),
                        actual_num_interactions: self.rng.gen_range(10..60),
                    },
                    PileupSummary {
                        bunch_crossing: 0,
                        true_num_interactions: self.rng.gen_range(10.0..60.0),
                        actual_num_interactions: self.rng.gen_range(10..60),
                    },
                ]
            }),
            gen_info: (!is_real_data).then(|| GenEventInfo {
                weight: if self.rng.gen_bool(0.95) { 1.0 } else { -1.0 },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_events() {
        let a = EventGenerator::new(11).events(10);
        let b = EventGenerator::new(11).events(10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_event_numbers_are_sequential() {
        let events = EventGenerator::new(3).events(4);
        let numbers: Vec<u64> = events.iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_simulated_events_carry_generator_content() {
        for event in EventGenerator::new(5).events(50) {
            if event.is_real_data {
                assert!(event.gen_particles.is_none());
                assert!(event.pileup_info.is_none());
            } else {
                assert!(event.gen_particles.is_some());
                assert!(event.pileup_info.is_some());
                assert!(event.gen_info.is_some());
            }
        }
    }
}
