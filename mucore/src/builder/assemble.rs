//! Per-event record assembly.
//!
//! `build_record` is the single entry point: it constructs a fresh record
//! from one event's inputs and returns it together with the event identity.
//! The caller owns sequencing and persistence; nothing is shared between
//! calls, so re-running on the same inputs reproduces the record bit for
//! bit.

use serde::{Deserialize, Serialize};

use crate::builder::fill::{
    fill_gen_info, fill_gen_particles, fill_met, fill_muons, fill_trigger, fill_vertices,
};
use crate::builder::resolve::{resolve, resolve_first, InputTag};
use crate::data::event::{EventId, EventRecord};
use crate::data::reco::EventInputs;

/// Logical-input configuration. Each tag carries the collection label and an
/// enabled flag; disabling a tag suppresses the fetch for that input
/// entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerConfig {
    pub trig_results_tag: InputTag,
    pub trig_summary_tag: InputTag,
    pub muon_tag: InputTag,
    pub primary_vertex_tag: InputTag,
    pub beam_spot_tag: InputTag,
    pub pf_met_tag: InputTag,
    pub pf_ch_met_tag: InputTag,
    pub calo_met_tag: InputTag,
    pub gen_tag: InputTag,
    pub pile_up_info_tag: InputTag,
    pub gen_info_tag: InputTag,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        ProducerConfig {
            trig_results_tag: InputTag::new("TriggerResults::HLT"),
            trig_summary_tag: InputTag::new("hltTriggerSummaryAOD::HLT"),
            muon_tag: InputTag::new("muons"),
            primary_vertex_tag: InputTag::new("offlinePrimaryVertices"),
            beam_spot_tag: InputTag::new("offlineBeamSpot"),
            pf_met_tag: InputTag::new("pfMet"),
            pf_ch_met_tag: InputTag::new("pfChMet"),
            calo_met_tag: InputTag::new("caloMet"),
            gen_tag: InputTag::new("prunedGenParticles"),
            pile_up_info_tag: InputTag::new("pileupInfo"),
            gen_info_tag: InputTag::new("generator"),
        }
    }
}

impl ProducerConfig {
    /// Disable one logical input by its configuration name. Returns false
    /// when the name matches no input.
    pub fn disable(&mut self, name: &str) -> bool {
        let tag = match name {
            "trigResults" => &mut self.trig_results_tag,
            "trigSummary" => &mut self.trig_summary_tag,
            "muons" => &mut self.muon_tag,
            "vertices" => &mut self.primary_vertex_tag,
            "beamSpot" => &mut self.beam_spot_tag,
            "pfMet" => &mut self.pf_met_tag,
            "pfChMet" => &mut self.pf_ch_met_tag,
            "caloMet" => &mut self.calo_met_tag,
            "gen" => &mut self.gen_tag,
            "pileupInfo" => &mut self.pile_up_info_tag,
            "genInfo" => &mut self.gen_info_tag,
            _ => return false,
        };
        tag.enabled = false;
        true
    }
}

/// Build the flat record for one event.
///
/// Every builder is attempted independently, gated solely by its own
/// precondition; a missing optional input skips its builder and leaves the
/// record's defaults in place. The record is appended-ready on return —
/// partial records are final.
pub fn build_record(cfg: &ProducerConfig, inputs: &EventInputs) -> (EventRecord, EventId) {
    let mut record = EventRecord::default();

    record.run_number = inputs.run_number;
    record.luminosity_block_number = inputs.luminosity_block_number;
    record.event_number = inputs.event_number;

    let event_id = EventId {
        run_number: inputs.run_number,
        luminosity_block_number: inputs.luminosity_block_number,
        event_number: inputs.event_number,
    };

    // Generator-level pile-up and weight information, simulation only. The
    // two inputs are fetched as a pair.
    if !inputs.is_real_data && cfg.pile_up_info_tag.enabled && cfg.gen_info_tag.enabled {
        let pileup = resolve(
            &cfg.pile_up_info_tag,
            inputs.pileup_info.as_deref(),
            "pile-up info",
        );
        let gen = resolve(&cfg.gen_info_tag, inputs.gen_info.as_ref(), "generator info");
        if let (Some(pileup), Some(gen)) = (pileup.get(), gen.get()) {
            fill_gen_info(&mut record, pileup, gen);
        }
    }

    // Generator-truth particles, simulation only.
    if !inputs.is_real_data {
        if let Some(particles) = resolve(
            &cfg.gen_tag,
            inputs.gen_particles.as_deref(),
            "truth particle",
        )
        .get()
        {
            fill_gen_particles(&mut record, particles);
        }
    }

    // Trigger decisions and trigger objects, fetched as a pair.
    if cfg.trig_results_tag.enabled && cfg.trig_summary_tag.enabled {
        let results = resolve(
            &cfg.trig_results_tag,
            inputs.trigger_results.as_ref(),
            "trigger result",
        );
        let summary = resolve(
            &cfg.trig_summary_tag,
            inputs.trigger_summary.as_ref(),
            "trigger summary",
        );
        if let (Some(results), Some(summary)) = (results.get(), summary.get()) {
            fill_trigger(&mut record, results, summary);
        }
    }

    // Vertices. Kept resolved for the muon builder below.
    let vertices = resolve(
        &cfg.primary_vertex_tag,
        inputs.vertices.as_deref(),
        "vertex",
    );
    if let Some(vertices) = vertices.get() {
        fill_vertices(&mut record, vertices);
    }

    // Beam reference point, consumed by the muon builder only.
    let beam_spot = resolve(&cfg.beam_spot_tag, inputs.beam_spot.as_ref(), "beam spot");

    // Missing-energy summaries, three independent single-object inputs.
    let pf_met = resolve_first(&cfg.pf_met_tag, inputs.pf_met.as_deref(), "PF MET");
    let pf_ch_met = resolve_first(
        &cfg.pf_ch_met_tag,
        inputs.pf_ch_met.as_deref(),
        "PF charged MET",
    );
    let calo_met = resolve_first(&cfg.calo_met_tag, inputs.calo_met.as_deref(), "calo MET");
    fill_met(&mut record, pf_met.get(), pf_ch_met.get(), calo_met.get());

    // Muons need the vertex collection and the beam spot alongside.
    let muons = resolve(&cfg.muon_tag, inputs.muons.as_deref(), "muon");
    if let (Some(muons), Some(vertices), Some(beam_spot)) =
        (muons.get(), vertices.get(), beam_spot.get())
    {
        fill_muons(&mut record, muons, vertices, beam_spot);
    }

    (record, event_id)
}
