use clap::Parser;
use mucore::builder::assemble::{build_record, ProducerConfig};
use mucore::data::reco::EventInputs;
use mutree::sim::generator::EventGenerator;
use mutree::tree::writer::TreeWriter;
use rayon::prelude::*;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Build flat muon event records and append them to a persisted table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of event inputs
    #[arg(long, conflicts_with = "generate")]
    input: Option<PathBuf>,

    /// Generate this many synthetic events instead of reading a file
    #[arg(long)]
    generate: Option<usize>,

    /// Seed for the synthetic generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output table file
    #[arg(short, long)]
    output: PathBuf,

    /// Build records in parallel; rows are still appended in input order
    #[arg(long)]
    parallel: bool,

    /// Disable a logical input by its configuration name (repeatable),
    /// e.g. --disable pfMet --disable trigResults
    #[arg(long)]
    disable: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = ProducerConfig::default();
    for name in &args.disable {
        if !cfg.disable(name) {
            return Err(format!("unknown logical input '{}'", name).into());
        }
    }

    let events: Vec<EventInputs> = match (&args.input, args.generate) {
        (Some(path), _) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        (None, Some(n)) => EventGenerator::new(args.seed).events(n),
        (None, None) => return Err("either --input or --generate is required".into()),
    };

    let mut writer = TreeWriter::create(&args.output)?;

    if args.parallel {
        // Each event gets an independently owned record; the single writer
        // appends them in input order.
        let built: Vec<_> = events
            .par_iter()
            .map(|inputs| build_record(&cfg, inputs))
            .collect();
        for (record, event_id) in &built {
            writer.append(record, event_id)?;
        }
    } else {
        for inputs in &events {
            let (record, event_id) = build_record(&cfg, inputs);
            writer.append(&record, &event_id)?;
        }
    }

    println!(
        "appended {} events to {}",
        events.len(),
        args.output.display()
    );

    Ok(())
}
