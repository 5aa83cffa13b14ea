//! `cost-cli` is a small ambient harness around the codec: it loads a CSV
//! trajectory file, compresses and round-trips each segment, and reports
//! per-segment statistics (§4.6). None of this is part of the invariant-
//! bearing core.

use std::fs;
use std::process::ExitCode;

use tracing::info;

use cost_trajectory::compressor::Compressor;
use cost_trajectory::config::CompressorConfig;
use cost_trajectory::decompressor::Decompressor;
use cost_trajectory::ingest::{load_trajectories, CsvColumns};

const HELP: &str = "\
cost-cli - compress and round-trip GPS trajectories

USAGE:
    cost-cli --input <FILE> [OPTIONS]

OPTIONS:
    --input <FILE>          CSV file to read (required)
    --epsilon <FLOAT>       Absolute spatial tolerance [default: 1e-5]
    --block-size <INT>      Informational header field [default: 1024]
    --evaluation-window <N> Point-based evaluation interval [default: 96]
    --lon-col <NAME>        Longitude column name [default: lon]
    --lat-col <NAME>        Latitude column name [default: lat]
    --ts-col <NAME>         Timestamp column name [default: ts]
    --id-col <NAME>         Optional trajectory-id column name
    -h, --help              Print this help text
";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut pargs = pico_args::Arguments::from_vec(args.into_iter().map(Into::into).collect());

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(&mut pargs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(pargs: &mut pico_args::Arguments) -> Result<(), Box<dyn std::error::Error>> {
    let input: String = pargs.value_from_str("--input")?;
    let epsilon: f64 = pargs
        .opt_value_from_str("--epsilon")?
        .unwrap_or(1e-5);
    let block_size: u16 = pargs
        .opt_value_from_str("--block-size")?
        .unwrap_or(1024);
    let evaluation_window: u16 = pargs
        .opt_value_from_str("--evaluation-window")?
        .unwrap_or(96);
    let columns = CsvColumns {
        longitude: pargs
            .opt_value_from_str("--lon-col")?
            .unwrap_or_else(|| "lon".to_string()),
        latitude: pargs
            .opt_value_from_str("--lat-col")?
            .unwrap_or_else(|| "lat".to_string()),
        timestamp: pargs
            .opt_value_from_str("--ts-col")?
            .unwrap_or_else(|| "ts".to_string()),
        trajectory_id: pargs.opt_value_from_str("--id-col")?,
    };

    let csv_data = fs::read_to_string(&input)?;
    let trajectories = load_trajectories(&csv_data, &columns)?;
    info!(segments = trajectories.len(), "loaded trajectory segments");

    for trajectory in &trajectories {
        let config = CompressorConfig::new(block_size, epsilon)
            .with_evaluation_window(evaluation_window);
        let mut compressor = Compressor::new(config);
        for &point in &trajectory.points {
            compressor.add(point);
        }
        compressor.close();
        let bytes = compressor.compressed_bytes();

        let mut decompressor = Decompressor::new(bytes);
        let decoded = decompressor.all();

        let mut max_error: f64 = 0.0;
        for (original, reconstructed) in trajectory.points.iter().zip(decoded.iter()) {
            max_error = max_error
                .max((original.lon - reconstructed.lon).abs())
                .max((original.lat - reconstructed.lat).abs());
        }

        let stats = compressor.stats();
        println!(
            "segment {:<12} points={:<6} bytes={:<8} bits/point={:<8.3} max_error={:<12.3e} mode_switches={}",
            if trajectory.id.is_empty() { "-" } else { &trajectory.id },
            stats.total_points,
            bytes.len(),
            stats.bits_per_point(),
            max_error,
            stats.mode_switch_count,
        );
    }

    Ok(())
}
