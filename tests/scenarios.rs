use cost_trajectory::compressor::Compressor;
use cost_trajectory::config::CompressorConfig;
use cost_trajectory::decompressor::Decompressor;
use cost_trajectory::ingest::{load_trajectories, CsvColumns};
use cost_trajectory::point::Sample;

fn round_trip(config: CompressorConfig, points: &[Sample]) -> Vec<Sample> {
    let mut compressor = Compressor::new(config);
    for &point in points {
        compressor.add(point);
    }
    compressor.close();
    let bytes = compressor.compressed_bytes().to_vec();
    let mut decompressor = Decompressor::new(&bytes);
    decompressor.all()
}

#[test]
fn single_point_stream_recovers_exact_anchor() {
    let config = CompressorConfig::new(1024, 1e-5);
    let input = vec![Sample::new(116.300000, 39.900000, 1_000_000_000)];
    let decoded = round_trip(config, &input);
    assert_eq!(decoded, input);
}

#[test]
fn two_point_colinear_stream_picks_ldr_and_bounds_error() {
    let config = CompressorConfig::new(1024, 1e-5);
    let input = vec![Sample::new(0.0, 0.0, 0), Sample::new(1e-4, 0.0, 10)];
    let decoded = round_trip(config, &input);
    assert_eq!(decoded.len(), 2);
    assert!((decoded[1].lon - 1e-4).abs() <= config.epsilon_effective());
    assert_eq!(decoded[1].ts, 10);
}

#[test]
fn static_trajectory_flips_to_ldr_only_and_stays_there() {
    let config = CompressorConfig::new(1024, 1e-5).with_evaluation_window(32);
    let input: Vec<Sample> = (0..200u64).map(|i| Sample::new(5.0, 5.0, i)).collect();

    let mut compressor = Compressor::new(config);
    for &point in &input {
        compressor.add(point);
    }
    compressor.close();
    let stats = compressor.stats().clone();
    assert!(stats.mode_switch_count >= 1, "static trajectory should trigger a mode switch");
    assert!(stats.ldr_only_mode_points > 0);

    let bytes = compressor.compressed_bytes().to_vec();
    let mut decompressor = Decompressor::new(&bytes);
    let decoded = decompressor.all();
    assert_eq!(decoded.len(), input.len());
    for point in &decoded {
        assert!((point.lon - 5.0).abs() <= config.epsilon_effective());
        assert!((point.lat - 5.0).abs() <= config.epsilon_effective());
    }
}

#[test]
fn forced_mode_switches_stay_within_error_bound_on_alternating_segments() {
    let config = CompressorConfig::new(1024, 1e-4).with_evaluation_window(16);
    let mut input = Vec::new();
    let mut ts = 0u64;
    for block in 0..10 {
        for i in 0..16u64 {
            ts += 1;
            let lon = if block % 2 == 0 {
                0.0
            } else {
                ((i as f64) * 1.7).sin() * 0.02
            };
            let lat = if block % 2 == 0 {
                0.0
            } else {
                ((i as f64) * 2.3).cos() * 0.02
            };
            input.push(Sample::new(lon, lat, ts));
        }
    }

    let decoded = round_trip(config, &input);
    assert_eq!(decoded.len(), input.len());
    let eps = config.epsilon_effective();
    for (original, reconstructed) in input.iter().zip(decoded.iter()) {
        assert!((original.lon - reconstructed.lon).abs() <= eps);
        assert!((original.lat - reconstructed.lat).abs() <= eps);
        assert_eq!(original.ts, reconstructed.ts);
    }
}

#[test]
fn huffman_reassignment_follows_a_shift_to_zero_predictor_dominance() {
    let config = CompressorConfig::new(1024, 1e-5);
    let mut input = Vec::new();
    // Early samples favor LDR: smooth constant-velocity motion.
    for i in 0..50u64 {
        input.push(Sample::new(i as f64 * 1e-3, 0.0, i));
    }
    // Later samples favor ZP: the trajectory stops dead.
    let last = input.last().copied().unwrap();
    for i in 0..1200u64 {
        input.push(Sample::new(last.lon, last.lat, last.ts + 1 + i));
    }

    let mut compressor = Compressor::new(config);
    for &point in &input {
        compressor.add(point);
    }
    compressor.close();
    assert!(compressor.stats().zp_count > 0);

    let bytes = compressor.compressed_bytes().to_vec();
    let mut decompressor = Decompressor::new(&bytes);
    let decoded = decompressor.all();
    assert_eq!(decoded.len(), input.len());
}

#[test]
fn time_windowed_evaluation_switches_mode_and_round_trips() {
    let config = CompressorConfig::new(1024, 1e-5).with_time_window(20);
    let input: Vec<Sample> = (0..300u64).map(|i| Sample::new(3.0, 3.0, i)).collect();

    let mut compressor = Compressor::new(config);
    for &point in &input {
        compressor.add(point);
    }
    compressor.close();
    let stats = compressor.stats().clone();
    assert!(stats.mode_switch_count >= 1, "static trajectory should trigger a mode switch");
    assert!(stats.ldr_only_mode_points > 0);

    let bytes = compressor.compressed_bytes().to_vec();
    let mut decompressor = Decompressor::new(&bytes);
    let decoded = decompressor.all();
    assert_eq!(decoded.len(), input.len());
    for (original, reconstructed) in input.iter().zip(decoded.iter()) {
        assert!((original.lon - reconstructed.lon).abs() <= config.epsilon_effective());
        assert!((original.lat - reconstructed.lat).abs() <= config.epsilon_effective());
        assert_eq!(original.ts, reconstructed.ts);
    }
}

#[test]
fn csv_ingestion_round_trips_multiple_segments() {
    let csv_data = "\
lon,lat,ts,traj
116.300000,39.900000,1000000000,alpha
116.300010,39.900010,1000000010,alpha
0.000000,0.000000,1970-01-01 00:00:00,beta
0.000100,0.000000,1970-01-01 00:00:10,beta
";
    let columns = CsvColumns {
        trajectory_id: Some("traj".to_string()),
        ..CsvColumns::default()
    };
    let trajectories = load_trajectories(csv_data, &columns).unwrap();
    assert_eq!(trajectories.len(), 2);

    for trajectory in &trajectories {
        let config = CompressorConfig::new(1024, 1e-5);
        let decoded = round_trip(config, &trajectory.points);
        assert_eq!(decoded.len(), trajectory.points.len());
        for (original, reconstructed) in trajectory.points.iter().zip(decoded.iter()) {
            assert!((original.lon - reconstructed.lon).abs() <= config.epsilon_effective());
            assert!((original.lat - reconstructed.lat).abs() <= config.epsilon_effective());
            assert_eq!(original.ts, reconstructed.ts);
        }
    }
}
