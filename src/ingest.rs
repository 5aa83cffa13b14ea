//! `ingest` loads CSV trajectory files and segments them by an optional
//! trajectory-id column (§4.6). This is ambient CLI-support code, outside the
//! invariant-bearing core: it never feeds back into the codec's own state.

use crate::errors::{parse_error, precondition_error};
use crate::point::Sample;
use crate::Result;

/// Column layout of the source CSV. Defaults match the reference fixture's
/// `lon,lat,ts` header.
#[derive(Clone, Debug)]
pub struct CsvColumns {
    pub longitude: String,
    pub latitude: String,
    pub timestamp: String,
    /// When set, rows are grouped into independent segments by this column's value.
    pub trajectory_id: Option<String>,
}

impl Default for CsvColumns {
    fn default() -> Self {
        CsvColumns {
            longitude: "lon".to_string(),
            latitude: "lat".to_string(),
            timestamp: "ts".to_string(),
            trajectory_id: None,
        }
    }
}

/// One trajectory's points, grouped by `trajectory_id` (or a single implicit
/// segment if no id column is configured).
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub id: String,
    pub points: Vec<Sample>,
}

/// Parses a CSV document already read into memory into one or more
/// trajectory segments, preserving row order within each segment.
pub fn load_trajectories(csv_data: &str, columns: &CsvColumns) -> Result<Vec<Trajectory>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader.headers()?.clone();
    let lon_idx = column_index(&headers, &columns.longitude)?;
    let lat_idx = column_index(&headers, &columns.latitude)?;
    let ts_idx = column_index(&headers, &columns.timestamp)?;
    let id_idx = match &columns.trajectory_id {
        Some(name) => Some(column_index(&headers, name)?),
        None => None,
    };

    let mut segments: Vec<Trajectory> = Vec::new();

    for result in reader.records() {
        let record = result?;
        let lon: f64 = match record.get(lon_idx).and_then(|v| v.trim().parse().ok()) {
            Some(value) => value,
            None => return parse_error("missing or unparsable longitude field"),
        };
        let lat: f64 = match record.get(lat_idx).and_then(|v| v.trim().parse().ok()) {
            Some(value) => value,
            None => return parse_error("missing or unparsable latitude field"),
        };
        if !lon.is_finite() || !lat.is_finite() {
            return precondition_error("non-finite coordinate in CSV row");
        }
        let ts_field = match record.get(ts_idx) {
            Some(field) => field,
            None => return parse_error("missing timestamp field"),
        };
        let ts = parse_timestamp(ts_field)?;

        let segment_id = match id_idx {
            Some(idx) => record.get(idx).unwrap_or("").to_string(),
            None => String::new(),
        };

        match segments.iter_mut().find(|segment| segment.id == segment_id) {
            Some(segment) => segment.points.push(Sample::new(lon, lat, ts)),
            None => segments.push(Trajectory {
                id: segment_id,
                points: vec![Sample::new(lon, lat, ts)],
            }),
        }
    }

    Ok(segments)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    match headers.iter().position(|field| field == name) {
        Some(idx) => Ok(idx),
        None => parse_error("missing expected CSV column"),
    }
}

/// Parses either a raw epoch integer or a `"YYYY-MM-DD HH:MM:SS"` timestamp,
/// matching the reference ingestion tool's auto-detection.
fn parse_timestamp(field: &str) -> Result<u64> {
    let field = field.trim();
    if let Ok(raw) = field.parse::<u64>() {
        return Ok(raw);
    }
    match parse_date_time(field) {
        Some(ts) => Ok(ts),
        None => parse_error("unrecognized timestamp format"),
    }
}

/// Parses `"YYYY-MM-DD HH:MM:SS"` into a Unix timestamp (UTC, no leap-second
/// or timezone handling, matching `std::get_time`/`mktime` in the reference).
fn parse_date_time(field: &str) -> Option<u64> {
    let (date, time) = field.split_once(' ')?;
    let mut date_parts = date.split('-');
    let year: i64 = date_parts.next()?.parse().ok()?;
    let month: i64 = date_parts.next()?.parse().ok()?;
    let day: i64 = date_parts.next()?.parse().ok()?;
    if date_parts.next().is_some() {
        return None;
    }

    let mut time_parts = time.split(':');
    let hour: i64 = time_parts.next()?.parse().ok()?;
    let minute: i64 = time_parts.next()?.parse().ok()?;
    let second: i64 = time_parts.next()?.parse().ok()?;
    if time_parts.next().is_some() {
        return None;
    }

    let days = days_since_epoch(year, month, day)?;
    let seconds = days * 86_400 + hour * 3_600 + minute * 60 + second;
    if seconds < 0 {
        None
    } else {
        Some(seconds as u64)
    }
}

/// Days between 1970-01-01 and `year-month-day`, via the civil-to-days
/// algorithm (proleptic Gregorian calendar).
fn days_since_epoch(year: i64, month: i64, day: i64) -> Option<i64> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Some(era * 146_097 + doe - 719_468)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_single_implicit_segment_with_raw_epoch_timestamps() {
        let csv_data = "lon,lat,ts\n116.3,39.9,1000000000\n116.30001,39.90001,1000000010\n";
        let segments = load_trajectories(csv_data, &CsvColumns::default()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points.len(), 2);
        assert_eq!(segments[0].points[0].ts, 1_000_000_000);
    }

    #[test]
    fn loads_date_time_timestamps() {
        let csv_data = "lon,lat,ts\n0.0,0.0,1970-01-01 00:00:00\n0.0,0.0,1970-01-01 00:00:10\n";
        let segments = load_trajectories(csv_data, &CsvColumns::default()).unwrap();
        assert_eq!(segments[0].points[0].ts, 0);
        assert_eq!(segments[0].points[1].ts, 10);
    }

    #[test]
    fn groups_rows_by_trajectory_id() {
        let csv_data = "lon,lat,ts,traj\n0.0,0.0,0,a\n1.0,1.0,1,b\n2.0,2.0,2,a\n";
        let columns = CsvColumns {
            trajectory_id: Some("traj".to_string()),
            ..CsvColumns::default()
        };
        let segments = load_trajectories(csv_data, &columns).unwrap();
        assert_eq!(segments.len(), 2);
        let a = segments.iter().find(|s| s.id == "a").unwrap();
        assert_eq!(a.points.len(), 2);
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let csv_data = "lon,lat,ts\nnan,0.0,0\n";
        let result = load_trajectories(csv_data, &CsvColumns::default());
        assert!(result.is_err());
    }
}
