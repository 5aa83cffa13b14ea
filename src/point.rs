use std::fmt;

/// A single GPS sample: longitude and latitude in degrees, and an unsigned
/// tick the algorithm only ever differences (the CLI treats it as Unix
/// seconds, but the core never interprets its absolute value).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub lon: f64,
    pub lat: f64,
    pub ts: u64,
}

impl Sample {
    pub fn new(lon: f64, lat: f64, ts: u64) -> Self {
        Sample { lon, lat, ts }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.6}, {:.6} @ {})", self.lon, self.lat, self.ts)
    }
}
