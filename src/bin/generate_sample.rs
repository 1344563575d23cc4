use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Sensor depths in metres below the surface.
const DEPTHS: [f64; 7] = [0.60, 0.90, 1.20, 1.50, 1.80, 2.10, 2.40];

/// Annual ground temperature at `depth`: a surface wave that damps and lags
/// with depth around a mean just below freezing.
fn ground_temperature(day_of_year: f64, depth: f64, rng: &mut SimpleRng) -> f64 {
    let damping = (-depth / 1.4).exp();
    let lag_days = depth * 22.0;
    let phase = 2.0 * std::f64::consts::PI * (day_of_year - 200.0 - lag_days) / 365.25;
    -1.2 + 14.0 * damping * phase.cos() + rng.gauss(0.0, 0.15)
}

/// Time cell as the logger writes it: midnight hours lose their leading zero.
fn logger_time(ts: NaiveDateTime) -> String {
    if ts.hour() < 10 {
        format!("{}:{:02}:{:02}", ts.hour(), ts.minute(), ts.second())
    } else {
        ts.format("%H:%M:%S").to_string()
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Sample_Data_Set.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    // Preamble the viewer skips with `skip_rows = 3`.
    writer.write_record(["Site", "Test Site #1"])?;
    writer.write_record(["Logger", "Thermistor string TS-7"])?;
    writer.write_record(["Latitude", "44.2250", "Longitude", "-76.4951"])?;

    let mut header = vec!["Date".to_string(), "Time".to_string()];
    header.extend(
        DEPTHS
            .iter()
            .enumerate()
            .map(|(i, d)| format!("Bead #{}(-{d:.2}m)", i + 1)),
    );
    writer.write_record(&header)?;

    let start = NaiveDate::from_ymd_opt(1999, 9, 25)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("start date")?;
    let end = NaiveDate::from_ymd_opt(2010, 8, 29)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("end date")?;

    let mut ts = start;
    let mut rows = 0usize;
    while ts < end {
        let day_of_year = ts.ordinal() as f64;
        let mut readings: Vec<f64> = DEPTHS
            .iter()
            .map(|&d| ground_temperature(day_of_year, d, &mut rng))
            .collect();

        // Occasional sensor glitches for the outlier filter to catch.
        if rng.next_f64() < 0.01 {
            let channel = (rng.next_u64() % DEPTHS.len() as u64) as usize;
            readings[channel] = if rng.next_f64() < 0.5 { -99.9 } else { 85.0 };
        }

        let mut record = vec![ts.format("%m/%d/%Y").to_string(), logger_time(ts)];
        record.extend(readings.iter().map(|v| format!("{v:.2}")));
        writer.write_record(&record)?;

        // Alternate midnight and noon readings roughly once a week.
        ts += if ts.hour() == 0 {
            Duration::hours(7 * 24 + 12)
        } else {
            Duration::hours(6 * 24 + 12)
        };
        rows += 1;
    }
    writer.flush()?;

    println!("Wrote {rows} rows ({} channels) to {output_path}", DEPTHS.len());
    Ok(())
}
