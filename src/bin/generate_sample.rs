use anyhow::{Context, Result};
use serde::Serialize;

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

#[derive(Serialize)]
struct MetricRow {
    time: String,
    cpu: f64,
    mem: f64,
    disk_io: f64,
    net_rx: f64,
}

/// Daily load curve in [0, 1]: quiet at night, peaking mid-afternoon.
fn load_factor(minute_of_day: u32) -> f64 {
    let hours = minute_of_day as f64 / 60.0;
    0.5 - 0.5 * (2.0 * std::f64::consts::PI * (hours - 3.0) / 24.0).cos()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // One sample per minute over a day.
    let minutes = 24 * 60;
    let output_path = "sample_metrics.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut mem = 35.0;
    for minute in 0..minutes {
        let load = load_factor(minute);

        // Occasional CPU spikes on top of the daily curve.
        let spike = if rng.next_f64() < 0.02 { rng.gauss(35.0, 10.0) } else { 0.0 };
        let cpu = (15.0 + 55.0 * load + spike + rng.gauss(0.0, 4.0)).clamp(0.0, 100.0);

        // Slow leak, reclaimed at 04:00.
        mem = if minute == 4 * 60 { 35.0 } else { mem + 0.02 + rng.gauss(0.0, 0.1) };
        let mem_pct = (mem + 10.0 * load).clamp(0.0, 100.0);

        let disk_io = (rng.gauss(120.0, 30.0) * (0.3 + load)).max(0.0);
        let net_rx = (800.0 * load + rng.gauss(50.0, 20.0)).max(0.0);

        writer
            .serialize(MetricRow {
                time: format!("2024-01-01T{:02}:{:02}:00", minute / 60, minute % 60),
                cpu: round1(cpu),
                mem: round1(mem_pct),
                disk_io: round1(disk_io),
                net_rx: round1(net_rx),
            })
            .context("writing sample row")?;
    }
    writer.flush().context("flushing sample CSV")?;

    println!("Wrote {minutes} samples to {output_path}");
    Ok(())
}
