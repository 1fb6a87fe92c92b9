//! Deterministic synthetic scoreboard data.
//!
//! The offline backend needs realistic-looking leaderboards that are stable
//! across runs and platforms, so every value is derived from a seeded
//! Mulberry32 stream. Same `(count, seed)` → byte-identical records.

use super::types::{AgentId, MetricsRecord, WindowCounts, WindowRevenue};

const FIRST_NAMES: [&str; 20] = [
    "Lia", "Olivia", "Jane", "Mason", "Ethan", "Noah", "Ava", "Emma", "Lucas", "Mia", "Sofia",
    "Amelia", "Henry", "Jack", "Leo", "Mila", "Elena", "Aria", "Chloe", "Nora",
];

const LAST_NAMES: [&str; 20] = [
    "Delough", "Agent", "Johnson", "Miller", "Brown", "Davis", "Wilson", "Taylor", "Anderson",
    "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia", "Martinez", "Robinson",
    "Clark", "Lewis",
];

/// Draws above this value get a zero-padded numeric name suffix (~7%).
const NAME_SUFFIX_THRESHOLD: f64 = 0.93;
/// Exponent applied to the skill draw; >2 keeps most agents low.
const SKILL_EXPONENT: f64 = 2.2;
const DAILY_COUNT_SCALE: f64 = 25.0;
const DAILY_COUNT_NOISE: f64 = 3.0;
const WEEKLY_EXPANSION: f64 = 5.0;
const MONTHLY_EXPANSION: f64 = 4.0;
const DAILY_EVENT_VALUE: f64 = 50.0;
const WEEKLY_EVENT_VALUE: f64 = 55.0;
const MONTHLY_EVENT_VALUE: f64 = 60.0;

// ============================================================================
// PRNG
// ============================================================================

/// Mulberry32: 32-bit state, one seed, advanced monotonically.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(1 | t);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
        f64::from(r ^ (r >> 14)) / 4_294_967_296.0
    }

    /// Multiplicative jitter in `[0.9, 1.2)`.
    fn jitter(&mut self) -> f64 {
        0.9 + self.next_f64() * 0.3
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let idx = (self.next_f64() * items.len() as f64).floor() as usize;
        items[idx.min(items.len() - 1)]
    }
}

fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

fn round_count(n: f64) -> u64 {
    n.round().max(0.0) as u64
}

// ============================================================================
// Generation
// ============================================================================

/// Produce `count` records from `seed`. Agent ids are `"1"..="count"`.
pub fn generate(count: usize, seed: u32) -> Vec<MetricsRecord> {
    let mut rng = Mulberry32::new(seed);
    (1..=count).map(|i| make_record(&mut rng, i)).collect()
}

fn make_record(rng: &mut Mulberry32, i: usize) -> MetricsRecord {
    let skill = rng.next_f64();
    let heavy = skill.powf(SKILL_EXPONENT);

    let daily = round_count(heavy * DAILY_COUNT_SCALE + rng.next_f64() * DAILY_COUNT_NOISE);
    let weekly = round_count(daily as f64 * (WEEKLY_EXPANSION * rng.jitter()));
    let monthly = round_count(weekly as f64 * (MONTHLY_EXPANSION * rng.jitter()));

    let revenue = WindowRevenue {
        daily: round2(daily as f64 * (DAILY_EVENT_VALUE * rng.jitter())),
        weekly: round2(weekly as f64 * (WEEKLY_EVENT_VALUE * rng.jitter())),
        monthly: round2(monthly as f64 * (MONTHLY_EVENT_VALUE * rng.jitter())),
    };

    MetricsRecord {
        agent_id: AgentId::Text(i.to_string()),
        agent_name: make_agent_name(rng, i),
        counts: WindowCounts {
            daily,
            weekly,
            monthly,
        },
        revenue,
        goal: None,
    }
}

fn make_agent_name(rng: &mut Mulberry32, i: usize) -> String {
    let first = rng.pick(&FIRST_NAMES);
    let last = rng.pick(&LAST_NAMES);
    if rng.next_f64() > NAME_SUFFIX_THRESHOLD {
        format!("{first} {last} {i:03}")
    } else {
        format!("{first} {last}")
    }
}
