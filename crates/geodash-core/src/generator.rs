//! # Synthetic Company Fixture
//!
//! Produces the startup dataset: for every sector, a random batch of 30 to
//! 59 companies named `"{sector} Corp {i}"`, each assigned a random country
//! from the taxonomy and uniform random metrics. A fixed seed makes the
//! table reproducible across restarts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::facts::FactRecord;
use crate::taxonomy::Taxonomy;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

const COMPANIES_PER_SECTOR: std::ops::Range<usize> = 30..60;
const STOCK_PRICE: std::ops::Range<f64> = 50.0..500.0;
const MARKET_CAP: std::ops::Range<f64> = 10.0..100.0;
const REVENUE: std::ops::Range<f64> = 5.0..50.0;
const EMPLOYEES: std::ops::Range<u32> = 1000..50000;

/// Generate the fixture table for `taxonomy`, sector batch by sector batch.
pub fn generate(taxonomy: &Taxonomy, seed: u64) -> Vec<FactRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let countries: Vec<&str> = taxonomy.countries().collect();
    let mut records = Vec::new();

    for sector in taxonomy.sectors() {
        let batch = rng.gen_range(COMPANIES_PER_SECTOR);
        for i in 1..=batch {
            let Some(country) = countries.choose(&mut rng) else {
                continue;
            };
            records.push(FactRecord {
                company: format!("{sector} Corp {i}"),
                country: (*country).to_string(),
                sector: sector.clone(),
                stock_price: rng.gen_range(STOCK_PRICE),
                market_cap: rng.gen_range(MARKET_CAP),
                revenue: rng.gen_range(REVENUE),
                employees: rng.gen_range(EMPLOYEES),
            });
        }
    }

    records
}
