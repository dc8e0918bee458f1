#![no_main]

use billsynth::core::{FillConfig, FillStatus, default_catalog, fill};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;

fuzz_target!(|input: (u64, u32, u16)| {
    let (seed, cents, attempts) = input;
    let target = Decimal::new(i64::from(cents), 2);
    let config = FillConfig {
        max_attempts: u32::from(attempts % 50),
        ..FillConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    if let Ok(result) = fill(target, &default_catalog(), &config, &mut rng) {
        assert!(!result.items.is_empty());
        assert!(result.items.iter().all(|i| i.quantity >= 1));
        if result.status == FillStatus::Accepted {
            assert!(config.within_tolerance(result.subtotal, target));
        }
    }
});
