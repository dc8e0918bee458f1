use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::BillError;

/// Resolution of the random weights (weights are `k / WEIGHT_SCALE`).
const WEIGHT_SCALE: i64 = 1_000_000;

/// Split `total` into `n` whole-number parts using random proportional weights.
///
/// Each part is `round(total * w_i / Σw)` with `w_i` uniform in (0, 1). Parts
/// are rounded independently, so the sum may drift from `total` by up to
/// `n / 2`; the drift is kept as is. When `total >= n`, a part that rounds to
/// zero is lifted to 1, which keeps the drift within `n`.
///
/// ```
/// use billsynth::core::split_total;
/// use rand::{SeedableRng, rngs::StdRng};
/// use rust_decimal_macros::dec;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let parts = split_total(dec!(150000), 10, &mut rng).unwrap();
/// assert_eq!(parts.len(), 10);
/// let sum: rust_decimal::Decimal = parts.iter().sum();
/// assert!((sum - dec!(150000)).abs() <= dec!(10));
/// ```
pub fn split_total<R: Rng + ?Sized>(
    total: Decimal,
    n: usize,
    rng: &mut R,
) -> Result<Vec<Decimal>, BillError> {
    if n == 0 {
        return Err(BillError::Configuration(
            "number of parts must be at least 1".into(),
        ));
    }
    if total <= Decimal::ZERO {
        return Err(BillError::Configuration(format!(
            "total must be positive, got {total}"
        )));
    }

    let weights: Vec<Decimal> = (0..n)
        .map(|_| Decimal::new(rng.gen_range(1..WEIGHT_SCALE), 6))
        .collect();
    let weight_sum: Decimal = weights.iter().sum();
    let lift_zeros = total >= Decimal::from(n);

    let parts = weights
        .iter()
        .map(|w| {
            let part = (total * *w / weight_sum)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
            if lift_zeros && part.is_zero() {
                Decimal::ONE
            } else {
                part
            }
        })
        .collect::<Vec<_>>();

    let drift = parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
        .and_then(|sum| sum.checked_sub(total));
    tracing::debug!(%total, n, ?drift, "split total");
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn returns_n_whole_parts() {
        let parts = split_total(dec!(150000), 10, &mut rng(3)).unwrap();
        assert_eq!(parts.len(), 10);
        for p in &parts {
            assert_eq!(p.fract(), Decimal::ZERO);
            assert!(*p >= Decimal::ONE);
        }
    }

    #[test]
    fn drift_bounded_by_part_count() {
        for seed in 0..50 {
            let parts = split_total(dec!(1000), 7, &mut rng(seed)).unwrap();
            let sum: Decimal = parts.iter().sum();
            assert!((sum - dec!(1000)).abs() <= dec!(7), "seed {seed}: {sum}");
        }
    }

    #[test]
    fn single_part_is_whole_total() {
        let parts = split_total(dec!(999), 1, &mut rng(0)).unwrap();
        assert_eq!(parts, vec![dec!(999)]);
    }

    #[test]
    fn total_equal_to_n_gives_positive_parts() {
        for seed in 0..20 {
            let parts = split_total(dec!(5), 5, &mut rng(seed)).unwrap();
            assert!(parts.iter().all(|p| *p >= Decimal::ONE));
        }
    }

    #[test]
    fn same_seed_same_split() {
        let a = split_total(dec!(50000), 8, &mut rng(42)).unwrap();
        let b = split_total(dec!(50000), 8, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_parts() {
        assert!(matches!(
            split_total(dec!(100), 0, &mut rng(0)),
            Err(BillError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_non_positive_total() {
        assert!(split_total(dec!(0), 3, &mut rng(0)).is_err());
        assert!(split_total(dec!(-10), 3, &mut rng(0)).is_err());
    }
}
