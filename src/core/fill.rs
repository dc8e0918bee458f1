use rand::Rng;
use rand::seq::index;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::{BillError, into_validation_error};
use super::types::*;
use super::validation::validate_catalog;

/// Resolution of uniform decimal draws.
const DRAW_SCALE: i64 = 1_000_000;

/// Tuning for [`fill`].
///
/// Defaults: subsets of 5–10 items, ±30% quantity jitter, 5% tolerance, a 0.95
/// damping factor and 300 attempts. Narrower subsets (4–8), heavier damping
/// (0.9) or a larger budget (1000) are all reasonable variations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Smallest number of distinct items sampled per attempt.
    pub min_items: usize,
    /// Largest number of distinct items sampled per attempt.
    pub max_items: usize,
    /// Lower bound of the multiplicative quantity jitter.
    pub jitter_min: Decimal,
    /// Upper bound of the multiplicative quantity jitter.
    pub jitter_max: Decimal,
    /// Accepted relative deviation between subtotal and target.
    pub tolerance: Decimal,
    /// Candidates whose subtotal is below `rescale_below * target` are scaled up.
    pub rescale_below: Decimal,
    /// Applied on top of `target / subtotal` when scaling up, to avoid overshoot.
    pub damping: Decimal,
    /// Retry budget.
    pub max_attempts: u32,
    /// Whether GST amounts count towards the subtotal.
    pub apply_gst: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            min_items: 5,
            max_items: 10,
            jitter_min: dec!(0.7),
            jitter_max: dec!(1.3),
            tolerance: dec!(0.05),
            rescale_below: dec!(0.9),
            damping: dec!(0.95),
            max_attempts: 300,
            apply_gst: true,
        }
    }
}

impl FillConfig {
    /// Check the parameters for internal consistency.
    pub fn validate(&self) -> Result<(), BillError> {
        let fail =
            |msg: String| -> Result<(), BillError> { Err(BillError::Configuration(msg)) };
        if self.min_items == 0 {
            return fail("min_items must be at least 1".into());
        }
        if self.min_items > self.max_items {
            return fail(format!(
                "min_items ({}) exceeds max_items ({})",
                self.min_items, self.max_items
            ));
        }
        if self.jitter_min <= Decimal::ZERO || self.jitter_min > self.jitter_max {
            return fail(format!(
                "jitter range [{}, {}] must be positive and ordered",
                self.jitter_min, self.jitter_max
            ));
        }
        if self.tolerance <= Decimal::ZERO || self.tolerance >= Decimal::ONE {
            return fail(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            ));
        }
        if self.rescale_below <= Decimal::ZERO {
            return fail("rescale_below must be positive".into());
        }
        if self.damping <= Decimal::ZERO {
            return fail("damping must be positive".into());
        }
        if self.max_attempts == 0 {
            return fail("max_attempts must be at least 1".into());
        }
        Ok(())
    }

    /// `|subtotal - target| <= tolerance * target`.
    pub fn within_tolerance(&self, subtotal: Decimal, target: Decimal) -> bool {
        (subtotal - target).abs() <= self.tolerance * target
    }
}

/// Result of filling one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Line items of the chosen candidate, never empty.
    pub items: Vec<LineItem>,
    /// Subtotal of `items` (including GST when modeled).
    pub subtotal: Decimal,
    /// Attempts consumed, including the accepted one.
    pub attempts: u32,
    /// Whether `subtotal` is within tolerance.
    pub status: FillStatus,
}

/// Fill one invoice with random catalog items so its subtotal approaches `target`.
///
/// Each attempt samples a fresh subset and fresh quantities; the first
/// attempt within tolerance wins. When the retry budget runs out, the attempt
/// closest to `target` is returned with [`FillStatus::ToleranceNotMet`] instead
/// of an error.
///
/// Errors only on static misconfiguration: non-positive target, empty or
/// invalid catalog, an invalid [`FillConfig`], or a target too large to be
/// expressed in whole units of the catalog.
pub fn fill<R: Rng + ?Sized>(
    target: Decimal,
    catalog: &[CatalogEntry],
    config: &FillConfig,
    rng: &mut R,
) -> Result<Fill, BillError> {
    if target <= Decimal::ZERO {
        return Err(BillError::Configuration(format!(
            "target must be positive, got {target}"
        )));
    }
    if catalog.is_empty() {
        return Err(BillError::Configuration("catalog is empty".into()));
    }
    let errors = validate_catalog(catalog);
    if !errors.is_empty() {
        return Err(into_validation_error(&errors));
    }
    config.validate()?;
    check_capacity(target, catalog, config)?;
    Ok(fill_validated(target, catalog, config, rng))
}

/// Reject targets whose quantities or subtotals could overflow during an
/// attempt.
///
/// Quantities never exceed `target / cheapest * max(jitter_max, damping, 1)`,
/// which must fit in a `u64`. Each line is bounded by `target * stretch` or a
/// single unit of the dearest item; the subtotal bound adds GST at up to 100%
/// plus headroom for the `line_total * rate` product.
pub(crate) fn check_capacity(
    target: Decimal,
    catalog: &[CatalogEntry],
    config: &FillConfig,
) -> Result<(), BillError> {
    let too_large = || {
        BillError::Configuration(format!(
            "target {target} cannot be filled in whole units of this catalog"
        ))
    };
    let prices = catalog.iter().map(|e| e.unit_price);
    let cheapest = prices.clone().min().ok_or_else(too_large)?;
    let dearest = prices.max().ok_or_else(too_large)?;
    let stretch = config.jitter_max.max(config.damping).max(Decimal::ONE);

    let units = target
        .checked_div(cheapest)
        .and_then(|u| u.checked_mul(stretch))
        .ok_or_else(too_large)?;
    if units > Decimal::from(u64::MAX) {
        return Err(too_large());
    }

    let slots = Decimal::from(config.max_items.min(catalog.len()));
    target
        .checked_mul(stretch)
        .and_then(|line| line.checked_add(dearest))
        .and_then(|line| line.checked_mul(slots))
        .and_then(|sum| sum.checked_mul(dec!(200)))
        .map(|_| ())
        .ok_or_else(too_large)
}

/// [`fill`] without input checks; callers guarantee a positive target, a
/// non-empty catalog with positive prices, a valid config and a target that
/// passed [`check_capacity`].
pub(crate) fn fill_validated<R: Rng + ?Sized>(
    target: Decimal,
    catalog: &[CatalogEntry],
    config: &FillConfig,
    rng: &mut R,
) -> Fill {
    let mut best: Option<Vec<LineItem>> = None;
    let mut best_gap = Decimal::MAX;

    for attempt_no in 1..=config.max_attempts {
        let Some(items) = attempt(target, catalog, config, rng) else {
            tracing::debug!(%target, attempt = attempt_no, "attempt overflowed, skipped");
            continue;
        };
        let subtotal = subtotal_of(&items);

        if config.within_tolerance(subtotal, target) {
            tracing::debug!(%target, %subtotal, attempts = attempt_no, "fill accepted");
            return Fill {
                items,
                subtotal,
                attempts: attempt_no,
                status: FillStatus::Accepted,
            };
        }

        let gap = (subtotal - target).abs();
        if best.is_none() || gap < best_gap {
            best_gap = gap;
            best = Some(items);
        }
    }

    // check_capacity keeps every attempt in range, so a candidate was recorded
    let items = best.unwrap_or_default();
    let subtotal = subtotal_of(&items);
    tracing::warn!(
        %target,
        %subtotal,
        attempts = config.max_attempts,
        "retry budget exhausted, keeping closest attempt"
    );
    Fill {
        items,
        subtotal,
        attempts: config.max_attempts,
        status: FillStatus::ToleranceNotMet,
    }
}

/// Build one candidate: sample, allocate, and scale up if far below target.
/// `None` when the arithmetic leaves the `Decimal` range.
fn attempt<R: Rng + ?Sized>(
    target: Decimal,
    catalog: &[CatalogEntry],
    config: &FillConfig,
    rng: &mut R,
) -> Option<Vec<LineItem>> {
    let size = rng
        .gen_range(config.min_items..=config.max_items)
        .min(catalog.len());
    let per_item = target.checked_div(Decimal::from(size))?;

    let mut picks = index::sample(rng, catalog.len(), size)
        .into_iter()
        .map(|i| {
            let entry = &catalog[i];
            let jitter = uniform(rng, config.jitter_min, config.jitter_max);
            let raw = per_item.checked_div(entry.unit_price)?.checked_mul(jitter)?;
            Some((entry, to_quantity(raw)))
        })
        .collect::<Option<Vec<(&CatalogEntry, u64)>>>()?;

    let mut items = price_all(&picks, config.apply_gst)?;
    let subtotal = subtotal_of(&items);

    let rescale_floor = config.rescale_below.checked_mul(target)?;
    if !config.within_tolerance(subtotal, target) && subtotal < rescale_floor {
        let factor = target.checked_div(subtotal)?.checked_mul(config.damping)?;
        for (_, qty) in &mut picks {
            *qty = to_quantity(Decimal::from(*qty).checked_mul(factor)?);
        }
        items = price_all(&picks, config.apply_gst)?;
    }

    Some(items)
}

fn price_all(picks: &[(&CatalogEntry, u64)], apply_gst: bool) -> Option<Vec<LineItem>> {
    picks
        .iter()
        .map(|(entry, qty)| LineItem::checked_priced(entry, *qty, apply_gst))
        .collect()
}

/// Floor to a whole quantity, at least 1.
fn to_quantity(raw: Decimal) -> u64 {
    if raw < Decimal::ONE {
        return 1;
    }
    raw.floor().to_u64().unwrap_or(u64::MAX)
}

/// Uniform draw in `[low, high]` at 6 dp resolution.
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: Decimal, high: Decimal) -> Decimal {
    let step = Decimal::new(rng.gen_range(0..=DRAW_SCALE), 6);
    low + (high - low) * step
}
