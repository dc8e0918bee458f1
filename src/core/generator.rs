use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::catalog::default_customers;
use super::error::{BillError, into_validation_error};
use super::fill::{Fill, FillConfig, check_capacity, fill, fill_validated};
use super::numbering::{BillNumberSequence, NumberingConfig};
use super::split::split_total;
use super::types::*;
use super::validation::validate_catalog;

/// Everything needed to generate one batch of invoices.
///
/// Usually assembled with [`BatchRequestBuilder`](super::BatchRequestBuilder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Grand total the batch should add up to.
    pub total_sales: Decimal,
    /// Smallest number of invoices.
    pub min_invoices: usize,
    /// Largest number of invoices.
    pub max_invoices: usize,
    /// Items available for sampling.
    pub catalog: Vec<CatalogEntry>,
    /// Customer names; the built-in walk-in list is used when empty.
    pub customers: Vec<String>,
    /// First possible bill date.
    pub start_date: NaiveDate,
    /// Last possible bill date.
    pub end_date: NaiveDate,
    /// Bill number format.
    pub numbering: NumberingConfig,
    /// Per-invoice fill tuning.
    pub fill: FillConfig,
}

impl BatchRequest {
    /// Reject static misconfiguration before any random draw.
    pub fn validate(&self) -> Result<(), BillError> {
        if self.total_sales <= Decimal::ZERO {
            return Err(BillError::Configuration(format!(
                "total sales must be positive, got {}",
                self.total_sales
            )));
        }
        if self.min_invoices == 0 || self.min_invoices > self.max_invoices {
            return Err(BillError::Configuration(format!(
                "invoice count range [{}, {}] must be non-empty and start at 1 or more",
                self.min_invoices, self.max_invoices
            )));
        }
        if self.total_sales < Decimal::from(self.min_invoices) {
            return Err(BillError::Configuration(format!(
                "total sales {} cannot cover {} invoices",
                self.total_sales, self.min_invoices
            )));
        }
        if self.catalog.is_empty() {
            return Err(BillError::Configuration("catalog is empty".into()));
        }
        let errors = validate_catalog(&self.catalog);
        if !errors.is_empty() {
            return Err(into_validation_error(&errors));
        }
        if self.start_date > self.end_date {
            return Err(BillError::Configuration(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.numbering.first == 0 {
            return Err(BillError::Configuration(
                "bill numbering must start at 1 or more".into(),
            ));
        }
        self.fill.validate()
    }
}

/// A generated batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Invoices ordered by date and bill number.
    pub invoices: Vec<Invoice>,
    /// The requested grand total.
    pub total_sales: Decimal,
}

impl Batch {
    /// Sum of all invoice subtotals.
    pub fn grand_total(&self) -> Decimal {
        self.invoices.iter().map(Invoice::subtotal).sum()
    }

    /// `grand_total - total_sales`.
    pub fn drift(&self) -> Decimal {
        self.grand_total() - self.total_sales
    }

    /// Invoices whose fill ran out of attempts. Renderers should show a
    /// notice for these but still display them.
    pub fn unmet(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter().filter(|i| !i.status.is_accepted())
    }

    /// One human-readable notice per [`unmet`](Self::unmet) invoice.
    pub fn unmet_notices(&self) -> Vec<String> {
        self.unmet()
            .map(|inv| {
                format!(
                    "bill {} is approximate ({} for target {})",
                    inv.id,
                    inv.subtotal(),
                    inv.target
                )
            })
            .collect()
    }
}

/// Batch invoice generator owning an explicit random source.
///
/// ```
/// use billsynth::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut generator = InvoiceGenerator::new(Some(1));
/// let targets = generator.split(dec!(10000), 4).unwrap();
/// let fill = generator
///     .fill(targets[0], &default_catalog(), &FillConfig::default())
///     .unwrap();
/// assert!(!fill.items.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceGenerator<R = StdRng> {
    rng: R,
}

impl InvoiceGenerator<StdRng> {
    /// Seeded generator for reproducible batches, or OS-seeded when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl<R: Rng> InvoiceGenerator<R> {
    /// Use a caller-supplied random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// See [`split_total`].
    pub fn split(&mut self, total: Decimal, n: usize) -> Result<Vec<Decimal>, BillError> {
        split_total(total, n, &mut self.rng)
    }

    /// See [`fill`].
    pub fn fill(
        &mut self,
        target: Decimal,
        catalog: &[CatalogEntry],
        config: &FillConfig,
    ) -> Result<Fill, BillError> {
        fill(target, catalog, config, &mut self.rng)
    }

    /// Generate a full batch: pick the invoice count, split the total, fill
    /// every invoice, then assign dates, customers and bill numbers.
    ///
    /// The count is drawn from `[min_invoices, max_invoices]`, capped at the
    /// whole part of `total_sales` so every invoice target is at least 1.
    pub fn generate(&mut self, request: &BatchRequest) -> Result<Batch, BillError> {
        request.validate()?;

        let affordable = request
            .total_sales
            .floor()
            .to_usize()
            .unwrap_or(usize::MAX);
        let count = self
            .rng
            .gen_range(request.min_invoices..=request.max_invoices.min(affordable));
        let targets = split_total(request.total_sales, count, &mut self.rng)?;
        let dates = self.draw_dates(request.start_date, request.end_date, count)?;

        let fallback;
        let customers = if request.customers.is_empty() {
            fallback = default_customers();
            &fallback
        } else {
            &request.customers
        };

        let mut numbers = BillNumberSequence::from_config(&request.numbering)?;
        let mut invoices = Vec::with_capacity(count);

        for (target, date) in targets.into_iter().zip(dates) {
            check_capacity(target, &request.catalog, &request.fill)?;
            let Fill { items, status, .. } =
                fill_validated(target, &request.catalog, &request.fill, &mut self.rng);
            let customer = customers[self.rng.gen_range(0..customers.len())].clone();
            let id = numbers.next_number()?;

            if !status.is_accepted() {
                tracing::warn!(bill = %id, %target, "invoice outside tolerance");
            }

            invoices.push(Invoice {
                id,
                customer,
                date,
                target,
                items,
                status,
            });
        }

        let batch = Batch {
            invoices,
            total_sales: request.total_sales,
        };
        tracing::info!(
            invoices = count,
            total_sales = %request.total_sales,
            grand_total = %batch.grand_total(),
            unmet = batch.unmet().count(),
            "batch generated"
        );
        Ok(batch)
    }

    /// `count` dates uniform in `[start, end]`, ascending.
    fn draw_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>, BillError> {
        let span = u64::try_from((end - start).num_days()).map_err(|_| {
            BillError::Configuration(format!("start date {start} is after end date {end}"))
        })?;
        let mut dates = (0..count)
            .map(|_| {
                let offset = self.rng.gen_range(0..=span);
                start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                    BillError::Configuration(format!("date {start} + {offset} days overflows"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        dates.sort();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_catalog;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> BatchRequest {
        BatchRequest {
            total_sales: dec!(50000),
            min_invoices: 3,
            max_invoices: 6,
            catalog: default_catalog(),
            customers: vec![],
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 30),
            numbering: NumberingConfig::default(),
            fill: FillConfig::default(),
        }
    }

    #[test]
    fn batch_respects_count_and_numbering() {
        let batch = InvoiceGenerator::new(Some(5)).generate(&request()).unwrap();
        let n = batch.invoices.len();
        assert!((3..=6).contains(&n));
        for (i, inv) in batch.invoices.iter().enumerate() {
            assert_eq!(inv.id, format!("{:03}", i + 1));
            assert!(default_customers().contains(&inv.customer));
        }
    }

    #[test]
    fn dates_sorted_within_range() {
        let batch = InvoiceGenerator::new(Some(6)).generate(&request()).unwrap();
        let dates: Vec<_> = batch.invoices.iter().map(|i| i.date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert!(dates.iter().all(|d| *d >= date(2024, 6, 1) && *d <= date(2024, 6, 30)));
    }

    #[test]
    fn targets_sum_close_to_total() {
        let batch = InvoiceGenerator::new(Some(8)).generate(&request()).unwrap();
        let targets: Decimal = batch.invoices.iter().map(|i| i.target).sum();
        let n = Decimal::from(batch.invoices.len());
        assert!((targets - dec!(50000)).abs() <= n);
    }

    #[test]
    fn seeded_batches_repeat() {
        let a = InvoiceGenerator::new(Some(11)).generate(&request()).unwrap();
        let b = InvoiceGenerator::new(Some(11)).generate(&request()).unwrap();
        assert_eq!(a.invoices.len(), b.invoices.len());
        for (x, y) in a.invoices.iter().zip(&b.invoices) {
            assert_eq!(x.items, y.items);
            assert_eq!(x.customer, y.customer);
            assert_eq!(x.date, y.date);
        }
    }

    #[test]
    fn single_day_range() {
        let mut req = request();
        req.end_date = req.start_date;
        let batch = InvoiceGenerator::new(Some(2)).generate(&req).unwrap();
        assert!(batch.invoices.iter().all(|i| i.date == req.start_date));
    }

    #[test]
    fn validation_rejects_bad_requests() {
        let mut req = request();
        req.total_sales = dec!(0);
        assert!(req.validate().is_err());

        let mut req = request();
        req.min_invoices = 0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.min_invoices = 7;
        assert!(req.validate().is_err());

        let mut req = request();
        req.catalog.clear();
        assert!(matches!(req.validate(), Err(BillError::Configuration(_))));

        let mut req = request();
        req.end_date = date(2024, 5, 1);
        assert!(req.validate().is_err());

        let mut req = request();
        req.total_sales = dec!(2);
        assert!(req.validate().is_err());
    }

    #[test]
    fn total_below_max_invoices_caps_the_count() {
        let mut req = request();
        req.total_sales = dec!(4);
        assert!(req.validate().is_ok());
        for seed in 0..20 {
            let batch = InvoiceGenerator::new(Some(seed)).generate(&req).unwrap();
            assert!((3..=4).contains(&batch.invoices.len()), "seed {seed}");
            assert!(batch.invoices.iter().all(|i| i.target >= Decimal::ONE));
        }
    }

    #[test]
    fn oversized_total_is_a_configuration_error() {
        let mut req = request();
        req.total_sales = Decimal::MAX;
        req.catalog = vec![CatalogEntry::new("Gum", dec!(0.01))];
        assert!(matches!(
            InvoiceGenerator::new(Some(1)).generate(&req),
            Err(BillError::Configuration(_))
        ));
    }

    #[test]
    fn exhausted_numbering_is_reported() {
        let mut req = request();
        req.numbering.first = u64::MAX;
        assert!(matches!(
            InvoiceGenerator::new(Some(3)).generate(&req),
            Err(BillError::Numbering(_))
        ));
    }

    #[test]
    fn unmet_invoices_get_notices() {
        let mut req = request();
        req.total_sales = dec!(6);
        req.min_invoices = 6;
        let batch = InvoiceGenerator::new(Some(4)).generate(&req).unwrap();
        let notices = batch.unmet_notices();
        assert_eq!(notices.len(), batch.unmet().count());
        assert_eq!(notices.len(), 6);
        assert!(notices[0].starts_with("bill 001 is approximate"));
        for (notice, inv) in notices.iter().zip(batch.unmet()) {
            assert!(notice.contains(&format!("for target {})", inv.target)));
        }
    }
}
