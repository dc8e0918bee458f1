use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BillError;
use super::fill::FillConfig;
use super::generator::BatchRequest;
use super::numbering::NumberingConfig;
use super::types::CatalogEntry;

/// Builder for [`BatchRequest`].
///
/// ```
/// use billsynth::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let request = BatchRequestBuilder::new(dec!(25000), default_catalog())
///     .invoice_count(4, 8)
///     .customer("Rajesh Patel")
///     .date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .prefix("MA/")
///     .build()
///     .unwrap();
/// assert_eq!(request.numbering.prefix, "MA/");
/// ```
pub struct BatchRequestBuilder {
    total_sales: Decimal,
    min_invoices: usize,
    max_invoices: usize,
    catalog: Vec<CatalogEntry>,
    customers: Vec<String>,
    dates: Option<(NaiveDate, NaiveDate)>,
    numbering: NumberingConfig,
    fill: FillConfig,
}

impl BatchRequestBuilder {
    /// Start a request for `total_sales` across 5–15 invoices.
    pub fn new(total_sales: Decimal, catalog: Vec<CatalogEntry>) -> Self {
        Self {
            total_sales,
            min_invoices: 5,
            max_invoices: 15,
            catalog,
            customers: Vec::new(),
            dates: None,
            numbering: NumberingConfig::default(),
            fill: FillConfig::default(),
        }
    }

    pub fn invoice_count(mut self, min: usize, max: usize) -> Self {
        self.min_invoices = min;
        self.max_invoices = max;
        self
    }

    pub fn customer(mut self, name: impl Into<String>) -> Self {
        self.customers.push(name.into());
        self
    }

    pub fn customers(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.customers.extend(names);
        self
    }

    /// Bill every invoice on a single day.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.dates = Some((date, date));
        self
    }

    /// Spread bill dates uniformly over `[start, end]`.
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.dates = Some((start, end));
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.numbering.prefix = prefix.into();
        self
    }

    pub fn numbering(mut self, numbering: NumberingConfig) -> Self {
        self.numbering = numbering;
        self
    }

    pub fn fill_config(mut self, config: FillConfig) -> Self {
        self.fill = config;
        self
    }

    /// Build and validate the request. Without explicit dates every bill is
    /// dated today (local time).
    pub fn build(self) -> Result<BatchRequest, BillError> {
        let request = self.build_unchecked();
        request.validate()?;
        Ok(request)
    }

    /// Build without validation, for tests or imported data.
    pub fn build_unchecked(self) -> BatchRequest {
        let (start_date, end_date) = self.dates.unwrap_or_else(|| {
            let today = chrono::Local::now().date_naive();
            (today, today)
        });
        BatchRequest {
            total_sales: self.total_sales,
            min_invoices: self.min_invoices,
            max_invoices: self.max_invoices,
            catalog: self.catalog,
            customers: self.customers,
            start_date,
            end_date,
            numbering: self.numbering,
            fill: self.fill,
        }
    }
}
