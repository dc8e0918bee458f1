use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A purchasable item available for sampling into invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Item name as printed on the bill.
    pub name: String,
    /// Price per unit (must be positive).
    pub unit_price: Decimal,
    /// GST rate in percent (0 when the item is untaxed).
    #[serde(default)]
    pub gst_rate: Decimal,
}

impl CatalogEntry {
    /// Create an untaxed entry.
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
            gst_rate: Decimal::ZERO,
        }
    }

    /// Set the GST rate in percent.
    pub fn with_gst(mut self, rate: Decimal) -> Self {
        self.gst_rate = rate;
        self
    }
}

/// One row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name copied from the catalog.
    pub name: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Number of units, always at least 1.
    pub quantity: u64,
    /// GST rate in percent.
    pub gst_rate: Decimal,
    /// GST on this line, rounded to 2 dp (0 when GST is not modeled).
    pub gst_amount: Decimal,
    /// `quantity * unit_price`.
    pub line_total: Decimal,
}

impl LineItem {
    /// Price `quantity` units of `entry`. Quantities below 1 are raised to 1.
    ///
    /// # Panics
    ///
    /// Panics when the line total or its GST overflows [`Decimal`]; use
    /// [`LineItem::checked_priced`] for untrusted input.
    pub fn priced(entry: &CatalogEntry, quantity: u64, apply_gst: bool) -> Self {
        match Self::checked_priced(entry, quantity, apply_gst) {
            Some(line) => line,
            None => panic!("line total of {quantity} x {} overflows", entry.unit_price),
        }
    }

    /// Like [`LineItem::priced`], returning `None` on overflow.
    pub fn checked_priced(entry: &CatalogEntry, quantity: u64, apply_gst: bool) -> Option<Self> {
        let quantity = quantity.max(1);
        let line_total = entry.unit_price.checked_mul(Decimal::from(quantity))?;
        let gst_amount = if apply_gst {
            round_half_up(
                line_total.checked_mul(entry.gst_rate)?.checked_div(dec!(100))?,
                2,
            )
        } else {
            Decimal::ZERO
        };
        Some(Self {
            name: entry.name.clone(),
            unit_price: entry.unit_price,
            quantity,
            gst_rate: entry.gst_rate,
            gst_amount,
            line_total,
        })
    }

    /// Line total including GST.
    pub fn amount(&self) -> Decimal {
        self.line_total + self.gst_amount
    }
}

/// Outcome of the tolerance check for one filled invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStatus {
    /// Subtotal is within tolerance of the target.
    Accepted,
    /// The retry budget ran out; the closest attempt was kept.
    ToleranceNotMet,
}

impl FillStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short code used in tabular exports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Accepted => "ok",
            Self::ToleranceNotMet => "approx",
        }
    }
}

/// A generated bill, ready for any renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Bill number (gapless within a batch).
    pub id: String,
    /// Customer name.
    pub customer: String,
    /// Bill date.
    pub date: NaiveDate,
    /// Amount this invoice was filled towards.
    pub target: Decimal,
    /// Line items in sampling order.
    pub items: Vec<LineItem>,
    /// Whether the fill landed inside the tolerance band.
    pub status: FillStatus,
}

impl Invoice {
    /// Sum of line totals plus GST. Always derived from the current items.
    pub fn subtotal(&self) -> Decimal {
        subtotal_of(&self.items)
    }

    /// Sum of line totals before GST.
    pub fn net_total(&self) -> Decimal {
        self.items.iter().map(|i| i.line_total).sum()
    }

    /// Sum of GST amounts.
    pub fn gst_total(&self) -> Decimal {
        self.items.iter().map(|i| i.gst_amount).sum()
    }

    /// Total number of units across all lines, saturating at `u64::MAX`.
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Signed difference `subtotal - target`.
    pub fn deviation(&self) -> Decimal {
        self.subtotal() - self.target
    }
}

pub(crate) fn subtotal_of(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::amount).sum()
}

pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
