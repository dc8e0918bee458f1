//! # billsynth
//!
//! Synthetic retail invoice generation for billing demos: split a grand total
//! into per-invoice targets, then fill each invoice with random catalog items
//! whose subtotal lands within a tolerance of its target.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every random draw goes through a caller-supplied [`rand::Rng`], so a fixed
//! seed reproduces a batch exactly.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use billsynth::core::*;
//! use rust_decimal_macros::dec;
//!
//! let request = BatchRequestBuilder::new(dec!(150000), default_catalog())
//!     .invoice_count(10, 10)
//!     .dates(
//!         NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let batch = InvoiceGenerator::new(Some(7)).generate(&request).unwrap();
//! assert_eq!(batch.invoices.len(), 10);
//! assert_eq!(batch.invoices[0].id, "001");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Splitting, filling, batch generation, numbering, validation |
//! | `export` | CSV hand-off for tabular renderers |
//! | `cli` | `billsynth` command-line binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
