//! Tabular hand-off for renderers.
//!
//! Produces plain CSV with a header row, `.` as decimal separator and
//! `dd-mm-yyyy` dates. Layout, currency symbols and amount-in-words are left
//! to whatever consumes the file.
//!
//! # Example
//!
//! ```
//! use billsynth::core::*;
//! use billsynth::export;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let request = BatchRequestBuilder::new(dec!(20000), default_catalog())
//!     .invoice_count(3, 3)
//!     .date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .build()
//!     .unwrap();
//! let batch = InvoiceGenerator::new(Some(3)).generate(&request).unwrap();
//!
//! let lines = export::to_csv(&batch.invoices);
//! assert!(lines.starts_with("bill_no,date,customer,item"));
//! let summary = export::summary_csv(&batch.invoices);
//! assert_eq!(summary.lines().count(), 4);
//! ```

mod csv;

pub use csv::{summary_csv, to_csv};
