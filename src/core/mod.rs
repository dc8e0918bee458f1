//! Core invoice types, allocation, batch generation and validation.
//!
//! [`split_total`] turns a grand total into per-invoice targets and
//! [`fill`] turns one target into line items. [`InvoiceGenerator`] ties the
//! two together with numbering, customers and dates.

mod builder;
mod catalog;
mod error;
mod fill;
mod generator;
mod numbering;
mod split;
mod types;
mod validation;

pub use builder::*;
pub use catalog::*;
pub use error::*;
pub use fill::*;
pub use generator::*;
pub use numbering::*;
pub use split::*;
pub use types::*;
pub use validation::*;
