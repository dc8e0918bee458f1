use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::types::*;

/// Validate catalog entries before sampling.
/// Returns all validation errors found (not just the first).
pub fn validate_catalog(catalog: &[CatalogEntry]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if catalog.is_empty() {
        errors.push(ValidationError::new(
            "catalog",
            "catalog must contain at least one item",
        ));
        return errors;
    }

    let mut seen = HashSet::new();
    for (i, entry) in catalog.iter().enumerate() {
        let prefix = format!("catalog[{i}]");

        if entry.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.name"),
                "item name must not be empty",
            ));
        } else if !seen.insert(entry.name.trim().to_lowercase()) {
            errors.push(ValidationError::new(
                format!("{prefix}.name"),
                format!("duplicate item '{}'", entry.name),
            ));
        }

        if entry.unit_price <= Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("{prefix}.unit_price"),
                format!("unit price must be positive, got {}", entry.unit_price),
            ));
        }

        if entry.gst_rate < Decimal::ZERO || entry.gst_rate > dec!(100) {
            errors.push(ValidationError::new(
                format!("{prefix}.gst_rate"),
                format!("GST rate must be between 0 and 100, got {}", entry.gst_rate),
            ));
        }
    }

    errors
}

/// Validate a generated invoice: item invariants, line arithmetic, and that an
/// `Accepted` status really is within `tolerance` of the target.
pub fn validate_invoice(invoice: &Invoice, tolerance: Decimal) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.id.trim().is_empty() {
        errors.push(ValidationError::new("id", "bill number must not be empty"));
    }

    if invoice.items.is_empty() {
        errors.push(ValidationError::new(
            "items",
            "invoice must have at least one line item",
        ));
    }

    for (i, item) in invoice.items.iter().enumerate() {
        validate_item(item, i, &mut errors);
    }

    if invoice.status.is_accepted() {
        let subtotal = invoice.subtotal();
        if (subtotal - invoice.target).abs() > tolerance * invoice.target {
            errors.push(ValidationError::new(
                "status",
                format!(
                    "marked accepted but subtotal {} is outside {} of target {}",
                    subtotal, tolerance, invoice.target
                ),
            ));
        }
    }

    errors
}

fn validate_item(item: &LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("items[{index}]");

    if item.quantity == 0 {
        errors.push(ValidationError::new(
            format!("{prefix}.quantity"),
            "quantity must be at least 1",
        ));
    }

    if item.unit_price <= Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.unit_price"),
            "unit price must be positive",
        ));
    }

    let expected = item.unit_price * Decimal::from(item.quantity);
    if item.line_total != expected {
        errors.push(ValidationError::new(
            format!("{prefix}.line_total"),
            format!(
                "line total {} does not match {} x {} = {}",
                item.line_total, item.quantity, item.unit_price, expected
            ),
        ));
    }

    if item.gst_amount < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.gst_amount"),
            "GST amount must not be negative",
        ));
    }
}
