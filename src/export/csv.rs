use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::Invoice;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// One row per line item.
///
/// Columns: bill_no,date,customer,item,rate,qty,gst_rate,gst,amount
pub fn to_csv(invoices: &[Invoice]) -> String {
    let mut out = String::from("bill_no,date,customer,item,rate,qty,gst_rate,gst,amount\n");
    for inv in invoices {
        let date = inv.date.format(DATE_FORMAT).to_string();
        for item in &inv.items {
            csv_field_str(&mut out, &inv.id);
            out.push(',');
            out.push_str(&date);
            out.push(',');
            csv_field_str(&mut out, &inv.customer);
            out.push(',');
            csv_field_str(&mut out, &item.name);
            out.push(',');
            csv_field_decimal(&mut out, item.unit_price);
            out.push(',');
            out.push_str(&item.quantity.to_string());
            out.push(',');
            csv_field_decimal(&mut out, item.gst_rate);
            out.push(',');
            csv_field_decimal(&mut out, item.gst_amount);
            out.push(',');
            csv_field_decimal(&mut out, item.line_total);
            out.push('\n');
        }
    }
    out
}

/// One row per invoice.
///
/// Columns: bill_no,date,customer,items,target,subtotal,status
pub fn summary_csv(invoices: &[Invoice]) -> String {
    let mut out = String::from("bill_no,date,customer,items,target,subtotal,status\n");
    for inv in invoices {
        csv_field_str(&mut out, &inv.id);
        out.push(',');
        out.push_str(&inv.date.format(DATE_FORMAT).to_string());
        out.push(',');
        csv_field_str(&mut out, &inv.customer);
        out.push(',');
        out.push_str(&inv.items.len().to_string());
        out.push(',');
        csv_field_decimal(&mut out, inv.target);
        out.push(',');
        csv_field_decimal(&mut out, inv.subtotal());
        out.push(',');
        out.push_str(inv.status.code());
        out.push('\n');
    }
    out
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    // Escape internal double quotes
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal) {
    let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    out.push_str(&format!("{rounded:.2}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_doubled() {
        let mut out = String::new();
        csv_field_str(&mut out, "Rajesh \"Raju\" Patel");
        assert_eq!(out, "\"Rajesh \"\"Raju\"\" Patel\"");
    }

    #[test]
    fn decimals_have_two_places() {
        let mut out = String::new();
        csv_field_decimal(&mut out, Decimal::new(80, 0));
        out.push(' ');
        csv_field_decimal(&mut out, Decimal::new(12345, 3));
        assert_eq!(out, "80.00 12.35");
    }

    #[test]
    fn empty_batch_has_only_headers() {
        assert_eq!(to_csv(&[]).lines().count(), 1);
        assert_eq!(summary_csv(&[]).lines().count(), 1);
    }
}
