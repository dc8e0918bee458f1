use billsynth::core::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() {
    // A month of bills for a small grocery shop
    let request = BatchRequestBuilder::new(dec!(150000), default_catalog())
        .invoice_count(10, 10)
        .dates(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .build()
        .expect("request should be valid");

    let batch = InvoiceGenerator::new(Some(2024))
        .generate(&request)
        .expect("batch should generate");

    for inv in &batch.invoices {
        println!("Bill {}  {}  {}", inv.id, inv.date.format("%d-%m-%Y"), inv.customer);
        println!("---");
        for item in &inv.items {
            println!(
                "  {:<18} {:>8} x {:>4}  GST {:>6}  = {:>10}",
                item.name, item.unit_price, item.quantity, item.gst_amount, item.line_total
            );
        }
        println!("---");
        let marker = if inv.status.is_accepted() { "" } else { "  (approximate)" };
        println!(
            "Total: {}  target {}{}\n",
            inv.subtotal(),
            inv.target,
            marker
        );
    }

    println!("Requested: {}", batch.total_sales);
    println!("Generated: {}", batch.grand_total());
}
