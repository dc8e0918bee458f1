use billsynth::core::*;
use billsynth::export;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() {
    let catalog = parse_catalog(
        "\
ITEM,RATE,GST
Rice,80,5%
Sugar,45,5%
Oil,150,5%
Tea,180,5%
Salt,25,0%
",
    )
    .expect("catalog should parse");

    let request = BatchRequestBuilder::new(dec!(12000), catalog)
        .invoice_count(3, 5)
        .customer("Rajesh Patel")
        .date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .prefix("MA/")
        .build()
        .expect("request should be valid");

    let batch = InvoiceGenerator::new(Some(7))
        .generate(&request)
        .expect("batch should generate");

    print!("{}", export::to_csv(&batch.invoices));
    println!();
    print!("{}", export::summary_csv(&batch.invoices));
}
