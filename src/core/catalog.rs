//! Reference catalog data and delimited-text loading.
//!
//! Catalog text is one entry per line, `name,price[,gst]`. Semicolons work as
//! separators too. A leading header line, blank lines and `#` comments are
//! skipped; a GST rate may carry a `%` suffix.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{BillError, into_validation_error};
use super::types::CatalogEntry;
use super::validation::validate_catalog;

/// Grocery catalog used when no catalog is supplied (15 items, 25–800).
pub fn default_catalog() -> Vec<CatalogEntry> {
    [
        ("Rice", dec!(80), dec!(5)),
        ("Sugar", dec!(45), dec!(5)),
        ("Groundnut Oil", dec!(150), dec!(5)),
        ("Tea", dec!(180), dec!(5)),
        ("Salt", dec!(25), dec!(0)),
        ("Wheat Flour", dec!(40), dec!(0)),
        ("Toor Dal", dec!(140), dec!(0)),
        ("Moong Dal", dec!(120), dec!(0)),
        ("Ghee", dec!(650), dec!(12)),
        ("Jaggery", dec!(60), dec!(0)),
        ("Cumin Seeds", dec!(320), dec!(5)),
        ("Turmeric Powder", dec!(220), dec!(5)),
        ("Detergent Powder", dec!(110), dec!(18)),
        ("Bath Soap", dec!(35), dec!(18)),
        ("Cashew Nuts", dec!(800), dec!(5)),
    ]
    .into_iter()
    .map(|(name, price, gst)| CatalogEntry::new(name, price).with_gst(gst))
    .collect()
}

/// Walk-in customer names used when no customer list is supplied.
pub fn default_customers() -> Vec<String> {
    [
        "Rajesh Patel",
        "Meena Shah",
        "Kiran Desai",
        "Suresh Vasava",
        "Anjali Mehta",
        "Harish Parmar",
        "Nilesh Chauhan",
        "Pooja Solanki",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Parse catalog text into validated entries.
///
/// ```
/// use billsynth::core::parse_catalog;
/// use rust_decimal_macros::dec;
///
/// let catalog = parse_catalog("name,price,gst\nRice,80,5%\nSalt;25\n").unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog[0].gst_rate, dec!(5));
/// assert_eq!(catalog[1].gst_rate, dec!(0));
/// ```
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>, BillError> {
    let mut entries = Vec::new();
    let mut first_data_line = true;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim().trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = split_fields(line);
        let is_first = std::mem::replace(&mut first_data_line, false);

        if fields.len() < 2 || fields.len() > 3 {
            return Err(BillError::Catalog {
                line: line_no,
                message: format!("expected name,price[,gst] but found {} fields", fields.len()),
            });
        }

        let price = match parse_amount(&fields[1]) {
            Some(p) => p,
            None if is_first && looks_like_header(&fields) => continue,
            None => {
                return Err(BillError::Catalog {
                    line: line_no,
                    message: format!("invalid price '{}'", fields[1]),
                });
            }
        };

        let gst = match fields.get(2).filter(|g| !g.is_empty()) {
            Some(g) => parse_amount(g.trim_end_matches('%').trim()).ok_or_else(|| {
                BillError::Catalog {
                    line: line_no,
                    message: format!("invalid GST rate '{g}'"),
                }
            })?,
            None => Decimal::ZERO,
        };

        entries.push(CatalogEntry::new(fields[0].as_str(), price).with_gst(gst));
    }

    let errors = validate_catalog(&entries);
    if !errors.is_empty() {
        return Err(into_validation_error(&errors));
    }
    Ok(entries)
}

/// Parse a customer list: one name per line, blank lines and `#` comments skipped.
pub fn parse_customers(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches('\u{feff}'))
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(unquote)
        .collect()
}

/// Split one delimited line. Fields may be double-quoted, in which case the
/// separator is literal inside them and `""` stands for one quote.
fn split_fields(line: &str) -> Vec<String> {
    let sep = if has_unquoted(line, ';') { ';' } else { ',' };
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if in_quotes => in_quotes = false,
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            c if c == sep && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

fn has_unquoted(line: &str, needle: char) -> bool {
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return true,
            _ => {}
        }
    }
    false
}

/// Strip surrounding quotes from a whole-line value and collapse `""`.
fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

fn parse_amount(field: &str) -> Option<Decimal> {
    Decimal::from_str(field.trim()).ok()
}

fn looks_like_header(fields: &[String]) -> bool {
    let price = fields[1].to_lowercase();
    price.contains("price") || price.contains("rate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 15);
        assert!(validate_catalog(&catalog).is_empty());
        let min = catalog.iter().map(|e| e.unit_price).min().unwrap();
        let max = catalog.iter().map(|e| e.unit_price).max().unwrap();
        assert_eq!((min, max), (dec!(25), dec!(800)));
    }

    #[test]
    fn parses_with_header_comments_and_blank_lines() {
        let text = "\
# shop items
ITEM,RATE,GST

Rice,80,5%
Sugar,45,5
Salt,25
";
        let catalog = parse_catalog(text).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0], CatalogEntry::new("Rice", dec!(80)).with_gst(dec!(5)));
        assert_eq!(catalog[2].gst_rate, Decimal::ZERO);
    }

    #[test]
    fn semicolons_and_quotes() {
        let catalog = parse_catalog("\"Groundnut Oil\"; 150.50 ; 5 %\n").unwrap();
        assert_eq!(catalog[0].name, "Groundnut Oil");
        assert_eq!(catalog[0].unit_price, dec!(150.50));
        assert_eq!(catalog[0].gst_rate, dec!(5));
    }

    #[test]
    fn bad_price_reports_line() {
        let err = parse_catalog("Rice,80\nSugar,abc\n").unwrap_err();
        match err {
            BillError::Catalog { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_price_column() {
        assert!(matches!(
            parse_catalog("Rice\n"),
            Err(BillError::Catalog { line: 1, .. })
        ));
    }

    #[test]
    fn bad_gst() {
        assert!(matches!(
            parse_catalog("Rice,80,five\n"),
            Err(BillError::Catalog { line: 1, .. })
        ));
    }

    #[test]
    fn header_only_is_empty_catalog() {
        assert!(matches!(
            parse_catalog("name,price\n"),
            Err(BillError::Validation(_))
        ));
    }

    #[test]
    fn non_positive_price_fails_validation() {
        assert!(matches!(
            parse_catalog("Rice,0\n"),
            Err(BillError::Validation(_))
        ));
    }

    #[test]
    fn customers() {
        let names = parse_customers("Rajesh Patel\n\n# regulars\n\"Meena Shah\"\n");
        assert_eq!(names, vec!["Rajesh Patel", "Meena Shah"]);
        assert_eq!(default_customers().len(), 8);
    }

    #[test]
    fn quoted_separator_stays_in_name() {
        let catalog = parse_catalog("\"Oil, refined\",150,5\n").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Oil, refined");
        assert_eq!(catalog[0].unit_price, dec!(150));
        assert_eq!(catalog[0].gst_rate, dec!(5));

        let catalog = parse_catalog("\"Dal; toor\";120\n").unwrap();
        assert_eq!(catalog[0].name, "Dal; toor");
    }

    #[test]
    fn doubled_quotes_are_unescaped() {
        let catalog = parse_catalog("\"Rajesh \"\"Raju\"\" Oil\",150\n").unwrap();
        assert_eq!(catalog[0].name, "Rajesh \"Raju\" Oil");

        let names = parse_customers("\"Rajesh \"\"Raju\"\" Patel\"\n\"Shah, Meena\"\n");
        assert_eq!(names, vec!["Rajesh \"Raju\" Patel", "Shah, Meena"]);
    }

    #[test]
    fn unquoted_customer_keeps_commas() {
        assert_eq!(parse_customers("Patel, Rajesh\n"), vec!["Patel, Rajesh"]);
    }
}
