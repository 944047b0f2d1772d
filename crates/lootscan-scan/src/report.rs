//! Occurrence counting and plain-text rendering of scan output.

use std::collections::HashMap;
use std::fmt::Write;

use lootscan_core::types::ItemReport;

/// Count occurrences of each name, in first-seen order. Blank names are
/// skipped.
pub fn count_items(names: &[String]) -> Vec<(String, u32)> {
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        match index.get(name.as_str()) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(name.as_str(), order.len());
                order.push((name.clone(), 1));
            }
        }
    }
    order
}

/// One corrected line per row, newline-terminated.
pub fn format_extracted(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Render lookup results the way the results pane shows them.
///
/// ```text
/// Item: Bolts (x2)
///   Name: Bolts
///   Avg Price: 9100
/// Item: Gpu (x1) - No data found
/// ```
pub fn format_results(items: &[ItemReport]) -> String {
    let mut out = String::new();
    for report in items {
        match &report.items {
            Some(records) if !records.is_empty() => {
                let _ = writeln!(out, "Item: {} (x{})", report.query, report.count);
                for record in records {
                    let price = record
                        .avg_24h_price
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "N/A".to_string());
                    let _ = writeln!(out, "  Name: {}\n  Avg Price: {}", record.name, price);
                }
            }
            _ => {
                let _ = writeln!(
                    out,
                    "Item: {} (x{}) - No data found",
                    report.query, report.count
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootscan_core::types::ItemPrice;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_preserves_first_seen_order() {
        let counts = count_items(&names(&["Bolts", "LEDX", "Bolts", "Gpu", "LEDX", "Bolts"]));
        assert_eq!(
            counts,
            vec![
                ("Bolts".to_string(), 3),
                ("LEDX".to_string(), 2),
                ("Gpu".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_count_skips_blank_names() {
        let counts = count_items(&names(&["", "  ", "Bolts"]));
        assert_eq!(counts, vec![("Bolts".to_string(), 1)]);
    }

    #[test]
    fn test_count_is_case_sensitive() {
        let counts = count_items(&names(&["bolts", "Bolts"]));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_format_extracted() {
        assert_eq!(format_extracted(&names(&["Bolts", "LEDX"])), "Bolts\nLEDX\n");
        assert_eq!(format_extracted(&[]), "");
    }

    #[test]
    fn test_format_results() {
        let reports = vec![
            ItemReport {
                query: "Bolts".to_string(),
                count: 2,
                items: Some(vec![ItemPrice {
                    name: "Bolts".to_string(),
                    short_name: Some("Bolts".to_string()),
                    avg_24h_price: Some(9100),
                    base_price: Some(4200),
                    wiki_link: None,
                }]),
            },
            ItemReport {
                query: "Dogtag".to_string(),
                count: 1,
                items: Some(vec![ItemPrice {
                    name: "Dogtag BEAR".to_string(),
                    short_name: None,
                    avg_24h_price: None,
                    base_price: None,
                    wiki_link: None,
                }]),
            },
            ItemReport {
                query: "Gpu".to_string(),
                count: 1,
                items: None,
            },
            ItemReport {
                query: "Nothing".to_string(),
                count: 3,
                items: Some(Vec::new()),
            },
        ];

        let expected = "Item: Bolts (x2)\n  Name: Bolts\n  Avg Price: 9100\n\
                        Item: Dogtag (x1)\n  Name: Dogtag BEAR\n  Avg Price: N/A\n\
                        Item: Gpu (x1) - No data found\n\
                        Item: Nothing (x3) - No data found\n";
        assert_eq!(format_results(&reports), expected);
    }
}
