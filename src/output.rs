//! Plain-text rendering of a lookup for the terminal.

use crate::report::ContactReport;

pub fn render_text(query: &str, report: &ContactReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Contacts for {query}\n\n"));

    out.push_str("Raw Response\n");
    out.push_str(&report.raw_pretty());
    out.push_str("\n\nParsed Contacts\n");

    for category in report.categories() {
        match category.none_found_message() {
            Some(message) => out.push_str(&format!("{message}\n")),
            None => {
                out.push_str(&format!("{}:\n", category.kind.title()));
                for item in &category.items {
                    out.push_str(&format!("  - {item}\n"));
                }
            }
        }
    }

    if !report.pages.is_empty() {
        out.push_str("\nPages scanned / results\n");
        for (idx, page) in report.pages.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {}\n",
                idx + 1,
                page.url.as_deref().unwrap_or("(no url)")
            ));
            if let Some(snippet) = &page.snippet {
                out.push_str(&format!("     {snippet}\n"));
            }
        }
    }

    if let Some(residual) = report.residual_pretty() {
        out.push_str("\nOther fields\n");
        out.push_str(&residual);
        out.push('\n');
    }

    out
}
