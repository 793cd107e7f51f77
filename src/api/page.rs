use crate::error::ErrorCategory;
use crate::report::ContactReport;
use crate::session::{Failure, FormState};

const TITLE: &str = "Website Contact Crawler";

const STYLE: &str = "body{font-family:sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem}\
pre{background:#f4f4f4;padding:.75rem;overflow-x:auto}\
.error{color:#8a1c1c}.success{color:#1c6b2a}.muted{color:#666}";

/// Full HTML page for a session in `state`.
pub fn render_page(session_id: &str, state: &FormState) -> String {
    let input = match state {
        FormState::Idle => "",
        FormState::Submitting { query } | FormState::Success { query, .. } => query.as_str(),
        FormState::Failed { input, .. } => input.as_str(),
    };

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{TITLE}</h1>\n"));
    html.push_str(
        "<p>Enter a full URL (https://example.com) or domain (example.com) and hit <strong>Search</strong>.</p>\n",
    );
    html.push_str(&format!(
        "<form method=\"post\" action=\"/lookup\">\n\
         <input type=\"hidden\" name=\"session\" value=\"{}\">\n\
         <label>URL or domain <input type=\"text\" name=\"query\" value=\"{}\" \
         placeholder=\"https://example.com or example.com\" size=\"40\"></label>\n\
         <button type=\"submit\">Search</button>\n</form>\n",
        escape(session_id),
        escape(input)
    ));

    match state {
        FormState::Idle => {}
        FormState::Submitting { .. } => {
            html.push_str("<p class=\"muted\">Querying API...</p>\n");
        }
        FormState::Success {
            result,
            retrieved_at,
            ..
        } => {
            html.push_str(&format!(
                "<p class=\"success\">Data retrieved. <span class=\"muted\">{}</span></p>\n",
                retrieved_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            render_report(&mut html, &ContactReport::from_result(result));
        }
        FormState::Failed { failure, .. } => render_failure(&mut html, failure),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_report(html: &mut String, report: &ContactReport) {
    html.push_str("<h2>Raw Response</h2>\n");
    html.push_str(&format!("<pre>{}</pre>\n", escape(&report.raw_pretty())));

    html.push_str("<h2>Parsed Contacts</h2>\n");
    for category in report.categories() {
        match category.none_found_message() {
            Some(message) => html.push_str(&format!("<p>{}</p>\n", escape(message))),
            None => {
                html.push_str(&format!("<h3>{}</h3>\n<ul>\n", category.kind.title()));
                for item in &category.items {
                    html.push_str(&format!("<li>{}</li>\n", escape(item)));
                }
                html.push_str("</ul>\n");
            }
        }
    }

    if !report.pages.is_empty() {
        html.push_str("<h2>Pages scanned / results</h2>\n<ol>\n");
        for page in &report.pages {
            let url = page.url.as_deref().unwrap_or("(no url)");
            html.push_str(&format!("<li><strong>{}</strong>", escape(url)));
            if let Some(snippet) = &page.snippet {
                html.push_str(&format!("<br><small class=\"muted\">{}</small>", escape(snippet)));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ol>\n");
    }

    if let Some(residual) = report.residual_pretty() {
        html.push_str("<h2>Other fields</h2>\n");
        html.push_str(&format!("<pre>{}</pre>\n", escape(&residual)));
    }
}

fn render_failure(html: &mut String, failure: &Failure) {
    html.push_str(&format!(
        "<p class=\"error\"><strong>{} error:</strong> {}</p>\n",
        escape(failure.category.as_str()),
        escape(&failure.message)
    ));
    if let Some(hint) = hint_for(failure.category) {
        html.push_str(&format!("<p class=\"muted\">{hint}</p>\n"));
    }
}

pub fn hint_for(category: ErrorCategory) -> Option<&'static str> {
    match category {
        ErrorCategory::Http | ErrorCategory::RemoteApi => {
            Some("Check your RAPIDAPI_KEY, host, and endpoint path.")
        }
        ErrorCategory::Configuration => Some("Fix the deployment configuration and restart."),
        _ => None,
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
