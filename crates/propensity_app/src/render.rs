//! HTML page rendering.
//!
//! One page serves both the empty form and the result of a submission.

use core::fmt::Write as _;
use std::collections::HashMap;

use ml_model::{MetadataRecord, PredictionResult};
use profile_structs::{FIELDS, FieldDomain, FieldSpec};

const TITLE: &str = "Wellness Package Predictor";
const HEADING: &str = "🏝️ Wellness Tourism Package — Purchase Propensity";

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;display:flex}\
aside{width:20rem;padding:1rem;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:1rem 2rem}\
label{display:block;margin-top:.6rem;font-size:.9rem}\
input,select{width:100%;box-sizing:border-box}\
button{margin-top:1rem;width:100%}\
.metric{font-size:2rem;font-weight:bold}\
.error{background:#fde2e2;color:#8a1f1f;padding:.75rem;border-radius:.25rem}";

/// What the result area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing submitted yet.
    Empty,
    Prediction(PredictionResult),
    /// The submission failed; the form still works.
    Error(String),
}

/// Everything needed to render the page.
pub struct Page<'a> {
    pub metadata: &'a MetadataRecord,
    pub model_repo: &'a str,
    /// Current form values keyed by column name.
    pub values: &'a HashMap<String, String>,
    pub outcome: &'a Outcome,
}

impl Page<'_> {
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(8 * 1024);

        let _ = write!(
            html,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{TITLE}</title><style>{STYLE}</style></head><body>"
        );

        self.render_form(&mut html);

        let _ = write!(
            html,
            "<main><h1>{HEADING}</h1><p>Model: <code>{}</code></p>\
             <p><small>Model training metrics</small></p><pre>{}</pre>",
            escape(self.model_repo),
            escape(&self.metadata.to_pretty_json()),
        );

        match self.outcome {
            Outcome::Empty => {}
            Outcome::Prediction(result) => {
                let _ = write!(
                    html,
                    "<section id=\"result\"><h2>Purchase Probability</h2>\
                     <p class=\"metric\">{}</p><p>Prediction: <strong>{}</strong></p></section>",
                    result.probability_text(),
                    result.label_text(),
                );
            }
            Outcome::Error(message) => {
                let _ = write!(
                    html,
                    "<section id=\"result\" class=\"error\">{}</section>",
                    escape(message)
                );
            }
        }

        html.push_str("</main></body></html>");
        html
    }

    fn render_form(&self, html: &mut String) {
        html.push_str(
            "<aside><h2>Customer Profile</h2><form method=\"post\" action=\"/predict\">",
        );

        for spec in &FIELDS {
            let value = self
                .values
                .get(spec.name)
                .cloned()
                .unwrap_or_else(|| spec.default_text());
            render_field(html, spec, &value);
        }

        html.push_str("<button type=\"submit\">Predict</button></form></aside>");
    }
}

fn render_field(html: &mut String, spec: &FieldSpec, value: &str) {
    let name = spec.name;
    let _ = write!(html, "<label for=\"{name}\">{name}</label>");

    match spec.domain {
        FieldDomain::Range { min, max, step, .. } => {
            // The browser rejects values off the `step` grid, while the parser
            // accepts every integer in range, so only unit steps are rendered.
            let step = if step == 1 { " step=\"1\"" } else { "" };
            let _ = write!(
                html,
                "<input type=\"number\" id=\"{name}\" name=\"{name}\" \
                 min=\"{min}\" max=\"{max}\"{step} value=\"{}\" required>",
                escape(value)
            );
        }
        FieldDomain::IntChoice { options, .. } => {
            let options: Vec<String> = options.iter().map(i64::to_string).collect();
            render_select(html, name, options.iter().map(String::as_str), value);
        }
        FieldDomain::Choice { options, .. } => {
            render_select(html, name, options.iter().copied(), value);
        }
    }
}

fn render_select<'a>(
    html: &mut String,
    name: &str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
) {
    let _ = write!(html, "<select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let option = escape(option);
        let marker = if option == escape(selected) { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>");
}

/// Escapes text for use in element content and quoted attributes.
#[must_use]
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
