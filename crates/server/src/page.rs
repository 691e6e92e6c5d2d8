//! HTML form page
//!
//! A single self-contained page: the input form, followed by either the
//! prediction with its breakdown or an inline error message.

use pricing_lib::adjuster::{OWNER_FACTORS, SELLER_FACTORS};
use pricing_lib::validator::is_form_toggle_on;
use pricing_lib::PredictionResult;
use std::collections::HashMap;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.75rem}input,select{width:100%;padding:.3rem}\
input[type=checkbox]{width:auto}.error{color:#b00020}.result{margin-top:1.5rem}\
table{border-collapse:collapse}td{padding:.2rem .8rem;border-bottom:1px solid #ddd}";

/// What the page shows besides the form
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Previously submitted values, echoed back into the inputs
    pub fields: Option<&'a HashMap<String, String>>,
    pub result: Option<&'a PredictionResult>,
    pub error: Option<&'a str>,
}

impl<'a> PageView<'a> {
    fn field(&self, name: &str) -> &'a str {
        self.fields
            .and_then(|f| f.get(name))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Render the full page
pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Used Bike Price Predictor</title>");
    let _ = write!(html, "<style>{}</style></head><body>", STYLE);
    html.push_str("<h1>Used Bike Price Predictor</h1>");
    render_form(&mut html, view);

    if let Some(error) = view.error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }
    if let Some(result) = view.result {
        render_result(&mut html, result);
    }

    html.push_str("</body></html>");
    html
}

fn render_form(html: &mut String, view: &PageView<'_>) {
    html.push_str("<form method=\"post\" action=\"/\">");
    text_input(html, "year", "Manufacturing year", "number", view.field("year"));
    text_input(html, "km_driven", "Kilometers driven", "number", view.field("km_driven"));
    text_input(
        html,
        "ex_showroom_price",
        "Ex-showroom price",
        "number",
        view.field("ex_showroom_price"),
    );
    select_input(html, "owner", "Owner", OWNER_FACTORS, view.field("owner"));
    select_input(html, "seller_type", "Seller type", SELLER_FACTORS, view.field("seller_type"));
    text_input(html, "model_name", "Model name", "text", view.field("model_name"));

    let checked = if is_form_toggle_on(view.field("apply_adjustments")) {
        " checked"
    } else {
        ""
    };
    let _ = write!(
        html,
        "<label><input type=\"checkbox\" name=\"apply_adjustments\"{}> Apply marketplace adjustments</label>",
        checked
    );
    html.push_str("<p><button type=\"submit\">Predict price</button></p></form>");
}

fn text_input(html: &mut String, name: &str, label: &str, kind: &str, value: &str) {
    let step = if kind == "number" { " step=\"any\"" } else { "" };
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label><input id=\"{name}\" name=\"{name}\" type=\"{kind}\"{step} value=\"{value}\">",
        name = name,
        label = label,
        kind = kind,
        step = step,
        value = escape_html(value),
    );
}

fn select_input(html: &mut String, name: &str, label: &str, options: &[(&str, f64)], selected: &str) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\"><option value=\"\">Not specified</option>",
        name = name,
        label = label,
    );
    for (option, _) in options {
        let marker = if option.eq_ignore_ascii_case(selected.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(option),
            marker
        );
    }
    html.push_str("</select>");
}

fn render_result(html: &mut String, result: &PredictionResult) {
    html.push_str("<div class=\"result\">");
    let _ = write!(
        html,
        "<h2>Predicted price: {:.2}</h2>",
        result.base_prediction
    );
    if result.breakdown.total_multiplier.is_some() {
        let _ = write!(
            html,
            "<h3>Adjusted price: {:.2}</h3>",
            result.adjusted_prediction
        );
    }
    html.push_str("<table>");
    for (name, value) in result.breakdown.entries() {
        let _ = write!(html, "<tr><td>{}</td><td>{}</td></tr>", name, format_value(name, value));
    }
    html.push_str("</table></div>");
}

fn format_value(name: &str, value: f64) -> String {
    if name.ends_with("multiplier") {
        format!("{:.4}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_lib::AdjustmentBreakdown;

    #[test]
    fn test_empty_page_has_form() {
        let html = render(&PageView::default());
        assert!(html.contains("<form method=\"post\" action=\"/\">"));
        assert!(html.contains("name=\"year\""));
        assert!(html.contains("<option value=\"trustmark dealer\">"));
        assert!(!html.contains("class=\"error\""));
        assert!(!html.contains("Predicted price"));
    }

    #[test]
    fn test_error_is_escaped() {
        let html = render(&PageView {
            error: Some("<script>alert(1)</script>"),
            ..Default::default()
        });
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_fields_are_echoed() {
        let fields: HashMap<String, String> = [
            ("year", "2018"),
            ("owner", "2nd owner"),
            ("model_name", "Honda \"Shine\""),
            ("apply_adjustments", "on"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let html = render(&PageView {
            fields: Some(&fields),
            ..Default::default()
        });

        assert!(html.contains("value=\"2018\""));
        assert!(html.contains("<option value=\"2nd owner\" selected>"));
        assert!(html.contains("value=\"Honda &quot;Shine&quot;\""));
        assert!(html.contains("name=\"apply_adjustments\" checked"));
    }

    #[test]
    fn test_checkbox_follows_toggle_values() {
        for (raw, checked) in [("on", true), ("Yes", true), ("off", false), ("0", false)] {
            let fields: HashMap<String, String> =
                [("apply_adjustments".to_string(), raw.to_string())].into();
            let html = render(&PageView {
                fields: Some(&fields),
                ..Default::default()
            });
            assert_eq!(
                html.contains("name=\"apply_adjustments\" checked"),
                checked,
                "value {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_result_rendering() {
        let result = PredictionResult {
            base_prediction: 50000.0,
            adjusted_prediction: 52500.0,
            breakdown: AdjustmentBreakdown {
                base: 50000.0,
                owner_multiplier: Some(1.05),
                km_multiplier: Some(1.0),
                adjusted: Some(52500.0),
                total_multiplier: Some(1.05),
                ..Default::default()
            },
        };
        let html = render(&PageView {
            result: Some(&result),
            ..Default::default()
        });

        assert!(html.contains("Predicted price: 50000.00"));
        assert!(html.contains("Adjusted price: 52500.00"));
        assert!(html.contains("<td>owner_multiplier</td><td>1.0500</td>"));
        assert!(!html.contains("seller_multiplier"));
    }

    #[test]
    fn test_unadjusted_result_hides_adjusted_price() {
        let result = PredictionResult {
            base_prediction: 41000.5,
            adjusted_prediction: 41000.5,
            breakdown: AdjustmentBreakdown::new(41000.5),
        };
        let html = render(&PageView {
            result: Some(&result),
            ..Default::default()
        });
        assert!(html.contains("Predicted price: 41000.50"));
        assert!(!html.contains("Adjusted price"));
    }
}
