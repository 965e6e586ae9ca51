//! Markup for map popups and result list entries
//!
//! Store names and addresses come from OpenStreetMap via the backend and are
//! untrusted; every one of them goes through `escape_for_display`.

use crate::query::PointOfInterest;

/// Escape text for insertion into markup
///
/// `None` yields an empty string.
pub fn escape_for_display(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape(text: &str) -> String {
    escape_for_display(Some(text))
}

/// Popup label for a store marker
pub fn popup_html(poi: &PointOfInterest) -> String {
    let mut html = format!("<strong>{}</strong>", escape(&poi.name));
    if poi.has_address() {
        html.push_str("<br/>");
        html.push_str(&escape(&poi.address));
    }
    html
}

/// Result list entry for a store
pub fn list_entry_html(poi: &PointOfInterest) -> String {
    let mut html = format!("<div class=\"store-name\">{}</div>", escape(&poi.name));
    if poi.has_address() {
        html.push_str(&format!(
            "<div class=\"store-address\">{}</div>",
            escape(&poi.address)
        ));
    }
    html
}
