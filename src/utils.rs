/// Upper-cases the first character, leaving the rest untouched.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const COMPASS: [&str; 17] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW", "-",
];

/// 16-point compass label of a wind direction in whole degrees, `-` when unknown.
///
/// ```
/// assert_eq!(wsview::wind_dir(0.0), "N");
/// assert_eq!(wsview::wind_dir(250.0), "WSW");
/// assert_eq!(wsview::wind_dir(f64::NAN), "-");
/// ```
pub fn wind_dir(degrees: f64) -> &'static str {
    let degrees = degrees.trunc();
    if degrees.is_nan() || degrees < 0.0 {
        return COMPASS[16];
    }
    let sector = (degrees / 22.5) as usize;
    COMPASS[sector.min(16)]
}

/// Escapes text for use in HTML element content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
