// Utility functions
use chrono::Local;
use reqwest::Url;

pub const PREVIEW_CHARS: usize = 200;

/// Capture instant in the worksheet's timestamp format.
pub fn capture_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// First `PREVIEW_CHARS` characters of a body, cut on a char boundary.
pub fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

/// JSON-compatible means the content type mentions `json` anywhere, in any case.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// `scheme://host[:port]` of a URL, if it parses.
pub fn site_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Prefixes the site origin onto root-relative links; other values pass through.
pub fn absolutize(href: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) if href.starts_with('/') && !href.starts_with("//") => {
            format!("{}{}", origin.trim_end_matches('/'), href)
        }
        _ => href.to_string(),
    }
}
