// Embedded static assets for the dashboard shell
pub const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");
const STYLES_CSS: &str = include_str!("../../static/styles.css");

/// Resolves a `/static/<path>` request to (content type, body).
pub fn lookup(path: &str) -> Option<(&'static str, &'static str)> {
    match path {
        "app.js" => Some(("application/javascript", APP_JS)),
        "styles.css" => Some(("text/css", STYLES_CSS)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets_resolve() {
        assert_eq!(lookup("app.js").unwrap().0, "application/javascript");
        assert_eq!(lookup("styles.css").unwrap().0, "text/css");
        assert!(lookup("nope.png").is_none());
    }
}
