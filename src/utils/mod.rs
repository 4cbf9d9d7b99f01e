//! Utility functions and helpers.

pub mod http;
pub mod url;

use ::url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://vaac.example.com/aviation/vaac/vaacuk.html").unwrap();
        assert_eq!(
            resolve_url(&base, "data/VAA_1.html"),
            "https://vaac.example.com/aviation/vaac/data/VAA_1.html"
        );
        assert_eq!(
            resolve_url(&base, "/VAA/adv.html"),
            "https://vaac.example.com/VAA/adv.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
        assert_eq!(
            resolve_url(&base, ""),
            "https://vaac.example.com/aviation/vaac/vaacuk.html"
        );
    }
}
