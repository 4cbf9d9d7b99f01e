// src/utils/url.rs

//! Path-segment helpers for advisory links.
//!
//! These work on the raw link text split at `/`, the way the advisory
//! centres encode dates and product names in their paths.

/// Last `/`-separated segment of a link.
///
/// # Examples
/// ```
/// use fetch_vaa::utils::url::last_segment;
///
/// assert_eq!(last_segment("/products/VAA/adv.html"), "adv.html");
/// assert_eq!(last_segment("adv.html"), "adv.html");
/// ```
pub fn last_segment(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

/// Segment just before the last one, if the link has one.
///
/// # Examples
/// ```
/// use fetch_vaa::utils::url::second_to_last_segment;
///
/// assert_eq!(second_to_last_segment("/products/VAA/adv.html"), Some("VAA"));
/// assert_eq!(second_to_last_segment("adv.html"), None);
/// ```
pub fn second_to_last_segment(href: &str) -> Option<&str> {
    let mut segments = href.rsplit('/');
    segments.next()?;
    segments.next()
}

/// Everything before the second-to-last segment, without a trailing `/`.
pub fn grandparent(href: &str) -> Option<&str> {
    let mut splits = href.rsplitn(3, '/');
    splits.next()?;
    splits.next()?;
    splits.next()
}
