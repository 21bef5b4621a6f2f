//! URL and root-domain normalization.
//!
//! The root domain is a plain "last two labels" heuristic. It is not aware of
//! multi-part public suffixes (`co.uk`, `com.ru`): `shop.example.com.ru` maps
//! to `com.ru`. Grouping and blacklist matching both depend on this exact
//! behavior, so it must not be swapped for a public-suffix lookup silently.

use crate::config::ROOT_DOMAIN_LABELS;

/// Strips a leading `http://` or `https://`, ignoring ASCII case.
fn strip_scheme(s: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if s
            .get(..scheme.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
        {
            return &s[scheme.len()..];
        }
    }
    s
}

/// Strips a leading `www.`, ignoring ASCII case.
fn strip_www(s: &str) -> &str {
    match s.get(..4) {
        Some(p) if p.eq_ignore_ascii_case("www.") => &s[4..],
        _ => s,
    }
}

/// Canonicalizes a URL into a comparable string.
///
/// Lower-cases, drops the scheme and a leading `www.`, cuts at the first `?`
/// or `#`, then removes trailing slashes.
///
/// # Examples
///
/// ```
/// use supplier_desk::domain::normalize_url;
///
/// assert_eq!(normalize_url("HTTPS://WWW.Foo.com/bar/"), "foo.com/bar");
/// assert_eq!(normalize_url("http://foo.com/?utm=1"), "foo.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    let rest = strip_www(strip_scheme(&lower));
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    rest[..end].trim_end_matches('/').to_string()
}

/// Extracts the root domain (last two DNS labels) from a URL or hostname.
///
/// The scheme, a leading `www.`, the path, query, fragment and port are
/// dropped. The registrable label keeps its casing for display; the top-level
/// label is lower-cased. Input that yields no labels is returned unchanged.
///
/// # Examples
///
/// ```
/// use supplier_desk::domain::extract_root_domain;
///
/// assert_eq!(extract_root_domain("https://www.Example.COM/path?x=1"), "Example.com");
/// assert_eq!(extract_root_domain("a.b.example.ru"), "example.ru");
/// ```
pub fn extract_root_domain(url: &str) -> String {
    let rest = strip_www(strip_scheme(url.trim()));
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    // Drop credentials and port; neither is part of the domain.
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return url.to_string();
    }

    let start = labels.len().saturating_sub(ROOT_DOMAIN_LABELS);
    let kept = &labels[start..];
    if kept.len() < ROOT_DOMAIN_LABELS {
        return kept.join(".");
    }

    let last = kept.len() - 1;
    format!("{}.{}", kept[..last].join("."), kept[last].to_lowercase())
}

/// Lower-cased root domain, the key used for grouping and matching.
pub fn root_domain_key(url: &str) -> String {
    extract_root_domain(url).to_lowercase()
}
