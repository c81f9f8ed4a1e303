use std::collections::HashSet;

use url::Url;

/// Query parameters that carry campaign attribution and never affect which
/// document a URL points at.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// Canonicalizes a URL for identity comparison.
///
/// Strips a single trailing slash from the path, removes tracking query
/// parameters (other parameters are preserved verbatim, in order), drops the
/// fragment and lower-cases the host. Unparseable input is returned
/// unchanged, so the function is usable on anything a page hands us.
pub fn normalize_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        log::debug!("Failed to parse URL {url}, keeping it as is");
        return url.to_string();
    };

    let path = parsed.path().to_string();
    if let Some(stripped) = path.strip_suffix('/') {
        parsed.set_path(stripped);
    }

    if let Some(query) = parsed.query().map(str::to_owned) {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| {
                let key = pair.split('=').next().unwrap_or("");
                !TRACKING_PARAMS.contains(&key)
            })
            .collect();
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.set_query(Some(&kept.join("&")));
        }
    }

    parsed.set_fragment(None);

    parsed.to_string()
}

/// Returns true when the URL's host matches one of the configured trusted
/// domains. Matching is by substring, so an entry like `gov.uk` admits every
/// subdomain and a bare `gov` admits any government host.
pub fn is_trusted_domain(url: &str, trusted: &HashSet<String>) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    trusted.iter().any(|domain| host.contains(domain.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_strips_tracking_params() {
        assert_eq!(
            normalize_url("https://example.gov/policy?utm_source=newsletter&utm_medium=email"),
            "https://example.gov/policy"
        );
        assert_eq!(
            normalize_url("https://example.gov/policy?utm_source=x"),
            normalize_url("https://example.gov/policy")
        );
    }

    #[test]
    fn normalize_url_keeps_other_params_in_order() {
        assert_eq!(
            normalize_url("https://example.gov/search?b=2&utm_campaign=spring&a=1"),
            "https://example.gov/search?b=2&a=1"
        );
        assert_ne!(
            normalize_url("https://example.gov/policy?page=2"),
            normalize_url("https://example.gov/policy")
        );
    }

    #[test]
    fn normalize_url_strips_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.gov/policy/"),
            normalize_url("https://example.gov/policy")
        );
    }

    #[test]
    fn normalize_url_drops_fragment() {
        assert_eq!(
            normalize_url("https://example.gov/policy#section-2"),
            normalize_url("https://example.gov/policy")
        );
    }

    #[test]
    fn normalize_url_lowercases_host() {
        assert_eq!(
            normalize_url("https://Example.GOV/Policy"),
            "https://example.gov/Policy"
        );
    }

    #[test]
    fn normalize_url_is_idempotent() {
        let once = normalize_url("https://example.gov/policy/?utm_source=x&id=7#top");
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn normalize_url_keeps_unparseable_input() {
        assert_eq!(normalize_url("not a url"), "not a url");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn trusted_domain_matches_host() {
        let trusted: HashSet<String> = ["gov.uk".to_string(), "nist.gov".to_string()]
            .into_iter()
            .collect();
        assert!(is_trusted_domain("https://www.gov.uk/ai-regulation", &trusted));
        assert!(is_trusted_domain("https://www.NIST.gov/report", &trusted));
    }

    #[test]
    fn trusted_domain_rejects_unknown_host() {
        let trusted: HashSet<String> = ["gov.uk".to_string()].into_iter().collect();
        assert!(!is_trusted_domain("https://example.com/ai", &trusted));
        assert!(!is_trusted_domain("not a url", &trusted));
    }
}
