//! Link and image source validation.

use url::Url;

/// Schemes that are never accepted as link targets.
const BLOCKED_SCHEMES: &[&str] = &["javascript", "file", "vbscript"];

/// Relative or non-navigational prefixes kept as-is by [`sanitize_url`].
const PASSTHROUGH_PREFIXES: &[&str] = &["/", "#", "mailto:", "sms:", "fax:", "tel:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlOptions {
    /// Reject URLs without a host, even protocol-relative looking ones.
    pub require_hostname: bool,
    /// Accept `data:image/...;base64,` URLs.
    pub allow_base64: bool,
}

/// Check whether `text` is an absolute URL safe to use as a link or image
/// source.
pub fn is_url(text: &str, options: UrlOptions) -> bool {
    if text.contains('\n') {
        return false;
    }
    let Ok(url) = Url::parse(text) else {
        return false;
    };

    let scheme = url.scheme();
    if BLOCKED_SCHEMES.contains(&scheme) {
        return false;
    }
    if scheme == "data" {
        return options.allow_base64 && is_base64_image_url(text);
    }

    if url.host_str().is_some_and(|host| !host.is_empty()) {
        return true;
    }

    let path = url.path();
    (path.starts_with("//") || path.starts_with("http")) && !options.require_hostname
}

/// Normalize user-entered link text into something safe to store.
///
/// Returns `None` for empty input and for base64 image URLs that fail
/// validation. Anything that is neither a valid URL nor a relative or
/// contact link is assumed to be a bare domain and gets `https://`.
pub fn sanitize_url(url: &str, allow_base64: bool) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    if allow_base64 && url.starts_with("data:image") {
        let options = UrlOptions {
            require_hostname: false,
            allow_base64: true,
        };
        return is_url(url, options).then(|| url.to_owned());
    }

    let options = UrlOptions {
        require_hostname: false,
        allow_base64,
    };
    if !is_url(url, options)
        && !PASSTHROUGH_PREFIXES
            .iter()
            .any(|prefix| url.starts_with(prefix))
    {
        tracing::trace!(target: "mintap::links", url, "assuming bare domain");
        return Some(format!("https://{url}"));
    }
    Some(url.to_owned())
}

/// `data:image/<subtype>;base64,` with a lowercase alphabetic subtype.
fn is_base64_image_url(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("data:image/") else {
        return false;
    };
    let subtype_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_lowercase())
        .count();
    subtype_len > 0 && rest[subtype_len..].starts_with(";base64,")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENIENT: UrlOptions = UrlOptions {
        require_hostname: false,
        allow_base64: false,
    };

    #[test]
    fn test_is_url_accepts_hosts() {
        assert!(is_url("https://example.com/a?b=c", LENIENT));
        assert!(is_url("ftp://files.example.com", LENIENT));
    }

    #[test]
    fn test_is_url_rejects_unsafe_and_relative() {
        assert!(!is_url("javascript:alert(1)", LENIENT));
        assert!(!is_url("file:///etc/passwd", LENIENT));
        assert!(!is_url("vbscript:msgbox", LENIENT));
        assert!(!is_url("example.com", LENIENT));
        assert!(!is_url("https://example.com\n/evil", LENIENT));
        assert!(!is_url("mailto:someone@example.com", LENIENT));
    }

    #[test]
    fn test_is_url_data_urls() {
        let png = "data:image/png;base64,iVBORw0KGgo=";
        assert!(!is_url(png, LENIENT));
        let allow = UrlOptions {
            allow_base64: true,
            ..LENIENT
        };
        assert!(is_url(png, allow));
        assert!(!is_url("data:text/html;base64,PGgxPg==", allow));
        assert!(!is_url("data:image/svg+xml;base64,PHN2Zz4=", allow));
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url("", false), None);
        assert_eq!(
            sanitize_url("example.com", false).as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            sanitize_url("https://example.com", false).as_deref(),
            Some("https://example.com")
        );
        for kept in ["/docs", "#intro", "mailto:a@b.c", "tel:+123", "sms:123", "fax:123"] {
            assert_eq!(sanitize_url(kept, false).as_deref(), Some(kept));
        }
        assert_eq!(
            sanitize_url("javascript:alert(1)", false).as_deref(),
            Some("https://javascript:alert(1)")
        );
    }

    #[test]
    fn test_sanitize_base64_images() {
        let png = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(sanitize_url(png, true).as_deref(), Some(png));
        assert_eq!(sanitize_url("data:image/png,raw", true), None);
    }
}
