use once_cell::sync::Lazy;
use url::Url;

/// Base used to make sense of the relative hrefs the forums emit when no real base is known.
static PLACEHOLDER_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://forums.invalid/").unwrap());

/// Parse an href that may be relative, absolute or protocol-relative.
pub fn parse_href(href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    PLACEHOLDER_BASE.join(href).ok()
}

/// Value of the first query parameter called `name`, if it is present and non-empty.
pub fn query_param(href: &str, name: &str) -> Option<String> {
    let url = parse_href(href)?;

    let value = url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_owned())?;

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Like [`query_param`], but only accepts values made entirely of ASCII digits.
pub fn numeric_query_param(href: &str, name: &str) -> Option<String> {
    query_param(href, name).filter(|value| value.bytes().all(|b| b.is_ascii_digit()))
}

pub fn fragment(href: &str) -> Option<String> {
    parse_href(href)?
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned)
}

/// Resolve `href` against `base`, the way a browser resolves links on a page served from `base`.
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// File name of the image an href points at, without its extension.
///
/// `https://fi.somethingawful.com/forums/posticons/lf-arecountry.png#123` becomes `lf-arecountry`.
pub fn icon_image_name(href: &str) -> Option<String> {
    let url = parse_href(href)?;
    let file_name = url.path_segments()?.last()?;

    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    };

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_from_relative_links() {
        let href = "member.php?action=getinfo&userid=106125";

        assert_eq!(query_param(href, "action").as_deref(), Some("getinfo"));
        assert_eq!(numeric_query_param(href, "userid").as_deref(), Some("106125"));
        assert_eq!(query_param(href, "threadid"), None);
        assert_eq!(numeric_query_param("showthread.php?threadid=abc", "threadid"), None);
        assert_eq!(query_param("showthread.php?threadid=", "threadid"), None);
    }

    #[test]
    fn fragments() {
        assert_eq!(fragment("/showthread.php?threadid=1#post411").as_deref(), Some("post411"));
        assert_eq!(fragment("/showthread.php?threadid=1"), None);
    }

    #[test]
    fn icon_names_drop_directory_extension_and_fragment() {
        assert_eq!(
            icon_image_name("https://fi.somethingawful.com/forums/posticons/lf-arecountry.png#123").as_deref(),
            Some("lf-arecountry")
        );
        assert_eq!(icon_image_name("/images/shitpost.gif?v=2").as_deref(), Some("shitpost"));
        assert_eq!(icon_image_name("tava-vintage.tar.gif").as_deref(), Some("tava-vintage.tar"));
        assert_eq!(icon_image_name("https://example.com/"), None);
        assert_eq!(icon_image_name(""), None);
    }

    #[test]
    fn resolves_against_base() {
        let base = Url::parse("https://forums.somethingawful.com/showthread.php?threadid=1").unwrap();

        assert_eq!(
            resolve(&base, " newreply.php ").map(|u| u.to_string()).as_deref(),
            Some("https://forums.somethingawful.com/newreply.php")
        );
    }
}
