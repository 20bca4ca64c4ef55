use chrono::{DateTime, Utc};
use kuchikiki::NodeRef;

use crate::date::CompoundDateParser;
use crate::html::NodeExt;
use crate::model::PageInfo;

/// Registration date from a post sidebar (`dd.registered`) or a profile's "Member Since" entry.
pub fn extract_regdate(scope: &NodeRef, parser: &CompoundDateParser) -> Option<DateTime<Utc>> {
    scope
        .first("dd.registered")
        .and_then(|dd| parser.parse(&dd.text()))
        .or_else(|| {
            let dl = scope.first("dl.additional")?;
            let dd = definition_value(&dl, "Member Since")?;

            parser.parse(&dd.text())
        })
}

pub fn extract_post_count(scope: &NodeRef) -> Option<u32> {
    scope
        .first("dd.postcount")
        .and_then(|dd| parse_count(&dd.text()))
        .or_else(|| {
            let dl = scope.first("dl.additional")?;
            let dd = definition_value(&dl, "Post Count")?;

            parse_count(&dd.text())
        })
}

pub fn extract_avatar_url(scope: &NodeRef) -> Option<String> {
    scope
        .first("div.userpic img[src], dd.title img[src]")
        .and_then(|img| img.attr("src"))
        .map(|src| src.trim().to_owned())
        .filter(|src| !src.is_empty())
}

/// Custom title markup under the username, minus the `br.pb` separator the forums inject.
pub fn extract_custom_title(scope: &NodeRef) -> Option<String> {
    let title = scope.first("dl.userinfo dd.title").or_else(|| scope.first("dd.title"))?;

    let html: String = title
        .children()
        .filter(|child| !child.matches("br.pb"))
        .map(|child| child.to_string())
        .collect();

    let html = html.trim();

    if html.is_empty() {
        None
    } else {
        Some(html.to_owned())
    }
}

/// Current page and page count from the first page navigation control.
///
/// Newer templates carry both numbers as data attributes. Older ones only have a
/// `<select>` with one option per page. A control with neither is a single page.
pub fn extract_page_info(root: &NodeRef) -> Option<PageInfo> {
    let pages = root.first("div.pages")?;

    let data_attr = |name: &str| pages.attr(name).and_then(|value| value.trim().parse::<u32>().ok());

    if let (Some(page_number), Some(page_count)) = (data_attr("data-current-page"), data_attr("data-total-pages")) {
        return Some(PageInfo { page_number, page_count });
    }

    match pages.first("select") {
        Some(select) => {
            let page_count = select.all("option").len() as u32;
            let page_number = select
                .first("option[selected]")
                .and_then(|option| option.attr("value"))
                .and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or(1);

            Some(PageInfo {
                page_number,
                page_count: page_count.max(page_number),
            })
        }
        None => Some(PageInfo {
            page_number: 1,
            page_count: 1,
        }),
    }
}

/// `<dt>`/`<dd>` pairs of a definition list, keyed by the `<dt>` text without a trailing colon.
pub fn definition_pairs(dl: &NodeRef) -> Vec<(String, NodeRef)> {
    let mut pairs = Vec::new();
    let mut label: Option<String> = None;

    for child in dl.child_elements() {
        if child.is_element("dt") {
            label = Some(child.text().trim_end_matches(':').trim().to_owned());
        } else if child.is_element("dd") {
            if let Some(label) = label.take() {
                pairs.push((label, child));
            }
        }
    }

    pairs
}

pub fn definition_value(dl: &NodeRef, label: &str) -> Option<NodeRef> {
    definition_pairs(dl)
        .into_iter()
        .find(|(dt, _)| dt.eq_ignore_ascii_case(label))
        .map(|(_, dd)| dd)
}

/// Leading number of a count such as "12,345" or "1,234 posts".
pub fn parse_count(s: &str) -> Option<u32> {
    let digits: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use crate::html;

    use super::*;

    const PROFILE_INFO: &'static str = r#"<div>
        <dl class="additional">
            <dt>Member Since</dt><dd>Jan 12, 2003</dd>
            <dt>Post Count</dt><dd>12,345<span> posts</span></dd>
            <dt>Post Rate:</dt><dd>4.21 per day</dd>
        </dl>
        <div class="userpic"><img src="https://i.somethingawful.com/u/avatar.png"></div>
    </div>"#;

    #[test]
    fn profile_fields_from_definition_list() {
        let root = html::parse_string(PROFILE_INFO);

        assert_eq!(extract_post_count(&root), Some(12345));
        assert_eq!(
            extract_regdate(&root, &CompoundDateParser::regdate()).map(|d| d.year()),
            Some(2003)
        );
        assert_eq!(
            extract_avatar_url(&root).as_deref(),
            Some("https://i.somethingawful.com/u/avatar.png")
        );

        let dl = root.first("dl.additional").unwrap();
        let labels: Vec<String> = definition_pairs(&dl).into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Member Since", "Post Count", "Post Rate"]);
    }

    #[test]
    fn absent_fields_are_none() {
        let root = html::parse_string("<p>empty</p>");

        assert_eq!(extract_post_count(&root), None);
        assert_eq!(extract_regdate(&root, &CompoundDateParser::regdate()), None);
        assert_eq!(extract_avatar_url(&root), None);
        assert_eq!(extract_custom_title(&root), None);
        assert_eq!(extract_page_info(&root), None);
    }

    #[test]
    fn custom_title_drops_separator() {
        let root = html::parse_string(r#"<dl class="userinfo"><dd class="title"><br class="pb"><b>Title</b></dd></dl>"#);

        assert_eq!(extract_custom_title(&root).as_deref(), Some("<b>Title</b>"));
    }

    #[test]
    fn page_info_from_data_attributes() {
        let root = html::parse_string(r#"<div class="pages" data-current-page="3" data-total-pages="12"></div>"#);

        assert_eq!(
            extract_page_info(&root),
            Some(PageInfo {
                page_number: 3,
                page_count: 12
            })
        );
    }

    #[test]
    fn page_info_from_select() {
        let root = html::parse_string(
            r#"<div class="pages"><select><option value="1">1</option><option value="2" selected>2</option><option value="3">3</option></select></div>"#,
        );

        assert_eq!(
            extract_page_info(&root),
            Some(PageInfo {
                page_number: 2,
                page_count: 3
            })
        );
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("1,234 posts"), Some(1234));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("none"), None);
    }
}
