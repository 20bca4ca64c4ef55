use kuchikiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::date::CompoundDateParser;
use crate::html::NodeExt;
use crate::model::{AuthorInfo, UserRef};

use super::*;

static USERID_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^userid-(\d+)$").unwrap());

/// How many ancestors above the starting node are searched when it holds no author itself.
const AUTHOR_SEARCH_DEPTH: usize = 2;

/// Find the author block at or near `near`.
///
/// The node itself is searched first, then its parent and grandparent. A block that shows a
/// username but no numeric user id still yields an author, with `user_id` unset.
pub fn extract_author(near: &NodeRef, regdates: &CompoundDateParser) -> Option<AuthorInfo> {
    std::iter::once(near.clone())
        .chain(near.ancestors().take(AUTHOR_SEARCH_DEPTH))
        .find_map(|scope| author_in(&scope, regdates))
}

fn author_in(scope: &NodeRef, regdates: &CompoundDateParser) -> Option<AuthorInfo> {
    let user_id = extract_user_id(scope);

    let author_name_node = scope.first("dt.author");
    let username = author_name_node
        .as_ref()
        .map(|dt| dt.text())
        .or_else(|| scope.first("a[href*='action=getinfo']").map(|a| a.text()))
        .filter(|name| !name.is_empty());

    if user_id.is_none() && username.is_none() {
        return None;
    }

    let role_classes = author_name_node.as_ref().map(|dt| dt.classes()).unwrap_or_default();
    let has_role = |role: &str| role_classes.iter().any(|class| class == role);

    let can_receive_private_messages = scope
        .first("ul.profilelinks")
        .map(|links| links.first("a[href*='private.php']").is_some());

    Some(AuthorInfo {
        user_id,
        username,
        regdate: extract_regdate(scope, regdates),
        custom_title_html: extract_custom_title(scope),
        avatar_url: extract_avatar_url(scope),
        is_administrator: has_role("role-admin"),
        is_moderator: has_role("role-mod") || has_role("role-supermod"),
        is_original_poster: has_role("op"),
        can_receive_private_messages,
    })
}

/// Numeric user id from the first place the forums put one in an author block.
pub fn extract_user_id(scope: &NodeRef) -> Option<String> {
    let from_link = |selector: &str| {
        scope
            .first(selector)
            .and_then(|a| a.attr("href"))
            .and_then(|href| numeric_query_param(&href, "userid"))
    };

    from_link("ul.profilelinks a[href*='userid=']")
        .or_else(|| {
            scope
                .all("[class*='userid-']")
                .into_iter()
                .find_map(|node| userid_from_classes(&node))
        })
        .or_else(|| from_link("a[href*='member.php'][href*='userid=']"))
        .or_else(|| {
            scope
                .first("input[name='userid']")
                .and_then(|input| input.attr("value"))
                .filter(|value| !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()))
        })
}

fn userid_from_classes(node: &NodeRef) -> Option<String> {
    node.classes().iter().find_map(|class| {
        USERID_CLASS_REGEX
            .captures(class)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_owned())
    })
}

/// Identity from a single user link, e.g. the author cell of a thread row.
pub fn extract_user_link(link: &NodeRef) -> UserRef {
    let user_id = link
        .attr("href")
        .and_then(|href| numeric_query_param(&href, "userid"));

    let username = Some(link.text()).filter(|name| !name.is_empty());

    UserRef { user_id, username }
}
