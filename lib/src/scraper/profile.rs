use kuchikiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DateParsers, ResolvedScraperConfig};
use crate::extract::*;
use crate::html::NodeExt;

use super::*;

static GENDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)claims to be an? ([\w-]+)").unwrap());

/// Containers holding the profile, narrowest first.
const PROFILE_SCOPE_SELECTORS: &[&str] = &["td.info", "div#content"];

pub struct ProfileScraper {
    dates: DateParsers,
}

impl ProfileScraper {
    pub fn new(config: &ResolvedScraperConfig) -> Self {
        Self {
            dates: config.dates.clone(),
        }
    }

    fn additional(&self, scope: &NodeRef, label: &str) -> Option<NodeRef> {
        let dl = scope.first("dl.additional")?;

        definition_value(&dl, label)
    }

    fn additional_text(&self, scope: &NodeRef, label: &str) -> Option<String> {
        self.additional(scope, label)
            .map(|dd| dd.text())
            .filter(|text| !text.is_empty())
    }
}

/// Contact entry from `dl.contacts`, e.g. `<dt class="aim">`. Entries the user left blank
/// are rendered as `<span class="unset">` and read as absent.
fn contact(scope: &NodeRef, class_name: &str) -> Option<NodeRef> {
    let dl = scope.first("dl.contacts")?;

    let dt = dl
        .child_elements()
        .into_iter()
        .find(|child| child.is_element("dt") && child.has_class(class_name))?;

    let dd = dt.following_siblings().find(|sibling| sibling.is_element("dd"))?;

    if dd.first("span.unset").is_some() {
        None
    } else {
        Some(dd)
    }
}

fn contact_text(scope: &NodeRef, class_name: &str) -> Option<String> {
    contact(scope, class_name)
        .map(|dd| dd.text())
        .filter(|text| !text.is_empty())
}

impl Scraper for ProfileScraper {
    type Output = UserProfile;

    fn scrape(&self, root: &NodeRef) -> Result<UserProfile, ScrapeError> {
        check_site_failure(root)?;

        let scope = PROFILE_SCOPE_SELECTORS
            .iter()
            .find_map(|selector| root.first(selector))
            .unwrap_or_else(|| root.clone());

        let author = extract_author(&scope, &self.dates.regdate)
            .ok_or_else(|| ScrapeError::EntityNotFound("user profile".into()))?;

        let mut profile = author.to_profile();

        if profile.user_id.is_none() {
            profile.user_id = extract_user_id(root);
        }

        let paragraphs = scope.all("p");

        profile.gender = paragraphs
            .first()
            .and_then(|p| {
                GENDER_REGEX
                    .captures(&p.text())
                    .and_then(|captures| captures.get(1))
                    .map(|m| Gender::from_claim(m.as_str()))
            })
            .unwrap_or_default();

        profile.about_me_html = paragraphs
            .get(1)
            .map(|p| p.inner_html().trim().to_owned())
            .filter(|html| !html.is_empty());

        profile.aim_name = contact_text(&scope, "aim");
        profile.icq_name = contact_text(&scope, "icq");
        profile.yahoo_name = contact_text(&scope, "yahoo");
        profile.homepage_url = contact(&scope, "homepage")
            .and_then(|dd| dd.first("a[href]").and_then(|a| a.attr("href")).or_else(|| Some(dd.text())))
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty());

        if profile.can_receive_private_messages.is_none() {
            profile.can_receive_private_messages = scope
                .first("dl.contacts")
                .map(|_| contact(&scope, "pm").is_some());
        }

        if profile.avatar_url.is_none() {
            profile.avatar_url = extract_avatar_url(root);
        }

        profile.post_count = extract_post_count(&scope);
        profile.post_rate = self
            .additional_text(&scope, "Post Rate")
            .map(|rate| rate.trim_end_matches("per day").trim().to_owned());
        profile.last_post_date = self.additional_text(&scope, "Last Post").and_then(|text| {
            self.dates
                .post_date
                .parse(&text)
                .or_else(|| self.dates.regdate.parse(&text))
        });
        profile.location = self.additional_text(&scope, "Location");
        profile.interests = self.additional_text(&scope, "Interests");
        profile.occupation = self.additional_text(&scope, "Occupation");

        Ok(profile)
    }
}
