use kuchikiki::NodeRef;
use url::Url;

use crate::config::ResolvedScraperConfig;
use crate::extract::*;
use crate::html::NodeExt;

use super::*;

const CONTROL_SELECTOR: &str = "input, select, textarea, button";
const TAG_PICKER_SELECTOR: &str = "div.posticon";
const PRIMARY_TAG_NAME: &str = "iconid";
const DEFAULT_ENCODING_TYPE: &str = "application/x-www-form-urlencoded";

/// How many ancestors of a tag radio are searched for its image.
const TAG_IMAGE_SEARCH_DEPTH: usize = 3;

pub struct FormScraper {
    base_url: Url,
}

impl FormScraper {
    pub fn new(config: &ResolvedScraperConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    /// The document's own `<base href>` wins over the configured base URL.
    fn document_base(&self, root: &NodeRef) -> Url {
        root.first("base[href]")
            .and_then(|base| base.attr("href"))
            .and_then(|href| resolve(&self.base_url, &href))
            .unwrap_or_else(|| self.base_url.clone())
    }

    fn describe(&self, form: &NodeRef, base: &Url) -> FormDescriptor {
        let mut descriptor = FormDescriptor {
            name: form.attr("name").or_else(|| form.attr("id")).filter(|name| !name.is_empty()),
            method: FormMethod::from_attr(form.attr("method").as_deref()),
            // A form without an action submits to the document base.
            submission_url: match form.attr("action").filter(|action| !action.trim().is_empty()) {
                Some(action) => resolve(base, &action),
                None => Some(base.clone()),
            },
            encoding_type: form
                .attr("enctype")
                .map(|enctype| enctype.trim().to_owned())
                .filter(|enctype| !enctype.is_empty())
                .unwrap_or_else(|| DEFAULT_ENCODING_TYPE.to_owned()),
            ..Default::default()
        };

        for control in form.all(CONTROL_SELECTOR) {
            add_control(&mut descriptor, &control);
        }

        descriptor
    }
}

fn add_control(descriptor: &mut FormDescriptor, control: &NodeRef) {
    let name = control.attr("name").unwrap_or_default();
    let value = control.attr("value");

    if control.is_element("textarea") {
        if !name.is_empty() {
            descriptor.text_fields.push(FormItem {
                name,
                value: control.text_contents(),
            });
        }
        return;
    }

    if control.is_element("select") {
        if !name.is_empty() {
            let value = selected_option_value(control).unwrap_or_default();
            descriptor.select_fields.push(FormItem { name, value });
        }
        return;
    }

    if control.is_element("button") {
        let button_type = control.attr("type").map(|t| t.trim().to_lowercase());

        if matches!(button_type.as_deref(), None | Some("submit")) {
            descriptor.submit_buttons.push(FormItem {
                name,
                value: value.unwrap_or_default(),
            });
        }
        return;
    }

    let input_type = control
        .attr("type")
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_else(|| "text".to_owned());

    match input_type.as_str() {
        "submit" | "image" => {
            let default_value = if input_type == "submit" { "Submit" } else { "" };

            descriptor.submit_buttons.push(FormItem {
                name,
                value: value.unwrap_or_else(|| default_value.to_owned()),
            });
        }
        "reset" | "button" => (),
        _ if name.is_empty() => skipped("form control", "no name"),
        "hidden" => descriptor.hidden_fields.push(FormItem {
            name,
            value: value.unwrap_or_default(),
        }),
        "checkbox" => descriptor.checkbox_fields.push(FormCheckbox {
            name,
            value: value.unwrap_or_else(|| "on".to_owned()),
            checked: control.attr("checked").is_some(),
        }),
        "radio" if is_in_tag_picker(control) => add_tag_choice(descriptor, control, name, value),
        "radio" => descriptor.radio_buttons.push(FormCheckbox {
            name,
            value: value.unwrap_or_else(|| "on".to_owned()),
            checked: control.attr("checked").is_some(),
        }),
        "file" => descriptor.file_field_names.push(name),
        _ => descriptor.text_fields.push(FormItem {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}

fn selected_option_value(select: &NodeRef) -> Option<String> {
    let options = select.all("option");
    let option = options
        .iter()
        .find(|option| option.attr("selected").is_some())
        .or_else(|| options.first())?;

    Some(option.attr("value").unwrap_or_else(|| option.text()))
}

fn is_in_tag_picker(radio: &NodeRef) -> bool {
    radio.ancestors().any(|ancestor| ancestor.matches(TAG_PICKER_SELECTOR))
}

fn add_tag_choice(descriptor: &mut FormDescriptor, radio: &NodeRef, name: String, value: Option<String>) {
    let key = match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
        Some(key) => key,
        None => {
            skipped("thread tag", "no value");
            return;
        }
    };

    let choice = ThreadTagChoice {
        key: key.clone(),
        image_name: tag_image_name(radio).unwrap_or_default(),
    };
    let checked = radio.attr("checked").is_some();

    let (tag_key, choices, selected) = if name == PRIMARY_TAG_NAME {
        (
            &mut descriptor.thread_tag_key,
            &mut descriptor.thread_tag_choices,
            &mut descriptor.selected_thread_tag,
        )
    } else {
        (
            &mut descriptor.secondary_thread_tag_key,
            &mut descriptor.secondary_thread_tag_choices,
            &mut descriptor.selected_secondary_thread_tag,
        )
    };

    if tag_key.is_none() {
        *tag_key = Some(name);
    }
    choices.push(choice);

    if checked {
        *selected = Some(key);
    }
}

/// Image next to a tag radio: inside the closest wrapper holding only this radio, or in the
/// siblings that follow it up to the next input.
fn tag_image_name(radio: &NodeRef) -> Option<String> {
    for ancestor in radio.ancestors().take(TAG_IMAGE_SEARCH_DEPTH) {
        if ancestor.all("input[type='radio']").len() != 1 {
            break;
        }

        if let Some(src) = ancestor.first("img[src]").and_then(|img| img.attr("src")) {
            return icon_image_name(&src);
        }
    }

    radio
        .following_siblings()
        .take_while(|sibling| !sibling.matches("input"))
        .find_map(|sibling| sibling.first("img[src]"))
        .and_then(|img| img.attr("src"))
        .and_then(|src| icon_image_name(&src))
}

impl Scraper for FormScraper {
    type Output = Vec<FormDescriptor>;

    fn scrape(&self, root: &NodeRef) -> Result<Vec<FormDescriptor>, ScrapeError> {
        check_site_failure(root)?;

        let base = self.document_base(root);

        Ok(root.all("form").iter().map(|form| self.describe(form, &base)).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::html;

    use super::*;

    const NEW_THREAD: &'static str = r#"<html><head><base href="https://forums.somethingawful.com/"></head><body>
<form name="vbform" action=" newthread.php " method="post" enctype="multipart/form-data">
    <input type="hidden" name="action" value="postthread">
    <input type="hidden" name="forumid" value="219">
    <input type="hidden" name="formkey" value="0123456789abcdef">
    <div class="posticon">
        <div><input type="radio" name="iconid" value="0" checked><img src="https://fi.somethingawful.com/images/shitpost.gif"></div>
        <div><input type="radio" name="iconid" value="692"><label><img src="https://fi.somethingawful.com/forums/posticons/icon-37-selling.gif"></label></div>
        <input type="radio" name="tma_ama" value="1"><img src="https://fi.somethingawful.com/ama.gif">
        <input type="radio" name="tma_ama" value="2" checked><img src="https://fi.somethingawful.com/tma.gif">
    </div>
    <input type="text" name="subject" value="">
    <textarea name="message">Hello</textarea>
    <select name="prefix"><option value="">None</option><option value="3" selected>Trade</option></select>
    <input type="radio" name="visibility" value="public" checked>
    <input type="checkbox" name="parseurl" value="yes" checked>
    <input type="checkbox" name="bookmark">
    <input type="file" name="attachment">
    <input type="submit" name="submit" value="Submit New Thread">
    <input type="submit" name="preview" value="Preview Post">
    <input type="reset" value="Clear">
</form>
</body></html>"#;

    const SEARCH: &'static str = r#"<html><body>
<form action="/query.php"><input name="q"><button>Go</button></form>
</body></html>"#;

    #[test]
    fn new_thread_form() {
        let root = html::parse_string(NEW_THREAD);

        let forms = FormScraper::new(&ResolvedScraperConfig::default()).scrape(&root).unwrap();
        assert_eq!(forms.len(), 1);

        let form = &forms[0];
        assert_eq!(form.name.as_deref(), Some("vbform"));
        assert_eq!(form.method, FormMethod::Post);
        assert_eq!(
            form.submission_url.as_ref().map(|url| url.as_str()),
            Some("https://forums.somethingawful.com/newthread.php")
        );
        assert_eq!(form.encoding_type, "multipart/form-data");
        assert_eq!(form.hidden_value("formkey"), Some("0123456789abcdef"));
        assert_eq!(form.hidden_fields.len(), 3);

        assert_eq!(form.thread_tag_key.as_deref(), Some("iconid"));
        assert_eq!(
            form.thread_tag_choices,
            vec![
                ThreadTagChoice {
                    key: "0".to_owned(),
                    image_name: "shitpost".to_owned(),
                },
                ThreadTagChoice {
                    key: "692".to_owned(),
                    image_name: "icon-37-selling".to_owned(),
                },
            ]
        );
        assert_eq!(form.selected_thread_tag.as_deref(), Some("0"));
        assert_eq!(form.secondary_thread_tag_key.as_deref(), Some("tma_ama"));
        assert_eq!(
            form.secondary_thread_tag_choices
                .iter()
                .map(|choice| choice.image_name.as_str())
                .collect::<Vec<_>>(),
            vec!["ama", "tma"]
        );
        assert_eq!(form.selected_secondary_thread_tag.as_deref(), Some("2"));

        let text_names: Vec<&str> = form.text_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(text_names, vec!["subject", "message"]);
        assert_eq!(form.text_fields[1].value, "Hello");
        assert_eq!(form.select_fields[0].value, "3");
        assert_eq!(form.radio_buttons.len(), 1);
        assert_eq!(
            form.checkbox_fields,
            vec![
                FormCheckbox {
                    name: "parseurl".to_owned(),
                    value: "yes".to_owned(),
                    checked: true,
                },
                FormCheckbox {
                    name: "bookmark".to_owned(),
                    value: "on".to_owned(),
                    checked: false,
                },
            ]
        );
        assert_eq!(form.file_field_names, vec!["attachment".to_owned()]);
        assert_eq!(form.submit_buttons.len(), 2);

        let parameters = form.recommended_parameters();
        assert!(parameters.contains(&("iconid".to_owned(), "0".to_owned())));
        assert!(parameters.contains(&("parseurl".to_owned(), "yes".to_owned())));
        assert!(!parameters.iter().any(|(name, _)| name == "bookmark"));
        assert_eq!(
            parameters.last(),
            Some(&("submit".to_owned(), "Submit New Thread".to_owned()))
        );
    }

    #[test]
    fn defaults_without_attributes() {
        let root = html::parse_string(SEARCH);

        let forms = FormScraper::new(&ResolvedScraperConfig::default()).scrape(&root).unwrap();
        let form = &forms[0];

        assert_eq!(form.name, None);
        assert_eq!(form.method, FormMethod::Get);
        assert_eq!(form.encoding_type, "application/x-www-form-urlencoded");
        assert_eq!(
            form.submission_url.as_ref().map(|url| url.as_str()),
            Some("https://forums.somethingawful.com/query.php")
        );
        assert_eq!(form.text_fields[0].name, "q");
        assert_eq!(form.submit_buttons.len(), 1);
        assert!(form.thread_tag_choices.is_empty());
    }

    #[test]
    fn forms_without_action_submit_to_the_base() {
        let root = html::parse_string(
            r#"<html><head><base href="https://forums.somethingawful.com/account.php"></head><body>
<form method="post"><input name="username"></form>
<form action="  " method="post"><input name="password"></form>
</body></html>"#,
        );

        let forms = FormScraper::new(&ResolvedScraperConfig::default()).scrape(&root).unwrap();

        assert_eq!(forms.len(), 2);
        for form in &forms {
            assert_eq!(
                form.submission_url.as_ref().map(|url| url.as_str()),
                Some("https://forums.somethingawful.com/account.php")
            );
        }
    }

    #[test]
    fn pages_without_forms_yield_nothing() {
        let root = html::parse_string("<html><body><p>No forms</p></body></html>");

        let forms = FormScraper::new(&ResolvedScraperConfig::default()).scrape(&root).unwrap();

        assert!(forms.is_empty());
    }
}
