use serde_derive::Serialize;
use url::Url;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    pub fn from_attr(method: Option<&str>) -> Self {
        match method.map(str::trim) {
            Some(method) if method.eq_ignore_ascii_case("post") => Self::Post,
            _ => Self::Get,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormItem {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormCheckbox {
    pub name: String,
    pub value: String,
    pub checked: bool,
}

/// One selectable thread tag in a tag picker.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ThreadTagChoice {
    pub key: String,
    pub image_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormDescriptor {
    pub name: Option<String>,
    pub method: FormMethod,
    pub submission_url: Option<Url>,
    pub encoding_type: String,
    pub hidden_fields: Vec<FormItem>,
    pub checkbox_fields: Vec<FormCheckbox>,
    pub radio_buttons: Vec<FormCheckbox>,
    pub text_fields: Vec<FormItem>,
    pub select_fields: Vec<FormItem>,
    pub submit_buttons: Vec<FormItem>,
    pub file_field_names: Vec<String>,
    pub thread_tag_key: Option<String>,
    pub thread_tag_choices: Vec<ThreadTagChoice>,
    pub selected_thread_tag: Option<String>,
    pub secondary_thread_tag_key: Option<String>,
    pub secondary_thread_tag_choices: Vec<ThreadTagChoice>,
    pub selected_secondary_thread_tag: Option<String>,
}

impl FormDescriptor {
    pub fn hidden_value(&self, name: &str) -> Option<&str> {
        self.hidden_fields
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.value.as_str())
    }

    /// Parameters a browser would submit if the form were sent untouched with its first button.
    pub fn recommended_parameters(&self) -> Vec<(String, String)> {
        let mut parameters: Vec<(String, String)> = Vec::new();

        parameters.extend(self.hidden_fields.iter().map(|f| (f.name.clone(), f.value.clone())));
        parameters.extend(self.text_fields.iter().map(|f| (f.name.clone(), f.value.clone())));
        parameters.extend(self.select_fields.iter().map(|f| (f.name.clone(), f.value.clone())));
        parameters.extend(
            self.checkbox_fields
                .iter()
                .chain(self.radio_buttons.iter())
                .filter(|f| f.checked)
                .map(|f| (f.name.clone(), f.value.clone())),
        );

        if let (Some(key), Some(selected)) = (&self.thread_tag_key, &self.selected_thread_tag) {
            parameters.push((key.clone(), selected.clone()));
        }

        if let (Some(key), Some(selected)) = (&self.secondary_thread_tag_key, &self.selected_secondary_thread_tag) {
            parameters.push((key.clone(), selected.clone()));
        }

        if let Some(submit) = self.submit_buttons.iter().find(|f| !f.name.is_empty()) {
            parameters.push((submit.name.clone(), submit.value.clone()));
        }

        parameters
    }
}
