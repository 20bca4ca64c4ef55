use kuchikiki::{ElementData, NodeRef, Selectors};

/// Does the element carry every one of the given classes?
pub fn has_classes(data: &ElementData, class_names: &[&str]) -> bool {
    if let Some(class_attr) = data.attributes.borrow().get("class") {
        // Split classes into a vector of strings
        let classes: Vec<&str> = class_attr.split_whitespace().collect();

        class_names.iter().all(|name| classes.contains(name))
    } else {
        false
    }
}

/// Query and read helpers over Kuchiki nodes.
///
/// Every method is read-only. Selector methods include the node itself as a candidate,
/// same as `NodeRef::select`, and treat an unparseable selector as "no match".
pub trait NodeExt {
    fn first(&self, selector: &str) -> Option<NodeRef>;
    fn all(&self, selector: &str) -> Vec<NodeRef>;
    fn matches(&self, selector: &str) -> bool;

    fn is_element(&self, local_name: &str) -> bool;
    fn attr(&self, name: &str) -> Option<String>;
    fn has_class(&self, class_name: &str) -> bool;
    fn classes(&self) -> Vec<String>;

    /// Text content with runs of whitespace collapsed and the ends trimmed.
    fn text(&self) -> String;

    /// Trimmed content of the last non-blank text node directly under this node.
    fn last_text_child(&self) -> Option<String>;

    fn inner_html(&self) -> String;
    fn outer_html(&self) -> String;
    fn child_elements(&self) -> Vec<NodeRef>;
}

impl NodeExt for NodeRef {
    fn first(&self, selector: &str) -> Option<NodeRef> {
        self.select_first(selector).ok().map(|data| data.as_node().clone())
    }

    fn all(&self, selector: &str) -> Vec<NodeRef> {
        match self.select(selector) {
            Ok(selection) => selection.map(|data| data.as_node().clone()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn matches(&self, selector: &str) -> bool {
        let selectors = match Selectors::compile(selector) {
            Ok(selectors) => selectors,
            Err(_) => return false,
        };

        match self.clone().into_element_ref() {
            Some(element) => selectors.matches(&element),
            None => false,
        }
    }

    fn is_element(&self, local_name: &str) -> bool {
        self.as_element()
            .map(|data| data.name.local.as_ref() == local_name)
            .unwrap_or(false)
    }

    fn attr(&self, name: &str) -> Option<String> {
        let data = self.as_element()?;
        let attributes = data.attributes.borrow();

        attributes.get(name).map(str::to_owned)
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.as_element()
            .map(|data| has_classes(data, &[class_name]))
            .unwrap_or(false)
    }

    fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|class_attr| class_attr.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn text(&self) -> String {
        collapse_whitespace(&self.text_contents())
    }

    fn last_text_child(&self) -> Option<String> {
        self.children().rev().find_map(|child| {
            let text = child.as_text()?.borrow().clone();
            let text = collapse_whitespace(&text);

            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        })
    }

    fn inner_html(&self) -> String {
        self.children().map(|child| child.to_string()).collect()
    }

    fn outer_html(&self) -> String {
        self.to_string()
    }

    fn child_elements(&self) -> Vec<NodeRef> {
        self.children().filter(|child| child.as_element().is_some()).collect()
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
