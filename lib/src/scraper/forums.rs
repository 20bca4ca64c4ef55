use std::collections::HashSet;

use kuchikiki::NodeRef;
use tracing::debug;

use crate::extract::numeric_query_param;
use crate::html::NodeExt;

use super::*;

/// The two ways the forums lay out their forum list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ForumListShape {
    /// The "forum jump" `<select name="forumid">`. Categories are `<optgroup>`s and
    /// subforums are indented with dashes or non-breaking spaces.
    Dropdown,
    /// Nested `<ul>`/`<li>` lists. Categories are `li.category` items or headings.
    NestedList,
}

const DROPDOWN_SELECTOR: &str = "select[name='forumid']";
const NESTED_LIST_SELECTOR: &str = "ul#forums, ul.forums";

/// Indentation characters worth half a level each.
const INDENT_CHARS: &[char] = &['-', '\u{a0}', ' '];

pub struct ForumHierarchyScraper {
    shape: Option<ForumListShape>,
}

#[derive(Debug)]
enum Entry {
    Category { id: String, name: String },
    Forum { id: String, name: String, depth: usize },
}

struct FlatForum {
    id: String,
    name: String,
    children: Vec<usize>,
}

struct FlatCategory {
    id: String,
    name: String,
    roots: Vec<usize>,
}

impl ForumHierarchyScraper {
    /// With no shape given, the shape is picked by whichever container the page has.
    pub fn new(shape: Option<ForumListShape>) -> Self {
        Self { shape }
    }

    fn detect_shape(root: &NodeRef) -> Option<ForumListShape> {
        if root.first(DROPDOWN_SELECTOR).is_some() {
            Some(ForumListShape::Dropdown)
        } else if root.first(NESTED_LIST_SELECTOR).is_some() {
            Some(ForumListShape::NestedList)
        } else {
            None
        }
    }
}

impl Scraper for ForumHierarchyScraper {
    type Output = ForumHierarchy;

    fn scrape(&self, root: &NodeRef) -> Result<ForumHierarchy, ScrapeError> {
        check_site_failure(root)?;

        let shape = self
            .shape
            .or_else(|| Self::detect_shape(root))
            .ok_or_else(|| ScrapeError::MissingContainer("forum list".into()))?;

        let entries = match shape {
            ForumListShape::Dropdown => {
                let select = root
                    .first(DROPDOWN_SELECTOR)
                    .ok_or_else(|| ScrapeError::MissingContainer("forum jump dropdown".into()))?;

                dropdown_entries(&select)
            }
            ForumListShape::NestedList => {
                let list = root
                    .first(NESTED_LIST_SELECTOR)
                    .ok_or_else(|| ScrapeError::MissingContainer("nested forum list".into()))?;

                nested_list_entries(&list)
            }
        };

        Ok(build_hierarchy(entries))
    }
}

fn dropdown_entries(select: &NodeRef) -> Vec<Entry> {
    let mut entries = Vec::new();

    for node in select.all("optgroup, option") {
        if node.is_element("optgroup") {
            let name = node.attr("label").map(|label| label.trim().to_owned()).unwrap_or_default();
            let id = node
                .attr("data-id")
                .or_else(|| node.attr("id"))
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| name.clone());

            entries.push(Entry::Category { id, name });
            continue;
        }

        let id = match node.attr("value").map(|value| value.trim().to_owned()) {
            Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) && value != "0" => value,
            _ => {
                skipped("dropdown option", "no forum id");
                continue;
            }
        };

        let raw_text = node.text_contents();
        let trimmed = raw_text.trim_start_matches(['\n', '\r', '\t']);
        let name_start = trimmed.trim_start_matches(INDENT_CHARS);
        let indent = trimmed[..trimmed.len() - name_start.len()].chars().count();

        entries.push(Entry::Forum {
            id,
            name: name_start.trim().to_owned(),
            depth: indent / 2,
        });
    }

    entries
}

fn is_category_item(node: &NodeRef) -> bool {
    node.is_element("li") && node.has_class("category")
}

fn nested_list_entries(list: &NodeRef) -> Vec<Entry> {
    let mut entries = Vec::new();

    for node in list.all("li, h2, h3") {
        // Stop counting ancestors at the list itself.
        let ancestors: Vec<NodeRef> = node.ancestors().take_while(|ancestor| ancestor != list).collect();

        if is_category_item(&node) {
            let heading = node.first("h2, h3");
            let name = heading
                .as_ref()
                .map(|heading| heading.text())
                .unwrap_or_else(|| node.last_text_child().unwrap_or_default());
            let id = node
                .attr("data-id")
                .or_else(|| {
                    heading
                        .as_ref()
                        .and_then(|heading| heading.first("a[href*='forumid=']"))
                        .and_then(|a| a.attr("href"))
                        .and_then(|href| numeric_query_param(&href, "forumid"))
                })
                .unwrap_or_else(|| name.clone());

            entries.push(Entry::Category { id, name });
        } else if node.is_element("h2") || node.is_element("h3") {
            // Headings inside a category item were handled with the item.
            if ancestors.iter().any(is_category_item) {
                continue;
            }

            let name = node.text();
            entries.push(Entry::Category { id: name.clone(), name });
        } else {
            // The forum's own link is the first one not belonging to a nested item.
            let link = node.all("a[href*='forumid=']").into_iter().find(|a| {
                a.ancestors().find(|ancestor| ancestor.is_element("li")).as_ref() == Some(&node)
            });

            let (id, name) = match link.and_then(|a| {
                let id = numeric_query_param(&a.attr("href")?, "forumid")?;
                Some((id, a.text()))
            }) {
                Some(forum) => forum,
                None => {
                    skipped("forum list item", "no forum link");
                    continue;
                }
            };

            let depth = ancestors
                .iter()
                .filter(|ancestor| ancestor.is_element("li") && !is_category_item(ancestor))
                .count();

            entries.push(Entry::Forum { id, name, depth });
        }
    }

    entries
}

fn build_hierarchy(entries: Vec<Entry>) -> ForumHierarchy {
    let mut forums: Vec<FlatForum> = Vec::new();
    let mut categories: Vec<FlatCategory> = Vec::new();
    let mut current_category: Option<usize> = None;
    let mut ancestors: Vec<usize> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for entry in entries {
        match entry {
            Entry::Category { id, name } => {
                categories.push(FlatCategory {
                    id,
                    name,
                    roots: Vec::new(),
                });
                current_category = Some(categories.len() - 1);
                ancestors.clear();
            }
            Entry::Forum { id, name, depth } => {
                if !seen_ids.insert(id.clone()) {
                    skipped("forum", "duplicate forum id");
                    continue;
                }

                let category = match current_category {
                    Some(category) => category,
                    None => {
                        debug!("Forum {id} appears before any category");

                        categories.push(FlatCategory {
                            id: UNCATEGORIZED_ID.to_owned(),
                            name: "Uncategorized".to_owned(),
                            roots: Vec::new(),
                        });
                        current_category = Some(categories.len() - 1);

                        categories.len() - 1
                    }
                };

                // Deeper entries than the stack allows hang off the deepest known ancestor.
                ancestors.truncate(depth);

                let index = forums.len();
                forums.push(FlatForum {
                    id,
                    name,
                    children: Vec::new(),
                });

                match ancestors.last() {
                    Some(&parent) => forums[parent].children.push(index),
                    None => categories[category].roots.push(index),
                }

                ancestors.push(index);
            }
        }
    }

    fn build_node(forums: &[FlatForum], index: usize, position: usize, parent_id: Option<&str>) -> ForumNode {
        let forum = &forums[index];

        ForumNode {
            id: forum.id.clone(),
            name: forum.name.clone(),
            index: position as u32,
            parent_id: parent_id.map(str::to_owned),
            children: forum
                .children
                .iter()
                .enumerate()
                .map(|(position, &child)| build_node(forums, child, position, Some(&forum.id)))
                .collect(),
        }
    }

    ForumHierarchy {
        categories: categories
            .into_iter()
            .enumerate()
            .map(|(position, category)| Category {
                forums: category
                    .roots
                    .iter()
                    .enumerate()
                    .map(|(position, &root)| build_node(&forums, root, position, None))
                    .collect(),
                id: category.id,
                name: category.name,
                index: position as u32,
            })
            .collect(),
    }
}
