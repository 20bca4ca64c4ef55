use serde_derive::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ForumNode {
    pub id: String,
    pub name: String,
    pub index: u32,
    pub parent_id: Option<String>,
    pub children: Vec<ForumNode>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub index: u32,
    pub forums: Vec<ForumNode>,
}

/// Id of the bucket that collects forums appearing before any category marker.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ForumHierarchy {
    pub categories: Vec<Category>,
}

impl ForumHierarchy {
    /// Every forum paired with the id of its category, parents before children.
    pub fn all_forums(&self) -> Vec<(&str, &ForumNode)> {
        fn walk<'a>(category_id: &'a str, nodes: &'a [ForumNode], out: &mut Vec<(&'a str, &'a ForumNode)>) {
            for node in nodes {
                out.push((category_id, node));
                walk(category_id, &node.children, out);
            }
        }

        let mut out = Vec::new();

        for category in &self.categories {
            walk(&category.id, &category.forums, &mut out);
        }

        out
    }
}
