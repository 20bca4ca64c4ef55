use kuchikiki::NodeRef;

use crate::config::ResolvedScraperConfig;
use crate::date::CompoundDateParser;
use crate::extract::*;
use crate::html::NodeExt;

use super::*;

const LEPERS_TABLE_SELECTOR: &str = "table.standard";

/// Columns of a Leper's Colony row: type, date, jerk, reason, requested by, approved by.
const MIN_CELLS: usize = 4;

pub struct LepersColonyScraper {
    dates: CompoundDateParser,
}

impl LepersColonyScraper {
    pub fn new(config: &ResolvedScraperConfig) -> Self {
        Self {
            dates: config.dates.punishment.clone(),
        }
    }

    fn punishment_from_row(&self, cells: &[NodeRef]) -> Option<Punishment> {
        let jerk = user_in_cell(&cells[2]);

        if jerk.is_empty() {
            skipped("punishment row", "no punished user");
            return None;
        }

        let post_id = cells[0]
            .first("a[href*='postid=']")
            .and_then(|a| a.attr("href"))
            .and_then(|href| numeric_query_param(&href, "postid"));

        Some(Punishment {
            kind: PunishmentKind::from_label(&cells[0].text()),
            date: self.dates.parse(&cells[1].text()),
            jerk,
            moderator: cells.get(4).map(user_in_cell).filter(|user| !user.is_empty()),
            admin: cells.get(5).map(user_in_cell).filter(|user| !user.is_empty()),
            reason_html: cells[3].inner_html().trim().to_owned(),
            post_id,
        })
    }
}

/// User linked from a cell, or just the cell's text when the name isn't a link.
fn user_in_cell(cell: &NodeRef) -> UserRef {
    match cell.first("a[href*='userid=']") {
        Some(link) => extract_user_link(&link),
        None => UserRef {
            user_id: None,
            username: Some(cell.text()).filter(|name| !name.is_empty()),
        },
    }
}

impl Scraper for LepersColonyScraper {
    type Output = Vec<Punishment>;

    fn scrape(&self, root: &NodeRef) -> Result<Vec<Punishment>, ScrapeError> {
        check_site_failure(root)?;

        let table = root
            .first(LEPERS_TABLE_SELECTOR)
            .ok_or_else(|| ScrapeError::MissingContainer("punishment list".into()))?;

        let punishments = table
            .all("tr")
            .iter()
            .filter_map(|row| {
                let cells = row.all("td");

                // Header rows only have <th>
                if cells.is_empty() {
                    return None;
                }

                if cells.len() < MIN_CELLS {
                    skipped("punishment row", "too few cells");
                    return None;
                }

                self.punishment_from_row(&cells)
            })
            .collect();

        Ok(punishments)
    }
}
