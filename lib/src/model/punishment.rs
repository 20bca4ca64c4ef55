use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use super::UserRef;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PunishmentKind {
    Probation,
    Ban,
    Autoban,
    Permaban,
    Unknown,
}

impl PunishmentKind {
    /// Classify the text of a punishment's type cell. Longer words are checked first since
    /// "AUTOBAN" and "PERMABAN" both contain "BAN".
    pub fn from_label(label: &str) -> Self {
        let label = label.to_uppercase();

        if label.contains("PROBATION") {
            Self::Probation
        } else if label.contains("AUTOBAN") {
            Self::Autoban
        } else if label.contains("PERMABAN") || label.contains("PERMANENT") {
            Self::Permaban
        } else if label.contains("BAN") {
            Self::Ban
        } else {
            Self::Unknown
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Punishment {
    pub kind: PunishmentKind,
    pub date: Option<DateTime<Utc>>,
    pub jerk: UserRef,
    pub moderator: Option<UserRef>,
    pub admin: Option<UserRef>,
    pub reason_html: String,
    pub post_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punishment_vocabulary() {
        assert_eq!(PunishmentKind::from_label("PROBATION"), PunishmentKind::Probation);
        assert_eq!(PunishmentKind::from_label("Autoban"), PunishmentKind::Autoban);
        assert_eq!(PunishmentKind::from_label("PERMABAN"), PunishmentKind::Permaban);
        assert_eq!(PunishmentKind::from_label("permanent ban"), PunishmentKind::Permaban);
        assert_eq!(PunishmentKind::from_label(" BAN "), PunishmentKind::Ban);
        assert_eq!(PunishmentKind::from_label("RAPSHEET"), PunishmentKind::Unknown);
    }
}
