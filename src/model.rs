use derive_new::new;
use serde::{Deserialize, Serialize};

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RankEntry {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "viewCount")]
    pub views: i64,
}

/// The time horizon of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every view ever recorded.
    Lifetime,
    /// Views recorded during the current local calendar day.
    Today,
}

impl Scope {
    pub fn from_lifetime(is_lifetime: bool) -> Self {
        if is_lifetime {
            Scope::Lifetime
        } else {
            Scope::Today
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Lifetime => write!(f, "lifetime"),
            Scope::Today => write!(f, "today"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_entry_wire_names() {
        let entry = RankEntry::new("video10".to_string(), 3);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json, serde_json::json!({ "videoId": "video10", "viewCount": 3 }));
    }

    #[test]
    fn scope_from_flag() {
        assert_eq!(Scope::from_lifetime(true), Scope::Lifetime);
        assert_eq!(Scope::from_lifetime(false), Scope::Today);
    }
}
