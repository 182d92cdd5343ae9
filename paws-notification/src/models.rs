use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::notifications;

/// The channel a notification belongs to; clients group and badge by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Match,
    Playdate,
    Message,
    Update,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Playdate => "playdate",
            Self::Message => "message",
            Self::Update => "update",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(Self::Match),
            "playdate" => Ok(Self::Playdate),
            "message" => Ok(Self::Message),
            "update" => Ok(Self::Update),
            other => Err(format!("unknown notification category: {other}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub category: String,
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn categories_round_trip() {
        for category in [Category::Match, Category::Playdate, Category::Message, Category::Update] {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
        assert!(Category::from_str("email").is_err());
    }
}
