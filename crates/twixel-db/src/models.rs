/// Database row types. These map directly to SQLite rows.
/// Distinct from twixel-types models to keep the DB layer independent.
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use twixel_types::models::{FeedTwix, Twix, TwixListItem, User};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct TwixRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub twixester_id: String,
}

pub struct TwixListRow {
    pub id: String,
    pub title: String,
}

pub struct FeedRow {
    pub twix: TwixRow,
    pub twixester_username: String,
}

/// Timestamps are stored as RFC 3339 UTC with a fixed microsecond precision,
/// so lexicographic order in SQL equals chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("corrupt timestamp '{raw}'"))?
        .with_timezone(&Utc))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().with_context(|| format!("corrupt id '{raw}'"))
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)?,
            username: self.username,
        })
    }
}

impl TwixRow {
    pub fn into_twix(self) -> Result<Twix> {
        Ok(Twix {
            id: parse_id(&self.id)?,
            twixester_id: parse_id(&self.twixester_id)?,
            created_at: parse_timestamp(&self.created_at)?,
            title: self.title,
            content: self.content,
        })
    }
}

impl TwixListRow {
    pub fn into_item(self) -> Result<TwixListItem> {
        Ok(TwixListItem {
            id: parse_id(&self.id)?,
            title: self.title,
        })
    }
}

impl FeedRow {
    pub fn into_feed_twix(self) -> Result<FeedTwix> {
        Ok(FeedTwix {
            twix: self.twix.into_twix()?,
            twixester_username: self.twixester_username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_sort_lexicographically() {
        let earlier = Utc.with_ymd_and_hms(2022, 1, 9, 23, 59, 59).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(parse_timestamp(&format_timestamp(later)).unwrap(), later);
    }

    #[test]
    fn corrupt_rows_are_rejected() {
        let row = TwixRow {
            id: "not-a-uuid".into(),
            title: "t".into(),
            content: "c".into(),
            created_at: format_timestamp(Utc::now()),
            twixester_id: Uuid::new_v4().to_string(),
        };
        assert!(row.into_twix().is_err());
    }
}
