use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use twixel_types::models::{FeedTwix, Twix, TwixListItem};

use crate::Database;
use crate::models::{FeedRow, TwixListRow, TwixRow, UserRow, format_timestamp};

const TWIX_COLUMNS: &str = "t.id, t.title, t.content, t.created_at, t.twixester_id";

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, format_timestamp(created_at)),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Twixes --

    pub fn insert_twix(
        &self,
        id: &str,
        title: &str,
        content: &str,
        twixester_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO twixes (id, title, content, created_at, twixester_id) VALUES (?1, ?2, ?3, ?4, ?5)",
                (id, title, content, format_timestamp(created_at), twixester_id),
            )?;
            Ok(())
        })
    }

    pub fn get_twix(&self, id: &str) -> Result<Option<Twix>> {
        let row = self.with_conn(|conn| {
            let sql = format!("SELECT {TWIX_COLUMNS} FROM twixes t WHERE t.id = ?1");
            Ok(conn.query_row(&sql, [id], twix_row).optional()?)
        })?;
        row.map(TwixRow::into_twix).transpose()
    }

    /// Returns whether a row was actually removed.
    pub fn delete_twix(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM twixes WHERE id = ?1", [id])? > 0))
    }

    pub fn count_twixes(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM twixes", [], |r| r.get(0))?;
            Ok(count as u64)
        })
    }

    /// Row number `offset` in insertion order, if there is one.
    pub fn get_twix_at_offset(&self, offset: u64) -> Result<Option<Twix>> {
        let row = self.with_conn(|conn| {
            let sql = format!("SELECT {TWIX_COLUMNS} FROM twixes t ORDER BY t.rowid LIMIT 1 OFFSET ?1");
            Ok(conn.query_row(&sql, [offset as i64], twix_row).optional()?)
        })?;
        row.map(TwixRow::into_twix).transpose()
    }

    /// Newest first.
    pub fn list_recent_twixes(&self, limit: u32) -> Result<Vec<TwixListItem>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title FROM twixes ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(TwixListRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(TwixListRow::into_item).collect()
    }

    /// Newest first, each joined with its author's username.
    pub fn recent_twixes_with_authors(&self, limit: u32) -> Result<Vec<FeedTwix>> {
        let rows = self.with_conn(|conn| {
            // JOIN users to fetch the username in a single query
            let sql = format!(
                "SELECT {TWIX_COLUMNS}, u.username
                 FROM twixes t
                 JOIN users u ON t.twixester_id = u.id
                 ORDER BY t.created_at DESC, t.rowid DESC
                 LIMIT ?1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(FeedRow {
                        twix: twix_row(row)?,
                        twixester_username: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(FeedRow::into_feed_twix).collect()
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, username, password, created_at FROM users WHERE {column} = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn twix_row(row: &Row<'_>) -> rusqlite::Result<TwixRow> {
    Ok(TwixRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        twixester_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn db_with_user(username: &str) -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, username, "hash", Utc::now()).unwrap();
        (db, id)
    }

    fn add_twix(db: &Database, author: &str, title: &str, at: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_twix(&id, title, "some long content", author, at).unwrap();
        id
    }

    #[test]
    fn user_lookup_by_name_and_id() {
        let (db, id) = db_with_user("kody");

        let by_name = db.get_user_by_username("kody").unwrap().unwrap();
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.password, "hash");

        let by_id = db.get_user_by_id(&id).unwrap().unwrap();
        assert_eq!(by_id.username, "kody");

        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (db, _) = db_with_user("kody");
        let other = Uuid::new_v4().to_string();
        assert!(db.create_user(&other, "kody", "hash", Utc::now()).is_err());
    }

    #[test]
    fn twix_requires_existing_author() {
        let db = Database::open_in_memory().unwrap();
        let result = db.insert_twix(
            &Uuid::new_v4().to_string(),
            "title",
            "some long content",
            &Uuid::new_v4().to_string(),
            Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(db.count_twixes().unwrap(), 0);
    }

    #[test]
    fn recent_list_is_newest_first_and_limited() {
        let (db, author) = db_with_user("kody");
        let t0 = Utc::now();
        let ids: Vec<String> = (0..7)
            .map(|i| add_twix(&db, &author, &format!("twix {i}"), t0 + Duration::seconds(i)))
            .collect();

        let items = db.list_recent_twixes(5).unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].id.to_string(), ids[6]);
        assert_eq!(items[4].id.to_string(), ids[2]);
    }

    #[test]
    fn feed_rows_carry_author_name() {
        let (db, author) = db_with_user("kody");
        let t0 = Utc::now();
        let older = add_twix(&db, &author, "older", t0);
        let newer = add_twix(&db, &author, "newer", t0 + Duration::minutes(1));

        let feed = db.recent_twixes_with_authors(100).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].twix.id.to_string(), newer);
        assert_eq!(feed[1].twix.id.to_string(), older);
        assert!(feed.iter().all(|f| f.twixester_username == "kody"));
    }

    #[test]
    fn offset_lookup_and_delete() {
        let (db, author) = db_with_user("kody");
        let first = add_twix(&db, &author, "first", Utc::now());
        let second = add_twix(&db, &author, "second", Utc::now());

        assert_eq!(db.count_twixes().unwrap(), 2);
        assert_eq!(db.get_twix_at_offset(0).unwrap().unwrap().id.to_string(), first);
        assert_eq!(db.get_twix_at_offset(1).unwrap().unwrap().id.to_string(), second);
        assert!(db.get_twix_at_offset(2).unwrap().is_none());

        assert!(db.delete_twix(&first).unwrap());
        assert!(!db.delete_twix(&first).unwrap());
        assert!(db.get_twix(&first).unwrap().is_none());
        assert_eq!(db.count_twixes().unwrap(), 1);
    }
}
