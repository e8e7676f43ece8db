//! User database operations.

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::models::User;
use crate::store::{StoreResult, UserResolver};

impl Database {
    /// Add a user or update its display name.
    pub fn upsert_user(&self, user: &User) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (user_key, display_name) VALUES (?1, ?2)
            ON CONFLICT (user_key) DO UPDATE SET display_name = excluded.display_name
            "#,
            params![user.key, user.display_name],
        )?;
        Ok(())
    }
}

impl UserResolver for Database {
    fn get_user(&self, key: &str) -> StoreResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_key, display_name FROM users WHERE user_key = ?",
                [key],
                |row| {
                    Ok(User {
                        key: row.get(0)?,
                        display_name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let db = Database::open_in_memory().unwrap();

        db.upsert_user(&User::new("XWiki.jdoe", "J. Doe")).unwrap();
        db.upsert_user(&User::new("XWiki.jdoe", "Jane Doe")).unwrap();

        let user = db.get_user("XWiki.jdoe").unwrap().unwrap();
        assert_eq!(user.display_name, "Jane Doe");
        assert!(db.get_user("XWiki.nobody").unwrap().is_none());
    }
}
