//! User and content queries over a single checked-out connection.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, instrument};

use crate::domain::{split_legacy_list, Area, Badges, ContentItem, User};
use crate::error::AppError;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id: row.get(0)?,
    username: row.get(1)?,
    level: row.get(2)?,
    score: row.get(3)?,
    badges: row.get(4)?,
  })
}

fn find_user_by_name(conn: &Connection, username: &str) -> Result<Option<User>, AppError> {
  let user = conn
    .query_row(
      "SELECT id, username, level, score, badges FROM users WHERE username = ?1 ORDER BY id LIMIT 1",
      params![username],
      user_from_row,
    )
    .optional()?;
  Ok(user)
}

/// Fetch the user with this username, creating it at `start_level` if absent.
/// Looks up first, so tables without a UNIQUE username never gain duplicates here.
#[instrument(level = "debug", skip(conn))]
pub fn get_or_create_user(conn: &Connection, username: &str, start_level: u32) -> Result<User, AppError> {
  if let Some(user) = find_user_by_name(conn, username)? {
    return Ok(user);
  }
  conn.execute(
    "INSERT OR IGNORE INTO users (username, level, score, badges) VALUES (?1, ?2, 0, '')",
    params![username, start_level],
  )?;
  info!(target: "session", %username, level = start_level, "new learner created");
  find_user_by_name(conn, username)?.ok_or(AppError::Storage(rusqlite::Error::QueryReturnedNoRows))
}

pub fn find_user(conn: &Connection, id: i64) -> Result<Option<User>, AppError> {
  let user = conn
    .query_row(
      "SELECT id, username, level, score, badges FROM users WHERE id = ?1",
      params![id],
      user_from_row,
    )
    .optional()?;
  Ok(user)
}

/// Overwrite the mutable fields. Last writer wins.
#[instrument(level = "debug", skip(conn, badges), fields(badges = badges.len()))]
pub fn update_user(conn: &Connection, id: i64, score: u32, badges: &Badges, level: u32) -> Result<(), AppError> {
  conn.execute(
    "UPDATE users SET score = ?1, badges = ?2, level = ?3 WHERE id = ?4",
    params![score, badges, level, id],
  )?;
  Ok(())
}

/// First content row for the pair, by ascending id.
#[instrument(level = "debug", skip(conn))]
pub fn lookup_content(conn: &Connection, level: u32, area: Area) -> Result<Option<ContentItem>, AppError> {
  let row = conn
    .query_row(
      "SELECT id, level, area, question, options, answer, hint, instruction
       FROM content WHERE level = ?1 AND area = ?2 ORDER BY id LIMIT 1",
      params![level, area],
      |r| {
        Ok((
          ContentItem {
            id: r.get(0)?,
            level: r.get(1)?,
            area: r.get(2)?,
            question: r.get(3)?,
            options: Vec::new(),
            answer: r.get(5)?,
            hint: r.get(6)?,
            instruction: r.get(7)?,
          },
          r.get::<_, String>(4)?,
        ))
      },
    )
    .optional()?;

  match row {
    Some((mut item, options)) => {
      item.options = if options.trim_start().starts_with('[') {
        serde_json::from_str(&options)?
      } else {
        split_legacy_list(&options)
      };
      Ok(Some(item))
    }
    None => {
      debug!(target: "quiz", level, %area, "no content for pair");
      Ok(None)
    }
  }
}
