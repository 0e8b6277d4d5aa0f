//! Domain models: learners, quiz content, topic areas, difficulty and badges.

use std::{fmt, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Topic tag for quiz content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
  PhonologicalAwareness,
  Phonics,
  Vocabulary,
  Comprehension,
}

impl Default for Area {
  fn default() -> Self { Area::PhonologicalAwareness }
}

impl Area {
  pub const ALL: [Area; 4] = [
    Area::PhonologicalAwareness,
    Area::Phonics,
    Area::Vocabulary,
    Area::Comprehension,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Area::PhonologicalAwareness => "phonological_awareness",
      Area::Phonics => "phonics",
      Area::Vocabulary => "vocabulary",
      Area::Comprehension => "comprehension",
    }
  }

  /// Human heading, e.g. "Phonological Awareness".
  pub fn title(self) -> &'static str {
    match self {
      Area::PhonologicalAwareness => "Phonological Awareness",
      Area::Phonics => "Phonics",
      Area::Vocabulary => "Vocabulary",
      Area::Comprehension => "Comprehension",
    }
  }
}

impl fmt::Display for Area {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown area: {0}")]
pub struct UnknownArea(pub String);

impl FromStr for Area {
  type Err = UnknownArea;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Area::ALL
      .into_iter()
      .find(|a| a.as_str() == s)
      .ok_or_else(|| UnknownArea(s.to_string()))
  }
}

impl ToSql for Area {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    Ok(ToSqlOutput::from(self.as_str()))
  }
}

impl FromSql for Area {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
  }
}

/// How a question is presented. Derived from score on every read, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  /// Long-form instruction text, then the prompt.
  Instruction,
  /// Prompt with the hint appended.
  Guided,
  /// Prompt as-is.
  Standard,
}

/// Ordered list of earned badge names. Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Badges(Vec<String>);

impl Badges {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, badge: impl Into<String>) {
    self.0.push(badge.into());
  }

  pub fn contains(&self, badge: &str) -> bool {
    self.0.iter().any(|b| b == badge)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Column form: empty string when there are no badges, otherwise a JSON array.
  pub fn to_column(&self) -> Result<String, serde_json::Error> {
    if self.0.is_empty() {
      Ok(String::new())
    } else {
      serde_json::to_string(&self.0)
    }
  }

  /// Reads the JSON form, or the older comma-joined form (e.g. ",Faith Builder").
  pub fn from_column(raw: &str) -> Result<Self, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      Ok(Self::new())
    } else if trimmed.starts_with('[') {
      serde_json::from_str(trimmed).map(Self)
    } else {
      Ok(Self(split_legacy_list(trimmed)))
    }
  }
}

/// Comma-joined list as older databases stored it; empty segments are dropped.
pub fn split_legacy_list(raw: &str) -> Vec<String> {
  raw.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

impl<S: Into<String>> FromIterator<S> for Badges {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl ToSql for Badges {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    let encoded = self
      .to_column()
      .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    Ok(ToSqlOutput::from(encoded))
  }
}

impl FromSql for Badges {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    match value {
      ValueRef::Null => Ok(Self::new()),
      other => Badges::from_column(other.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e))),
    }
  }
}

/// A learner record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub level: u32,
  pub score: u32,
  pub badges: Badges,
}

impl User {
  pub fn progress(&self) -> Progress {
    Progress { level: self.level, score: self.score, badges: self.badges.clone() }
  }
}

/// The mutable part of a learner: what grading reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
  pub level: u32,
  pub score: u32,
  pub badges: Badges,
}

/// Immutable reference content, seeded at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
  pub id: i64,
  pub level: u32,
  pub area: Area,
  pub question: String,
  pub options: Vec<String>,
  pub answer: String,
  pub hint: String,
  pub instruction: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn area_parses_its_own_string_form() {
    for area in Area::ALL {
      assert_eq!(area.as_str().parse::<Area>().expect("parse"), area);
    }
    assert!("geometry".parse::<Area>().is_err());
  }

  #[test]
  fn empty_badges_use_empty_column() {
    assert_eq!(Badges::new().to_column().expect("encode"), "");
    assert!(Badges::from_column("").expect("decode").is_empty());
  }

  #[test]
  fn comma_joined_badges_still_read() {
    let b = Badges::from_column(",Faith Builder,Faith Builder").expect("decode");
    assert_eq!(b.iter().collect::<Vec<_>>(), vec!["Faith Builder", "Faith Builder"]);
    assert!(b.contains("Faith Builder"));
  }

  #[test]
  fn badges_keep_order_and_duplicates() {
    let mut b = Badges::new();
    b.push("Faith Builder");
    b.push("Early Reader");
    b.push("Faith Builder");
    let col = b.to_column().expect("encode");
    assert_eq!(col, r#"["Faith Builder","Early Reader","Faith Builder"]"#);
    let back = Badges::from_column(&col).expect("decode");
    assert_eq!(back.len(), 3);
    assert!(back.contains("Early Reader"));
    assert_eq!(back.iter().collect::<Vec<_>>(), vec!["Faith Builder", "Early Reader", "Faith Builder"]);
  }
}
