//! Runtime settings: environment variables plus an optional TOML quiz config.
//!
//! See `QuizConfig` for the TOML schema. Every section is optional; a missing
//! or unreadable file falls back to the defaults.

use serde::Deserialize;
use tracing::{error, info, warn};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::{Area, ContentItem};
use crate::seeds::{seed_content, validate_item};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_PATH: &str = "biblelit_core.db";
const DEFAULT_POOL_SIZE: u32 = 4;

/// Thresholds that drive difficulty, badges and level progression.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgressRules {
  /// Scores at or above this are served with a hint.
  pub guided_from: u32,
  /// Scores at or above this are served plain.
  pub standard_from: u32,
  /// A correct answer landing on a positive multiple of this earns a badge.
  pub badge_every: u32,
  /// Reaching this score advances the level and resets score to 0.
  pub level_up_at: u32,
  pub badge_name: String,
}

impl Default for ProgressRules {
  fn default() -> Self {
    Self {
      guided_from: 3,
      standard_from: 7,
      badge_every: 5,
      level_up_at: 10,
      badge_name: "Faith Builder".into(),
    }
  }
}

impl ProgressRules {
  /// Returns why these rules cannot drive grading, or `None` when usable.
  pub fn problem(&self) -> Option<&'static str> {
    if self.level_up_at == 0 {
      return Some("level_up_at must be positive");
    }
    if self.badge_every == 0 {
      return Some("badge_every must be positive");
    }
    if self.guided_from > self.standard_from {
      return Some("guided_from must not exceed standard_from");
    }
    None
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub start_level: Option<i64>,
  #[serde(default)]
  pub progress: ProgressRules,
  #[serde(default)]
  pub content: Vec<ContentCfg>,
}

/// Content entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ContentCfg {
  pub id: i64,
  pub level: u32,
  pub area: Area,
  pub question: String,
  pub options: Vec<String>,
  pub answer: String,
  #[serde(default)] pub hint: String,
  #[serde(default)] pub instruction: String,
}

impl From<ContentCfg> for ContentItem {
  fn from(c: ContentCfg) -> Self {
    ContentItem {
      id: c.id,
      level: c.level,
      area: c.area,
      question: c.question,
      options: c.options,
      answer: c.answer,
      hint: c.hint,
      instruction: c.instruction,
    }
  }
}

/// Everything the process needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub database_path: String,
  pub pool_size: u32,
  /// Raw signing key bytes from SESSION_KEY, if provided and decodable.
  pub session_key: Option<Vec<u8>>,
  pub start_level: u32,
  pub rules: ProgressRules,
  /// Configured items first, then built-in seeds.
  pub content: Vec<ContentItem>,
}

impl Settings {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(DEFAULT_PORT);
    let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());
    let pool_size = std::env::var("DB_POOL_SIZE")
      .ok()
      .and_then(|p| p.parse::<u32>().ok())
      .filter(|n| *n > 0)
      .unwrap_or(DEFAULT_POOL_SIZE);
    let session_key = std::env::var("SESSION_KEY").ok().and_then(|raw| decode_session_key(&raw));

    let cfg = load_quiz_config_from_env().unwrap_or_default();
    Self::from_parts(port, database_path, pool_size, session_key, cfg)
  }

  pub fn from_parts(
    port: u16,
    database_path: String,
    pool_size: u32,
    session_key: Option<Vec<u8>>,
    cfg: QuizConfig,
  ) -> Self {
    let start_level = match cfg.start_level {
      None => 1,
      Some(l) if l >= 1 => u32::try_from(l).unwrap_or(1),
      Some(l) => {
        warn!(target: "biblelit", start_level = l, "start_level must be positive; using 1");
        1
      }
    };

    let mut content: Vec<ContentItem> = Vec::with_capacity(cfg.content.len() + 6);
    for c in cfg.content {
      let item = ContentItem::from(c);
      if let Some(reason) = validate_item(&item) {
        error!(target: "quiz", id = item.id, area = %item.area, level = item.level, reason, "Skipping content item");
        continue;
      }
      content.push(item);
    }
    content.extend(seed_content());

    let rules = match cfg.progress.problem() {
      None => cfg.progress,
      Some(reason) => {
        error!(target: "biblelit", reason, rules = ?cfg.progress, "Rejecting [progress] rules; using defaults");
        ProgressRules::default()
      }
    };

    Self {
      port,
      database_path,
      pool_size,
      session_key,
      start_level,
      rules,
      content,
    }
  }

  /// Settings for tests: in-memory friendly, built-in content only.
  #[cfg(test)]
  pub fn for_tests() -> Self {
    Self::from_parts(0, ":memory:".into(), 1, None, QuizConfig::default())
  }
}

fn decode_session_key(raw: &str) -> Option<Vec<u8>> {
  match STANDARD.decode(raw.trim()) {
    Ok(bytes) => Some(bytes),
    Err(e) => {
      error!(target: "session", error = %e, "SESSION_KEY is not valid base64; ignoring it");
      None
    }
  }
}

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "biblelit", %path, items = cfg.content.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "biblelit", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "biblelit", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"
start_level = 2

[progress]
badge_every = 3
badge_name = "Psalm Singer"

[[content]]
id = 100
level = 2
area = "vocabulary"
question = "What does 'grace' mean?"
options = ["favor", "anger", "sleep"]
answer = "Favor"
hint = "A gift you did not earn."

[[content]]
id = 101
level = 2
area = "phonics"
question = "Broken item"
options = ["a", "b"]
answer = "c"
"#;

  #[test]
  fn toml_overrides_and_defaults_merge() {
    let cfg = parse_quiz_config(SAMPLE).expect("parse");
    assert_eq!(cfg.start_level, Some(2));
    assert_eq!(cfg.progress.badge_every, 3);
    assert_eq!(cfg.progress.badge_name, "Psalm Singer");
    // untouched keys keep their defaults
    assert_eq!(cfg.progress.level_up_at, 10);
    assert_eq!(cfg.progress.guided_from, 3);
    assert_eq!(cfg.content.len(), 2);
  }

  #[test]
  fn invalid_items_are_skipped_and_seeds_follow_config() {
    let cfg = parse_quiz_config(SAMPLE).expect("parse");
    let s = Settings::from_parts(0, ":memory:".into(), 1, None, cfg);
    assert_eq!(s.start_level, 2);
    assert_eq!(s.content[0].id, 100);
    assert!(s.content.iter().all(|c| c.id != 101));
    assert_eq!(s.content.len(), 1 + seed_content().len());
  }

  fn rules_from(toml_src: &str) -> ProgressRules {
    let cfg = parse_quiz_config(toml_src).expect("parse");
    Settings::from_parts(0, ":memory:".into(), 1, None, cfg).rules
  }

  #[test]
  fn zero_level_up_threshold_is_rejected() {
    let rules = rules_from("[progress]\nlevel_up_at = 0");
    assert_eq!(rules, ProgressRules::default());
    // with the defaults back in place a wrong answer at 0 cannot level up
    let out = crate::logic::grade(
      &crate::domain::Progress { level: 1, score: 0, badges: Default::default() },
      Some("day"),
      "cat",
      &rules,
    );
    assert!(!out.leveled_up);
    assert_eq!(out.progress.level, 1);
  }

  #[test]
  fn zero_badge_interval_is_rejected() {
    assert_eq!(rules_from("[progress]\nbadge_every = 0"), ProgressRules::default());
  }

  #[test]
  fn inverted_difficulty_thresholds_are_rejected() {
    let rules = rules_from("[progress]\nguided_from = 8\nstandard_from = 4");
    assert_eq!(rules, ProgressRules::default());
  }

  #[test]
  fn valid_overrides_are_kept() {
    let rules = rules_from("[progress]\nguided_from = 2\nstandard_from = 2\nlevel_up_at = 6");
    assert_eq!((rules.guided_from, rules.standard_from, rules.level_up_at), (2, 2, 6));
  }

  #[test]
  fn non_positive_start_level_falls_back_to_one() {
    let cfg = parse_quiz_config("start_level = 0").expect("parse");
    let s = Settings::from_parts(0, ":memory:".into(), 1, None, cfg);
    assert_eq!(s.start_level, 1);
  }

  #[test]
  fn unknown_area_fails_to_parse() {
    let bad = r#"
[[content]]
id = 1
level = 1
area = "astronomy"
question = "q"
options = ["a"]
answer = "a"
"#;
    assert!(parse_quiz_config(bad).is_err());
  }

  #[test]
  fn session_key_must_be_base64() {
    assert!(decode_session_key("not base64 !!").is_none());
    assert_eq!(decode_session_key("AAEC").expect("decode"), vec![0u8, 1, 2]);
  }
}
