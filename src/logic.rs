//! Progress engine: difficulty selection, question rendering and answer grading.
//!
//! The pure pieces (`difficulty`, `render_question`, `grade`) hold all of the
//! branching; `current_question` and `submit_answer` wire them to the store.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::config::ProgressRules;
use crate::domain::{Area, ContentItem, Difficulty, Progress, User};
use crate::error::AppError;
use crate::seeds::NO_QUESTION;
use crate::store::{find_user, lookup_content, update_user};

pub const FEEDBACK_CORRECT: &str = "Great job!";
pub const FEEDBACK_WRONG: &str = "Try again!";

/// A question as it will be shown, at a given difficulty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
  pub prompt: String,
  pub options: Vec<String>,
  /// `None` for the placeholder, which nothing can answer.
  pub expected: Option<String>,
  pub difficulty: Difficulty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeOutcome {
  pub correct: bool,
  pub badge_awarded: bool,
  pub leveled_up: bool,
  pub progress: Progress,
}

/// What a graded submission reports back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
  pub outcome: GradeOutcome,
  pub next: Question,
}

impl ProgressRules {
  pub fn difficulty(&self, score: u32) -> Difficulty {
    if score >= self.standard_from {
      Difficulty::Standard
    } else if score >= self.guided_from {
      Difficulty::Guided
    } else {
      Difficulty::Instruction
    }
  }
}

pub fn answers_match(submitted: &str, expected: &str) -> bool {
  submitted.to_lowercase() == expected.to_lowercase()
}

/// Score after one answer; never drops below 0.
pub fn apply_delta(score: u32, correct: bool) -> u32 {
  if correct { score.saturating_add(1) } else { score.saturating_sub(1) }
}

pub fn render_question(item: Option<&ContentItem>, difficulty: Difficulty) -> Question {
  let Some(item) = item else {
    return Question {
      prompt: NO_QUESTION.to_string(),
      options: Vec::new(),
      expected: None,
      difficulty,
    };
  };
  let prompt = match difficulty {
    Difficulty::Standard => item.question.clone(),
    Difficulty::Guided => format!("{} (Hint: {})", item.question, item.hint),
    Difficulty::Instruction => format!("{}\nNow try: {}", item.instruction, item.question),
  };
  Question {
    prompt,
    options: item.options.clone(),
    expected: Some(item.answer.clone()),
    difficulty,
  }
}

/// Grade one submission against `expected` and compute the resulting progress.
///
/// Order matters: score moves first, then the badge check (correct answers
/// only, on the new score), then level-up, which resets score to 0.
pub fn grade(progress: &Progress, expected: Option<&str>, submitted: &str, rules: &ProgressRules) -> GradeOutcome {
  let correct = expected.is_some_and(|e| answers_match(submitted, e));
  let mut next = progress.clone();
  next.score = apply_delta(progress.score, correct);

  // Clamping can revisit the same multiple, so a badge may be earned again.
  let badge_awarded = correct && rules.badge_every > 0 && next.score > 0 && next.score % rules.badge_every == 0;
  if badge_awarded {
    next.badges.push(rules.badge_name.clone());
  }

  let leveled_up = next.score >= rules.level_up_at;
  if leveled_up {
    next.level += 1;
    next.score = 0;
  }

  GradeOutcome { correct, badge_awarded, leveled_up, progress: next }
}

fn lookup(conn: &Connection, level: u32, area: Option<Area>) -> Result<Option<ContentItem>, AppError> {
  match area {
    Some(area) => lookup_content(conn, level, area),
    None => Ok(None),
  }
}

/// The question a user would see right now for `area`. An unknown area has no content.
#[instrument(level = "debug", skip(conn, rules, user), fields(user_id = user.id, level = user.level, score = user.score))]
pub fn current_question(conn: &Connection, rules: &ProgressRules, user: &User, area: Option<Area>) -> Result<Question, AppError> {
  let item = lookup(conn, user.level, area)?;
  Ok(render_question(item.as_ref(), rules.difficulty(user.score)))
}

/// Grade `answer` for the user's current question and persist the result.
/// Returns `None` when the user does not exist.
#[instrument(level = "info", skip(conn, rules, answer), fields(answer_len = answer.len()))]
pub fn submit_answer(
  conn: &Connection,
  rules: &ProgressRules,
  user_id: i64,
  area: Option<Area>,
  answer: &str,
) -> Result<Option<Submission>, AppError> {
  let Some(user) = find_user(conn, user_id)? else {
    return Ok(None);
  };
  let asked = current_question(conn, rules, &user, area)?;
  let outcome = grade(&user.progress(), asked.expected.as_deref(), answer, rules);

  let repeat_badge = outcome.badge_awarded && user.badges.contains(&rules.badge_name);

  let p = &outcome.progress;
  update_user(conn, user.id, p.score, &p.badges, p.level)?;
  info!(
    target: "quiz",
    user_id,
    area = ?area,
    correct = outcome.correct,
    score = p.score,
    level = p.level,
    badge_awarded = outcome.badge_awarded,
    repeat_badge,
    leveled_up = outcome.leveled_up,
    "answer graded"
  );

  let item = lookup(conn, p.level, area)?;
  let next = render_question(item.as_ref(), rules.difficulty(p.score));
  Ok(Some(Submission { outcome, next }))
}

pub fn feedback(correct: bool) -> &'static str {
  if correct { FEEDBACK_CORRECT } else { FEEDBACK_WRONG }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{migrate, seed_content, DbPool};
  use crate::domain::Badges;
  use crate::seeds::seed_content as builtin;
  use crate::store::get_or_create_user;

  fn at(level: u32, score: u32) -> Progress {
    Progress { level, score, badges: Badges::new() }
  }

  #[test]
  fn difficulty_follows_score_thresholds() {
    let r = ProgressRules::default();
    assert_eq!(r.difficulty(0), Difficulty::Instruction);
    assert_eq!(r.difficulty(2), Difficulty::Instruction);
    assert_eq!(r.difficulty(3), Difficulty::Guided);
    assert_eq!(r.difficulty(6), Difficulty::Guided);
    assert_eq!(r.difficulty(7), Difficulty::Standard);
    assert_eq!(r.difficulty(10), Difficulty::Standard);
  }

  #[test]
  fn wrong_answer_at_zero_stays_at_zero() {
    let r = ProgressRules::default();
    let out = grade(&at(1, 0), Some("day"), "cat", &r);
    assert!(!out.correct);
    assert_eq!(out.progress.score, 0);
    assert!(!out.badge_awarded);
  }

  #[test]
  fn matching_ignores_case_but_not_whitespace() {
    let r = ProgressRules::default();
    assert!(grade(&at(1, 0), Some("day"), "DAY", &r).correct);
    assert!(!grade(&at(1, 0), Some("day"), " day", &r).correct);
  }

  #[test]
  fn fifth_point_awards_one_badge() {
    let r = ProgressRules::default();
    let out = grade(&at(1, 4), Some("god"), "god", &r);
    assert_eq!(out.progress.score, 5);
    assert!(out.badge_awarded);
    assert_eq!(out.progress.badges.iter().collect::<Vec<_>>(), vec!["Faith Builder"]);
  }

  #[test]
  fn oscillating_score_earns_duplicate_badges() {
    let r = ProgressRules::default();
    let first = grade(&at(1, 4), Some("a"), "a", &r).progress;
    let down = grade(&first, Some("a"), "b", &r).progress;
    assert_eq!(down.score, 4);
    assert_eq!(down.badges.len(), 1);
    let again = grade(&down, Some("a"), "a", &r).progress;
    assert_eq!(again.badges.len(), 2);
  }

  #[test]
  fn tenth_point_levels_up_and_resets_score() {
    let r = ProgressRules::default();
    let out = grade(&at(1, 9), Some("day"), "day", &r);
    assert!(out.leveled_up);
    assert_eq!((out.progress.level, out.progress.score), (2, 0));
    // 10 is a multiple of 5, so the badge lands in the same update
    assert!(out.badge_awarded);
  }

  #[test]
  fn placeholder_cannot_be_answered() {
    let r = ProgressRules::default();
    let q = render_question(None, Difficulty::Guided);
    assert_eq!(q.prompt, NO_QUESTION);
    assert!(q.options.is_empty());
    let out = grade(&at(1, 2), q.expected.as_deref(), "", &r);
    assert!(!out.correct);
    assert_eq!(out.progress.score, 1);
  }

  #[test]
  fn prompt_rendering_per_difficulty() {
    let item = builtin().remove(1);
    assert_eq!(render_question(Some(&item), Difficulty::Standard).prompt, item.question);
    assert_eq!(
      render_question(Some(&item), Difficulty::Guided).prompt,
      format!("{} (Hint: {})", item.question, item.hint)
    );
    let instr = render_question(Some(&item), Difficulty::Instruction).prompt;
    assert!(instr.starts_with(&item.instruction));
    assert!(instr.ends_with(&format!("\nNow try: {}", item.question)));
  }

  #[test]
  fn submit_persists_and_reports_next_question() {
    let pool = DbPool::in_memory().expect("pool");
    let mut conn = pool.get().expect("conn");
    migrate(&conn).expect("migrate");
    seed_content(&mut conn, &builtin()).expect("seed");
    let rules = ProgressRules::default();
    let u = get_or_create_user(&conn, "Eli", 1).expect("user");
    update_user(&conn, u.id, 9, &Badges::new(), 1).expect("prime");

    let sub = submit_answer(&conn, &rules, u.id, Some(Area::PhonologicalAwareness), "Day")
      .expect("submit")
      .expect("user exists");
    assert!(sub.outcome.correct);
    assert!(sub.outcome.leveled_up);
    // level 2 has a phonological item; score 0 means instruction form
    assert!(sub.next.prompt.contains("Now try: Count syllables"));

    let back = find_user(&conn, u.id).expect("find").expect("present");
    assert_eq!((back.level, back.score, back.badges.len()), (2, 0, 1));
  }

  #[test]
  fn unknown_area_grades_against_placeholder() {
    let pool = DbPool::in_memory().expect("pool");
    let mut conn = pool.get().expect("conn");
    migrate(&conn).expect("migrate");
    seed_content(&mut conn, &builtin()).expect("seed");
    let rules = ProgressRules::default();
    let u = get_or_create_user(&conn, "Eli", 1).expect("user");
    update_user(&conn, u.id, 2, &Badges::new(), 1).expect("prime");

    let sub = submit_answer(&conn, &rules, u.id, None, "day").expect("submit").expect("user exists");
    assert!(!sub.outcome.correct);
    assert_eq!(sub.next.prompt, NO_QUESTION);
    assert_eq!(find_user(&conn, u.id).expect("find").expect("present").score, 1);
  }

  #[test]
  fn submit_for_unknown_user_is_none() {
    let pool = DbPool::in_memory().expect("pool");
    let conn = pool.get().expect("conn");
    migrate(&conn).expect("migrate");
    let rules = ProgressRules::default();
    assert!(submit_answer(&conn, &rules, 42, Some(Area::Phonics), "god").expect("submit").is_none());
  }
}
