//! HTTP request/response DTOs (serde ready).

use serde::{Deserialize, Serialize};

use crate::domain::Area;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
}

/// `area` stays a raw string: a tag outside the fixed set is served as "no content".
#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    #[serde(default)]
    pub area: Option<String>,
}

impl QuizQuery {
    /// The tag as requested, defaulting to phonological awareness when absent.
    pub fn area_param(&self) -> &str {
        self.area.as_deref().unwrap_or(Area::default().as_str())
    }

    /// `None` when the requested tag is not a known area (including `area=`).
    pub fn area(&self) -> Option<Area> {
        self.area_param().parse().ok()
    }

    pub fn heading(&self) -> String {
        match self.area() {
            Some(area) => area.title().to_string(),
            None => self.area_param().replace('_', " "),
        }
    }
}

#[derive(Deserialize)]
pub struct AnswerForm {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub feedback: String,
    pub next_question: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(area: Option<&str>) -> QuizQuery {
        QuizQuery { area: area.map(str::to_string) }
    }

    #[test]
    fn missing_area_defaults_to_phonological_awareness() {
        assert_eq!(query(None).area(), Some(Area::PhonologicalAwareness));
        assert_eq!(query(None).area_param(), "phonological_awareness");
    }

    #[test]
    fn unknown_or_empty_area_has_no_tag() {
        assert_eq!(query(Some("star_charts")).area(), None);
        assert_eq!(query(Some("star_charts")).heading(), "star charts");
        assert_eq!(query(Some("")).area(), None);
        assert_eq!(query(Some("phonics")).area(), Some(Area::Phonics));
    }
}
