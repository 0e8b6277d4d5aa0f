//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Every page except login needs a session; without one the browser is sent back to `/`.

use axum::{
  extract::{Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  Form, Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, instrument, warn};

use crate::domain::User;
use crate::error::AppError;
use crate::logic::{current_question, feedback, submit_answer};
use crate::protocol::*;
use crate::session;
use crate::state::AppState;
use crate::store::{find_user, get_or_create_user};
use crate::util::trunc_for_log;
use crate::views::{dashboard_page, login_page, quiz_page};

fn to_login() -> Response {
  Redirect::to("/").into_response()
}

/// Resolve the session cookie to a stored user.
async fn session_user(state: &AppState, jar: &SignedCookieJar) -> Result<Option<User>, AppError> {
  let Some(id) = session::current_user_id(jar) else {
    return Ok(None);
  };
  let user = state.with_conn(move |conn| find_user(conn, id)).await?;
  if user.is_none() {
    warn!(target: "session", user_id = id, "session refers to a missing user");
  }
  Ok(user)
}

#[instrument(level = "info")]
pub async fn health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn login_form() -> Html<String> { Html(login_page()) }

#[instrument(level = "info", skip(state, jar, form), fields(username = %trunc_for_log(&form.username, 32)))]
pub async fn login(
  State(state): State<AppState>,
  jar: SignedCookieJar,
  Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
  if form.username.trim().is_empty() {
    return Err(AppError::bad_request("username is required"));
  }
  let start_level = state.settings.start_level;
  let username = form.username;
  let user = state
    .with_conn(move |conn| get_or_create_user(conn, &username, start_level))
    .await?;
  info!(target: "session", user_id = user.id, level = user.level, "logged in");
  Ok((session::begin(jar, user.id), Redirect::to("/dashboard")).into_response())
}

#[instrument(level = "info", skip(jar))]
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
  (session::end(jar), Redirect::to("/"))
}

#[instrument(level = "info", skip(state, jar))]
pub async fn dashboard(State(state): State<AppState>, jar: SignedCookieJar) -> Result<Response, AppError> {
  match session_user(&state, &jar).await? {
    Some(user) => Ok(Html(dashboard_page(&user)).into_response()),
    None => Ok(to_login()),
  }
}

#[instrument(level = "info", skip(state, jar, q), fields(area = %trunc_for_log(q.area_param(), 32)))]
pub async fn quiz_question(
  State(state): State<AppState>,
  jar: SignedCookieJar,
  Query(q): Query<QuizQuery>,
) -> Result<Response, AppError> {
  let Some(user_id) = session::current_user_id(&jar) else {
    return Ok(to_login());
  };
  let area = q.area();
  if area.is_none() {
    warn!(target: "quiz", requested = %trunc_for_log(q.area_param(), 32), "unknown area; serving placeholder");
  }
  let settings = state.settings.clone();
  let found = state
    .with_conn(move |conn| {
      let Some(user) = find_user(conn, user_id)? else {
        return Ok(None);
      };
      let question = current_question(conn, &settings.rules, &user, area)?;
      Ok(Some((user, question)))
    })
    .await?;

  match found {
    Some((user, question)) => {
      info!(target: "quiz", user_id, area = ?area, level = user.level, difficulty = ?question.difficulty, "question served");
      Ok(Html(quiz_page(user.level, q.area_param(), &q.heading(), &question)).into_response())
    }
    None => Ok(to_login()),
  }
}

#[instrument(level = "info", skip(state, jar, q, form), fields(area = %trunc_for_log(q.area_param(), 32), answer_len = form.answer.len()))]
pub async fn quiz_answer(
  State(state): State<AppState>,
  jar: SignedCookieJar,
  Query(q): Query<QuizQuery>,
  Form(form): Form<AnswerForm>,
) -> Result<Response, AppError> {
  let Some(user_id) = session::current_user_id(&jar) else {
    return Ok(to_login());
  };
  let area = q.area();
  let settings = state.settings.clone();
  let answer = form.answer;
  let graded = state
    .with_conn(move |conn| submit_answer(conn, &settings.rules, user_id, area, &answer))
    .await?;

  match graded {
    Some(sub) => Ok(
      Json(AnswerOut {
        correct: sub.outcome.correct,
        feedback: feedback(sub.outcome.correct).to_string(),
        next_question: sub.next.prompt,
      })
      .into_response(),
    ),
    None => Ok(to_login()),
  }
}
