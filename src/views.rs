//! Server-rendered pages: login, dashboard and quiz.

use crate::domain::{Area, User};
use crate::logic::Question;
use crate::util::{escape_html, fill_template};

const LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <title>{title}</title>
</head>
<body class="bg-light">
    <div class="container mt-5">
        <h1 class="text-center mb-4">{heading}</h1>
{body}
    </div>
{script}
</body>
</html>
"#;

const LOGIN_BODY: &str = r#"        <form method="post" action="/" class="card p-4 mx-auto" style="max-width: 400px;">
            <div class="mb-3">
                <label for="username" class="form-label">Username</label>
                <input type="text" class="form-control" name="username" id="username" required>
            </div>
            <button type="submit" class="btn btn-primary w-100">Login</button>
        </form>"#;

const DASHBOARD_BODY: &str = r#"        <div class="card p-4">
            <p><strong>Learner:</strong> {username}</p>
            <p><strong>Level:</strong> {level}</p>
            <p><strong>Score:</strong> {score}</p>
            <p><strong>Badges:</strong> {badges}</p>
            <div class="d-flex flex-wrap gap-2">
{links}
            </div>
            <a href="/logout" class="btn btn-link mt-3">Log out</a>
        </div>"#;

const QUIZ_BODY: &str = r#"        <div class="card p-4">
            <p class="lead" style="white-space: pre-line;">{prompt}</p>
            <form id="quiz-form" method="post" data-area="{area}">
{options}
                <button type="submit" class="btn btn-primary mt-3">Submit</button>
            </form>
            <a href="/dashboard" class="btn btn-link mt-3">Back to dashboard</a>
        </div>"#;

// Posts urlencoded so the server-side form extractor accepts it.
const QUIZ_SCRIPT: &str = r#"    <script>
        document.getElementById('quiz-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const body = new URLSearchParams(new FormData(e.target));
            const area = encodeURIComponent(e.target.dataset.area);
            const response = await fetch('/quiz?area=' + area, { method: 'POST', body });
            const data = await response.json();
            alert(data.feedback);
            location.reload();
        });
    </script>"#;

fn page(title: &str, heading: &str, body: &str, script: &str) -> String {
  fill_template(
    LAYOUT,
    &[("title", title), ("heading", heading), ("body", body), ("script", script)],
  )
}

pub fn login_page() -> String {
  page("BibleLit Core", "BibleLit Core Login", LOGIN_BODY, "")
}

pub fn dashboard_page(user: &User) -> String {
  let badges = if user.badges.is_empty() {
    "None".to_string()
  } else {
    escape_html(&user.badges.iter().collect::<Vec<_>>().join(", "))
  };
  let links = Area::ALL
    .iter()
    .map(|a| {
      format!(
        r#"                <a href="/quiz?area={}" class="btn btn-primary">Start {}</a>"#,
        a.as_str(),
        a.title()
      )
    })
    .collect::<Vec<_>>()
    .join("\n");
  let body = fill_template(
    DASHBOARD_BODY,
    &[
      ("username", &escape_html(&user.username)),
      ("level", &user.level.to_string()),
      ("score", &user.score.to_string()),
      ("badges", &badges),
      ("links", &links),
    ],
  );
  page("BibleLit Core Dashboard", "BibleLit Core Dashboard", &body, "")
}

/// `area` is the requested tag as given; `heading` is its display form.
pub fn quiz_page(level: u32, area: &str, heading: &str, question: &Question) -> String {
  let options = question
    .options
    .iter()
    .enumerate()
    .map(|(i, opt)| {
      let opt = escape_html(opt);
      format!(
        r#"                <div class="form-check">
                    <input class="form-check-input" type="radio" name="answer" value="{opt}" id="opt-{n}">
                    <label class="form-check-label" for="opt-{n}">{opt}</label>
                </div>"#,
        n = i + 1
      )
    })
    .collect::<Vec<_>>()
    .join("\n");
  let body = fill_template(
    QUIZ_BODY,
    &[
      ("prompt", &escape_html(&question.prompt)),
      ("area", &escape_html(area)),
      ("options", &options),
    ],
  );
  let heading = format!("Level {}: {}", level, escape_html(heading));
  page("BibleLit Core Quiz", &heading, &body, QUIZ_SCRIPT)
}
