//! Signed-cookie sessions binding a browser to a user id.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use rand::RngCore;
use tracing::{debug, error, warn};

pub const SESSION_COOKIE: &str = "biblelit_session";

/// Build the signing key from configured bytes, or generate an ephemeral one.
/// Sessions signed with an ephemeral key do not survive a restart.
pub fn signing_key(configured: Option<&[u8]>) -> Key {
  if let Some(bytes) = configured {
    match Key::try_from(bytes) {
      Ok(key) => return key,
      Err(e) => error!(target: "session", error = %e, len = bytes.len(), "SESSION_KEY unusable (need >= 64 bytes)"),
    }
  }
  warn!(target: "session", "Using an ephemeral session key");
  let mut bytes = [0u8; 64];
  rand::thread_rng().fill_bytes(&mut bytes);
  Key::from(&bytes)
}

pub fn current_user_id(jar: &SignedCookieJar) -> Option<i64> {
  let cookie = jar.get(SESSION_COOKIE)?;
  match cookie.value().parse::<i64>() {
    Ok(id) => Some(id),
    Err(_) => {
      debug!(target: "session", "session cookie carried a non-numeric id");
      None
    }
  }
}

pub fn begin(jar: SignedCookieJar, user_id: i64) -> SignedCookieJar {
  let cookie = Cookie::build((SESSION_COOKIE, user_id.to_string()))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax);
  jar.add(cookie)
}

pub fn end(jar: SignedCookieJar) -> SignedCookieJar {
  jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_configured_key_falls_back_to_random() {
    // must not panic on short input
    let _ = signing_key(Some(&[1u8; 8][..]));
  }

  #[test]
  fn begun_session_is_readable() {
    let key = signing_key(Some(&[7u8; 64][..]));
    let jar = begin(SignedCookieJar::new(key), 17);
    assert_eq!(current_user_id(&jar), Some(17));
    let jar = end(jar);
    assert_eq!(current_user_id(&jar), None);
  }
}
