//! One-shot messages carried in a signed cookie
//!
//! Flashes are queued for visitors without a session (after logout, or when
//! bounced from `/home`), so they travel with the browser rather than the
//! session store.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

pub const FLASH_COOKIE: &str = "stock_advisor_flash";

pub const LOGIN_REQUIRED: &str = "Please log in to continue.";
pub const LOGGED_OUT: &str = "You have been logged out.";

const SEPARATOR: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoggedOut,
    LoginRequired,
}

impl Flash {
    fn code(self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::LoginRequired => "login_required",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "logged_out" => Some(Self::LoggedOut),
            "login_required" => Some(Self::LoginRequired),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::LoggedOut => LOGGED_OUT,
            Self::LoginRequired => LOGIN_REQUIRED,
        }
    }
}

fn queued(jar: &SignedCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .map(|cookie| {
            cookie
                .value()
                .split(SEPARATOR)
                .filter_map(Flash::from_code)
                .collect()
        })
        .unwrap_or_default()
}

/// Queue `flash` for the next rendered page
pub fn push_flash(jar: SignedCookieJar, flash: Flash) -> SignedCookieJar {
    let mut flashes = queued(&jar);
    if !flashes.contains(&flash) {
        flashes.push(flash);
    }
    let value = flashes
        .iter()
        .map(|f| f.code())
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Remove and return the queued messages
pub fn take_flashes(jar: SignedCookieJar) -> (SignedCookieJar, Vec<String>) {
    let flashes = queued(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    let messages = flashes.into_iter().map(|f| f.message().to_string()).collect();
    (jar, messages)
}
