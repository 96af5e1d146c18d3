//! HTML page templates

use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;

pub const LOGIN_PAGE: &str = "login.html";
pub const HOME_PAGE: &str = "index.html";

/// Compiled page templates, auto-escaping HTML
#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template(LOGIN_PAGE, include_str!("../../templates/login.html"))?;
        env.add_template(HOME_PAGE, include_str!("../../templates/index.html"))?;
        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}
