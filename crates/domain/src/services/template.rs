//! Placeholder rendering for bot templates.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::telegram::User;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([a-z_][a-z0-9_]*)\}").unwrap();
}

/// Values available to a template, taken from the message sender.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl TemplateContext {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.username.clone(),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            "username" => Some(self.username.clone()),
            "full_name" => Some(self.full_name()),
            _ => None,
        }
    }
}

impl From<&User> for TemplateContext {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
            username: user.username.clone().unwrap_or_default(),
        }
    }
}

/// Substitutes known `{placeholder}`s. Unknown placeholders are kept verbatim.
pub fn render(content: &str, context: &TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| {
            context
                .lookup(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Placeholder names used by a template body, in order of first use.
pub fn placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
