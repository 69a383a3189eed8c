//! Texts used when no active template exists for a type.

use domain::models::bot_template::types;

pub const WELCOME: &str = "Welcome, {first_name}! Use the menu below to get started.";
pub const HELP: &str = "Send /menu to open the main menu or /start to begin again.";
pub const UNKNOWN_COMMAND: &str = "Sorry, I don't know that command. Try /help.";
pub const FALLBACK: &str = "I didn't catch that. Please choose an option from the menu.";

pub const MENU_PROMPT: &str = "Choose an option:";
pub const MENU_EMPTY: &str = "The menu is empty right now.";
pub const BUTTON_UNAVAILABLE: &str = "This option is no longer available.";
pub const BACK_LABEL: &str = "« Back";

/// Built-in text for a template type.
pub fn default_text(template_type: &str) -> &'static str {
    match template_type {
        types::WELCOME => WELCOME,
        types::HELP => HELP,
        types::UNKNOWN_COMMAND => UNKNOWN_COMMAND,
        _ => FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text() {
        assert_eq!(default_text(types::WELCOME), WELCOME);
        assert_eq!(default_text(types::UNKNOWN_COMMAND), UNKNOWN_COMMAND);
        assert_eq!(default_text("promo"), FALLBACK);
    }
}
