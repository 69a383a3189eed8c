//! Keyboard layouts for menus and advertisements.

use domain::models::telegram::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup,
};
use domain::models::{Advertisement, MenuButton, MenuButtonType};
use domain::services::update_routing::{menu_callback_data, ROOT_MENU_CALLBACK};

use super::defaults::BACK_LABEL;

const ROOT_MENU_COLUMNS: usize = 2;

/// Reply keyboard listing root button labels; tapping one sends the label.
pub fn root_menu(buttons: &[MenuButton]) -> Option<ReplyMarkup> {
    if buttons.is_empty() {
        return None;
    }
    let keyboard = buttons
        .chunks(ROOT_MENU_COLUMNS)
        .map(|row| {
            row.iter()
                .map(|b| KeyboardButton {
                    text: b.label.clone(),
                })
                .collect()
        })
        .collect();

    Some(ReplyMarkup::Reply(ReplyKeyboardMarkup {
        keyboard,
        resize_keyboard: true,
    }))
}

/// Inline keyboard under an opened button: one row per child, then a back
/// button to the parent (or the root menu).
pub fn submenu(children: &[MenuButton], parent_id: Option<i64>) -> ReplyMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = children
        .iter()
        .map(|child| vec![child_button(child)])
        .collect();

    let back = match parent_id {
        Some(id) => menu_callback_data(id),
        None => ROOT_MENU_CALLBACK.to_string(),
    };
    rows.push(vec![InlineKeyboardButton::callback(BACK_LABEL, back)]);

    ReplyMarkup::Inline(InlineKeyboardMarkup {
        inline_keyboard: rows,
    })
}

fn child_button(button: &MenuButton) -> InlineKeyboardButton {
    match (button.button_type, &button.url) {
        (MenuButtonType::Url, Some(url)) => InlineKeyboardButton::url(&button.label, url),
        _ => InlineKeyboardButton::callback(&button.label, menu_callback_data(button.id)),
    }
}

/// Inline link for a `url` button opened from the reply keyboard, which
/// can only send its label back.
pub fn link(button: &MenuButton) -> Option<ReplyMarkup> {
    let url = button.url.as_deref()?;
    Some(ReplyMarkup::Inline(InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton::url(&button.label, url)]],
    }))
}

/// Single URL button under an advertisement, when it has one.
pub fn advertisement(ad: &Advertisement) -> Option<ReplyMarkup> {
    match (&ad.button_text, &ad.button_url) {
        (Some(text), Some(url)) => Some(ReplyMarkup::Inline(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton::url(text, url)]],
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::AdvertisementStatus;

    fn button(id: i64, label: &str, button_type: MenuButtonType, url: Option<&str>) -> MenuButton {
        let now = Utc::now();
        MenuButton {
            id,
            parent_id: None,
            label: label.to_string(),
            button_type,
            content: None,
            url: url.map(str::to_string),
            media_id: None,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_root_menu_rows() {
        assert!(root_menu(&[]).is_none());

        let buttons = vec![
            button(1, "Catalog", MenuButtonType::Submenu, None),
            button(2, "About", MenuButtonType::Content, None),
            button(3, "Site", MenuButtonType::Url, Some("https://example.com")),
        ];
        let Some(ReplyMarkup::Reply(markup)) = root_menu(&buttons) else {
            panic!("expected reply keyboard");
        };
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[1][0].text, "Site");
        assert!(markup.resize_keyboard);
    }

    #[test]
    fn test_submenu_children_and_back() {
        let children = vec![
            button(4, "Pizza", MenuButtonType::Content, None),
            button(5, "Order online", MenuButtonType::Url, Some("https://shop.example.com")),
        ];
        let ReplyMarkup::Inline(markup) = submenu(&children, Some(1)) else {
            panic!("expected inline keyboard");
        };
        let rows = markup.inline_keyboard;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].callback_data.as_deref(), Some("menu:4"));
        assert_eq!(rows[1][0].url.as_deref(), Some("https://shop.example.com"));
        assert_eq!(rows[2][0].callback_data.as_deref(), Some("menu:1"));

        let ReplyMarkup::Inline(markup) = submenu(&[], None) else {
            panic!("expected inline keyboard");
        };
        assert_eq!(
            markup.inline_keyboard[0][0].callback_data.as_deref(),
            Some(ROOT_MENU_CALLBACK)
        );
    }

    #[test]
    fn test_link_for_url_button() {
        let site = button(3, "Site", MenuButtonType::Url, Some("https://example.com"));
        let Some(ReplyMarkup::Inline(markup)) = link(&site) else {
            panic!("expected inline keyboard");
        };
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "Site");
        assert_eq!(markup.inline_keyboard[0][0].url.as_deref(), Some("https://example.com"));

        assert!(link(&button(2, "About", MenuButtonType::Content, None)).is_none());
    }

    #[test]
    fn test_advertisement_button() {
        let now = Utc::now();
        let mut ad = Advertisement {
            id: 1,
            store_id: None,
            title: "Sale".to_string(),
            description: None,
            media_id: None,
            button_text: None,
            button_url: None,
            start_date: None,
            end_date: None,
            status: AdvertisementStatus::Active,
            frequency_cap_minutes: 60,
            created_at: now,
            updated_at: now,
        };
        assert!(advertisement(&ad).is_none());

        ad.button_text = Some("Shop".to_string());
        ad.button_url = Some("https://shop.example.com".to_string());
        let Some(ReplyMarkup::Inline(markup)) = advertisement(&ad) else {
            panic!("expected inline keyboard");
        };
        assert_eq!(markup.inline_keyboard[0][0].text, "Shop");
    }
}
