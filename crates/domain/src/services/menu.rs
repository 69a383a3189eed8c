//! Menu tree rules.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::menu_button::{MenuButton, MenuTreeNode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuRuleError {
    #[error("Menu button {0} has child buttons; delete them first")]
    HasChildren(i64),

    #[error("Menu button cannot be its own parent")]
    SelfParent,

    #[error("Menu button cannot be moved under one of its descendants")]
    Cycle,
}

/// Fails when the button still has children.
pub fn ensure_deletable(button_id: i64, children_count: i64) -> Result<(), MenuRuleError> {
    if children_count > 0 {
        Err(MenuRuleError::HasChildren(button_id))
    } else {
        Ok(())
    }
}

/// Checks a re-parent of `button_id` under `new_parent_id`, given the
/// ancestor chain of the new parent (nearest first).
pub fn ensure_valid_parent(
    button_id: i64,
    new_parent_id: Option<i64>,
    parent_ancestors: &[i64],
) -> Result<(), MenuRuleError> {
    match new_parent_id {
        None => Ok(()),
        Some(parent) if parent == button_id => Err(MenuRuleError::SelfParent),
        Some(_) if parent_ancestors.contains(&button_id) => Err(MenuRuleError::Cycle),
        Some(_) => Ok(()),
    }
}

/// Assembles a flat button list into a forest ordered by `sort_order`, then id.
///
/// Buttons whose parent is missing from the list are treated as roots.
pub fn build_tree(buttons: Vec<MenuButton>) -> Vec<MenuTreeNode> {
    let ids: std::collections::HashSet<i64> = buttons.iter().map(|b| b.id).collect();
    let mut by_parent: HashMap<Option<i64>, Vec<MenuButton>> = HashMap::new();
    for button in buttons {
        let parent = button.parent_id.filter(|p| ids.contains(p));
        by_parent.entry(parent).or_default().push(button);
    }
    attach(None, &mut by_parent)
}

fn attach(
    parent: Option<i64>,
    by_parent: &mut HashMap<Option<i64>, Vec<MenuButton>>,
) -> Vec<MenuTreeNode> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    level.sort_by_key(|b| (b.sort_order, b.id));
    level
        .into_iter()
        .map(|button| {
            let children = attach(Some(button.id), by_parent);
            MenuTreeNode { button, children }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu_button::MenuButtonType;
    use chrono::Utc;

    fn button(id: i64, parent_id: Option<i64>, sort_order: i32) -> MenuButton {
        let now = Utc::now();
        MenuButton {
            id,
            parent_id,
            label: format!("b{}", id),
            button_type: MenuButtonType::Submenu,
            content: None,
            url: None,
            media_id: None,
            sort_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ensure_deletable() {
        assert!(ensure_deletable(1, 0).is_ok());
        assert_eq!(ensure_deletable(1, 2), Err(MenuRuleError::HasChildren(1)));
    }

    #[test]
    fn test_ensure_valid_parent() {
        assert!(ensure_valid_parent(3, None, &[]).is_ok());
        assert!(ensure_valid_parent(3, Some(2), &[1]).is_ok());
        assert_eq!(ensure_valid_parent(3, Some(3), &[]), Err(MenuRuleError::SelfParent));
        // 5 -> 4 -> 3: moving 3 under 5 would close a loop.
        assert_eq!(ensure_valid_parent(3, Some(5), &[4, 3]), Err(MenuRuleError::Cycle));
    }

    #[test]
    fn test_build_tree_orders_levels() {
        let tree = build_tree(vec![
            button(4, Some(1), 2),
            button(2, None, 1),
            button(1, None, 0),
            button(3, Some(1), 1),
            button(5, Some(99), 0),
        ]);
        let roots: Vec<i64> = tree.iter().map(|n| n.button.id).collect();
        assert_eq!(roots, vec![5, 1, 2]);
        let children: Vec<i64> = tree[1].children.iter().map(|n| n.button.id).collect();
        assert_eq!(children, vec![3, 4]);
        assert!(tree[2].children.is_empty());
    }
}
