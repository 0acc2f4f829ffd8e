//! Push notifications
//!
//! Parses push payloads and builds notification descriptors. Descriptors are
//! ephemeral; there is no de-duplication or replacement logic.

use serde::Deserialize;

use crate::config::NotificationDefaults;

/// Push payload contract: a JSON object with optional fields. Anything
/// missing falls back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

/// A button on a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Everything the host needs to display one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDescriptor {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    /// Path to open when the notification is clicked.
    pub url: String,
    pub actions: Vec<NotificationAction>,
}

impl NotificationDescriptor {
    /// Build a descriptor from a parsed payload, filling gaps from defaults.
    pub fn from_payload(payload: PushPayload, defaults: &NotificationDefaults) -> Self {
        Self {
            title: payload.title.unwrap_or_else(|| defaults.title.clone()),
            body: payload.body.unwrap_or_else(|| defaults.body.clone()),
            icon: defaults.icon.clone(),
            badge: defaults.badge.clone(),
            vibrate: defaults.vibrate.clone(),
            url: payload.url.unwrap_or_else(|| defaults.click_target.clone()),
            actions: default_actions(),
        }
    }
}

/// The fixed action set attached to every notification.
pub fn default_actions() -> Vec<NotificationAction> {
    vec![
        NotificationAction {
            action: "view".to_string(),
            title: "View".to_string(),
        },
        NotificationAction {
            action: "dismiss".to_string(),
            title: "Dismiss".to_string(),
        },
    ]
}

/// Whether a click action (or the default empty action) should open the app.
pub fn is_view_action(action: &str) -> bool {
    action.is_empty() || action == "view" || action == "explore"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_parses_partial_json() {
        let payload: PushPayload = serde_json::from_str(r#"{"title": "Stock low"}"#).unwrap();

        assert_eq!(payload.title.as_deref(), Some("Stock low"));
        assert!(payload.body.is_none());
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_descriptor_fills_defaults() {
        let defaults = NotificationDefaults::default();
        let payload: PushPayload =
            serde_json::from_str(r#"{"title": "Stock low", "url": "/inventory"}"#).unwrap();

        let descriptor = NotificationDescriptor::from_payload(payload, &defaults);

        assert_eq!(descriptor.title, "Stock low");
        assert_eq!(descriptor.body, defaults.body);
        assert_eq!(descriptor.url, "/inventory");
        assert_eq!(descriptor.vibrate, vec![100, 50, 100]);
    }

    #[test]
    fn test_fixed_action_set() {
        let actions = default_actions();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, "view");
        assert_eq!(actions[1].action, "dismiss");
    }

    #[test]
    fn test_view_actions() {
        assert!(is_view_action(""));
        assert!(is_view_action("view"));
        assert!(is_view_action("explore"));
        assert!(!is_view_action("dismiss"));
        assert!(!is_view_action("close"));
    }
}
