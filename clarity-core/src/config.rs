/// Personalisation settings persisted next to the document.
use serde::{Deserialize, Serialize};

/// Accent palette offered by the settings screen, as `(name, "r g b")`.
pub const ACCENT_COLORS: &[(&str, &str)] = &[
    ("Blue", "59 130 246"),
    ("Green", "34 197 94"),
    ("Purple", "168 85 247"),
    ("Pink", "236 72 153"),
    ("Orange", "249 115 22"),
    ("Teal", "20 184 166"),
];

pub const DEFAULT_WORKSPACE_NAME: &str = "Workspace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarKind {
    Preset,
    Custom,
}

/// A preset avatar id, or a custom image (usually a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(rename = "type")]
    pub kind: AvatarKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<Avatar>,
    #[serde(default)]
    pub theme: Theme,
    /// Space-separated RGB triple, e.g. `"59 130 246"`.
    pub accent_color: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            avatar: None,
            theme: Theme::System,
            accent_color: ACCENT_COLORS[0].1.to_string(),
        }
    }
}

impl UserSettings {
    /// Name shown in the header; a blank name falls back to the default.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            DEFAULT_WORKSPACE_NAME
        } else {
            name
        }
    }

    /// Initials for the avatar placeholder when no avatar is set.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_stored_shape() {
        let value = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Workspace",
                "avatar": null,
                "theme": "system",
                "accentColor": "59 130 246"
            })
        );
    }

    #[test]
    fn test_avatar_round_trip() {
        let raw = json!({
            "name": "Ada",
            "avatar": { "type": "preset", "value": "avatar-3" },
            "theme": "dark",
            "accentColor": "34 197 94"
        });
        let settings: UserSettings = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(settings.avatar.as_ref().map(|a| a.kind), Some(AvatarKind::Preset));
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn test_initials_and_display_name() {
        let mut settings = UserSettings::default();
        assert_eq!(settings.initials(), "W");
        settings.name = "ada lovelace byron".into();
        assert_eq!(settings.initials(), "AL");
        settings.name = "   ".into();
        assert_eq!(settings.display_name(), "Workspace");
    }
}
