use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reference to an avatar image on the static content host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Avatar {
    file_name: String,
}

impl Avatar {
    /// Relative file name as stored server-side.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full URL of the rendered image.
    pub fn url(&self) -> String {
        format!(
            "https://characterai.io/i/400/static/avatars/{}",
            self.file_name
        )
    }
}

/// The wire carries avatars as an `avatar_file_name` string, empty when the
/// entity has none.
fn avatar_from_file_name<'de, D>(deserializer: D) -> Result<Option<Avatar>, D::Error>
where
    D: Deserializer<'de>,
{
    let file_name = Option::<String>::deserialize(deserializer)?;
    Ok(file_name
        .filter(|name| !name.is_empty())
        .map(|file_name| Avatar { file_name }))
}

/// Profile of the authenticated account, as returned by the user endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    #[serde(rename = "id")]
    pub account_id: i64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(
        default,
        rename = "avatar_file_name",
        deserialize_with = "avatar_from_file_name"
    )]
    pub avatar: Option<Avatar>,
}

/// A reusable identity profile owned by the authenticated account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Persona {
    #[serde(rename = "external_id")]
    pub persona_id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default, rename = "user__username")]
    pub author_username: String,
    #[serde(
        default,
        rename = "avatar_file_name",
        deserialize_with = "avatar_from_file_name"
    )]
    pub avatar: Option<Avatar>,
}

/// Lightweight character listing entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterShort {
    #[serde(rename = "external_id")]
    pub character_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default, rename = "user__username")]
    pub author_username: String,
    #[serde(default, rename = "participant__num_interactions")]
    pub num_interactions: u64,
    #[serde(
        default,
        rename = "avatar_file_name",
        deserialize_with = "avatar_from_file_name"
    )]
    pub avatar: Option<Avatar>,
}

/// A synthesized voice asset. The voice service speaks camelCase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    #[serde(rename = "id")]
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default, rename = "previewAudioURI")]
    pub preview_audio_uri: Option<String>,
    #[serde(default, rename = "creatorInfo")]
    pub creator: Option<VoiceCreator>,
    #[serde(default)]
    pub last_update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoiceCreator {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub username: String,
}

/// Body of the account update endpoint. `avatar_rel_path` is omitted
/// entirely when no new avatar is being set.
#[derive(Debug, Serialize)]
pub(crate) struct AccountUpdatePayload {
    pub(crate) avatar_type: &'static str,
    pub(crate) bio: String,
    pub(crate) name: String,
    pub(crate) username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) avatar_rel_path: Option<String>,
}

/// Fixed-shape body of the persona creation endpoint. Most fields are
/// constant filler the server expects to be present.
#[derive(Debug, Serialize)]
pub(crate) struct PersonaCreatePayload {
    pub(crate) avatar_file_name: String,
    pub(crate) avatar_rel_path: String,
    pub(crate) base_img_prompt: String,
    pub(crate) categories: Vec<String>,
    pub(crate) copyable: bool,
    pub(crate) definition: String,
    pub(crate) description: String,
    pub(crate) greeting: String,
    pub(crate) identifier: String,
    pub(crate) img_gen_enabled: bool,
    pub(crate) name: String,
    pub(crate) strip_img_prompt_from_msg: bool,
    pub(crate) title: String,
    pub(crate) visibility: String,
    pub(crate) voice_id: String,
}

/// Full-replacement body of the persona update endpoint, shared by edit
/// (`enabled: false`, `avatar_rel_path` present) and delete
/// (`archived: true`, no `avatar_rel_path`).
#[derive(Debug, Serialize)]
pub(crate) struct PersonaUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) archived: Option<bool>,
    pub(crate) avatar_file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) avatar_rel_path: Option<String>,
    pub(crate) copyable: bool,
    pub(crate) default_voice_id: String,
    pub(crate) definition: String,
    pub(crate) description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) enabled: Option<bool>,
    pub(crate) external_id: String,
    pub(crate) greeting: String,
    pub(crate) img_gen_enabled: bool,
    pub(crate) is_persona: bool,
    pub(crate) name: String,
    pub(crate) participant__name: String,
    pub(crate) participant__num_interactions: u64,
    pub(crate) title: String,
    pub(crate) user__id: String,
    pub(crate) user__username: String,
    pub(crate) visibility: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VoiceOverridePayload {
    pub(crate) voice_id: String,
}

/// Fields of a settings update. `persona_override` only takes effect when
/// `character_id` accompanies it; `voice_override` counts as something to
/// update but is never written into the settings map (the voice override
/// lives behind its own endpoint).
#[derive(Debug, Default)]
pub(crate) struct SettingsPatch {
    pub(crate) default_persona_id: Option<String>,
    pub(crate) persona_override: Option<String>,
    pub(crate) character_id: Option<String>,
    pub(crate) voice_override: Option<String>,
}
