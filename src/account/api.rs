use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use super::types::{
    Account, AccountUpdatePayload, CharacterShort, Persona, PersonaCreatePayload,
    PersonaUpdatePayload, SettingsPatch, Voice, VoiceOverridePayload,
};
use super::util::{build_url, collection_field, error_text, status_text, success_flag};
use crate::error::ClientError;
use crate::requester::{ApiResponse, RequestOptions, Requester};
use crate::session::AuthSession;

/// Default host for the chat API.
pub const PLUS_BASE_URL: &str = "https://plus.character.ai";
/// Default host for the multimodal (voice) API.
pub const NEO_BASE_URL: &str = "https://neo.character.ai";

const PERSONA_DESCRIPTION: &str = "This is my persona.";
const PERSONA_GREETING: &str = "Hello! This is my persona";

const PERSONA_NAME_MIN: usize = 3;
const PERSONA_NAME_MAX: usize = 20;
const PERSONA_DEFINITION_MAX: usize = 728;
const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 20;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const BIO_MAX: usize = 500;

/// Facade over the account-scoped endpoints: profile, settings, personas,
/// followers, voices, and the per-character overrides.
///
/// Every method is one HTTP round trip (persona edit and delete perform a
/// re-fetch first, so two). Nothing is cached between calls and nothing is
/// retried. The settings setters do a read-modify-write with no
/// concurrency guard; callers that need atomicity must serialize access to
/// this facade themselves.
pub struct AccountApi {
    session: Arc<AuthSession>,
    requester: Arc<dyn Requester>,
    plus_base: Url,
    neo_base: Url,
}

impl AccountApi {
    /// Facade against the production hosts.
    pub fn new(
        session: Arc<AuthSession>,
        requester: Arc<dyn Requester>,
    ) -> Result<Self, ClientError> {
        Ok(Self::with_base_urls(
            session,
            requester,
            Url::parse(PLUS_BASE_URL)?,
            Url::parse(NEO_BASE_URL)?,
        ))
    }

    /// Facade against caller-supplied hosts. Used by tests and proxies.
    pub fn with_base_urls(
        session: Arc<AuthSession>,
        requester: Arc<dyn Requester>,
        plus_base: Url,
        neo_base: Url,
    ) -> Self {
        Self {
            session,
            requester,
            plus_base,
            neo_base,
        }
    }

    async fn get(&self, url: Url) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::get(self.session.headers()?);
        self.requester.request(url, options).await
    }

    async fn post_json<T: Serialize>(
        &self,
        url: Url,
        payload: &T,
    ) -> Result<ApiResponse, ClientError> {
        let options =
            RequestOptions::post(self.session.headers()?).with_body(serde_json::to_string(payload)?);
        self.requester.request(url, options).await
    }

    /// GET with the fetch-failure contract: anything short of a 200 — the
    /// transport included — collapses into a `Fetch` error naming the
    /// resource.
    async fn fetch_body(&self, url: Url, resource: &'static str) -> Result<Value, ClientError> {
        let response = self
            .get(url)
            .await
            .map_err(|_| ClientError::fetch(resource))?;
        if response.status_code() != StatusCode::OK {
            return Err(ClientError::fetch(resource));
        }
        response.json_value()
    }

    /// Fetches the authenticated account's profile.
    pub async fn fetch_me(&self) -> Result<Account, ClientError> {
        let url = build_url(&self.plus_base, "/chat/user/")?;
        tracing::info!(target: "charai::account", %url, "fetching account profile");
        let body = self.fetch_body(url, "your account").await?;
        let raw = body
            .pointer("/user/user")
            .filter(|user| !user.is_null())
            .cloned()
            .ok_or(ClientError::fetch("your account"))?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Fetches the raw account settings map.
    pub async fn fetch_my_settings(&self) -> Result<Map<String, Value>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/user/settings/")?;
        tracing::info!(target: "charai::account", %url, "fetching account settings");
        match self.fetch_body(url, "your settings").await? {
            Value::Object(settings) => Ok(settings),
            _ => Err(ClientError::fetch("your settings")),
        }
    }

    /// Usernames following the authenticated account.
    pub async fn fetch_my_followers(&self) -> Result<Vec<String>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/user/followers/")?;
        tracing::info!(target: "charai::account", %url, "fetching followers");
        let body = self.fetch_body(url, "your followers").await?;
        collection_field(&body, "followers")
    }

    /// Usernames the authenticated account follows.
    pub async fn fetch_my_following(&self) -> Result<Vec<String>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/user/following/")?;
        tracing::info!(target: "charai::account", %url, "fetching following");
        let body = self.fetch_body(url, "your following").await?;
        collection_field(&body, "following")
    }

    /// Fetches one of the account's personas by id. A missing or null
    /// `persona` field is a fetch failure, the persona may not exist.
    pub async fn fetch_my_persona(&self, persona_id: &str) -> Result<Persona, ClientError> {
        let url = build_url(
            &self.plus_base,
            &format!("/chat/persona/?id={}", persona_id),
        )?;
        tracing::info!(target: "charai::account", %url, %persona_id, "fetching persona");
        let body = self.fetch_body(url, "your persona").await?;
        match body.get("persona") {
            Some(raw) if !raw.is_null() => Ok(serde_json::from_value(raw.clone())?),
            _ => Err(ClientError::fetch("your persona")),
        }
    }

    /// All personas owned by the account.
    pub async fn fetch_my_personas(&self) -> Result<Vec<Persona>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/personas/?force_refresh=1")?;
        tracing::info!(target: "charai::account", %url, "fetching personas");
        let body = self.fetch_body(url, "your personas").await?;
        collection_field(&body, "personas")
    }

    /// Characters created by the account.
    pub async fn fetch_my_characters(&self) -> Result<Vec<CharacterShort>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/characters/?scope=user")?;
        tracing::info!(target: "charai::account", %url, "fetching characters");
        let body = self.fetch_body(url, "your characters").await?;
        collection_field(&body, "characters")
    }

    /// Characters the account has upvoted.
    pub async fn fetch_my_upvoted_characters(&self) -> Result<Vec<CharacterShort>, ClientError> {
        let url = build_url(&self.plus_base, "/chat/user/characters/upvoted/")?;
        tracing::info!(target: "charai::account", %url, "fetching upvoted characters");
        let body = self.fetch_body(url, "your upvoted characters").await?;
        collection_field(&body, "characters")
    }

    /// Voices owned by the account. Served by the multimodal host.
    pub async fn fetch_my_voices(&self) -> Result<Vec<Voice>, ClientError> {
        let url = build_url(&self.neo_base, "/multimodal/api/v1/voices/user")?;
        tracing::info!(target: "charai::account", %url, "fetching voices");
        let body = self.fetch_body(url, "your voices").await?;
        collection_field(&body, "voices")
    }

    /// Read-modify-write of the settings map: fetch current settings, apply
    /// the patch, push the whole object back. Returns the server's updated
    /// settings sub-object. Every failure along the way is an `Update`
    /// error.
    pub(crate) async fn update_settings(
        &self,
        patch: SettingsPatch,
    ) -> Result<Map<String, Value>, ClientError> {
        let SettingsPatch {
            default_persona_id,
            persona_override,
            character_id,
            voice_override,
        } = patch;

        // Nothing to update: fail before touching the network.
        if default_persona_id.is_none() && persona_override.is_none() && voice_override.is_none() {
            return Err(ClientError::Update);
        }

        let mut settings = self
            .fetch_my_settings()
            .await
            .map_err(|_| ClientError::Update)?;

        if let Some(default_persona_id) = default_persona_id {
            settings.insert(
                "default_persona_id".to_string(),
                Value::String(default_persona_id),
            );
        }

        if let (Some(persona_override), Some(character_id)) = (persona_override, character_id) {
            let overrides = settings
                .entry("personaOverrides")
                .or_insert_with(|| Value::Object(Map::new()));
            if !overrides.is_object() {
                *overrides = Value::Object(Map::new());
            }
            if let Value::Object(overrides) = overrides {
                overrides.insert(character_id, Value::String(persona_override));
            }
        }

        let url = build_url(&self.plus_base, "/chat/user/update_settings/")?;
        tracing::info!(target: "charai::account", %url, "pushing updated settings");
        let response = self
            .post_json(url, &Value::Object(settings))
            .await
            .map_err(|_| ClientError::Update)?;

        if response.status_code() == StatusCode::OK {
            if let Ok(body) = response.json_value() {
                if success_flag(&body) {
                    return match body.get("settings").cloned() {
                        Some(Value::Object(updated)) => Ok(updated),
                        _ => Ok(Map::new()),
                    };
                }
            }
        }
        Err(ClientError::Update)
    }

    /// Updates the account profile. Length bounds are checked before any
    /// network call; violations never reach the server.
    pub async fn edit_account(
        &self,
        name: &str,
        username: &str,
        bio: &str,
        avatar_rel_path: &str,
    ) -> Result<(), ClientError> {
        let username_len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
            return Err(ClientError::invalid_argument(format!(
                "username must be between {} and {} characters",
                USERNAME_MIN, USERNAME_MAX
            )));
        }
        let name_len = name.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&name_len) {
            return Err(ClientError::invalid_argument(format!(
                "name must be between {} and {} characters",
                NAME_MIN, NAME_MAX
            )));
        }
        if bio.chars().count() > BIO_MAX {
            return Err(ClientError::invalid_argument(format!(
                "bio must be no more than {} characters",
                BIO_MAX
            )));
        }

        let payload = AccountUpdatePayload {
            avatar_type: if avatar_rel_path.is_empty() {
                "DEFAULT"
            } else {
                "UPLOADED"
            },
            bio: bio.to_string(),
            name: name.to_string(),
            username: username.to_string(),
            avatar_rel_path: (!avatar_rel_path.is_empty()).then(|| avatar_rel_path.to_string()),
        };

        let url = build_url(&self.plus_base, "/chat/user/update/")?;
        tracing::info!(target: "charai::account", %url, %username, "editing account profile");
        let response = self
            .post_json(url, &payload)
            .await
            .map_err(|_| ClientError::edit("account info", ""))?;

        if response.status_code() == StatusCode::OK {
            let body = response.json_value()?;
            let status = status_text(&body);
            if status == "OK" {
                return Ok(());
            }
            return Err(ClientError::edit("account info", status));
        }
        Err(ClientError::edit("account info", ""))
    }

    /// Creates a private persona with a freshly generated identifier.
    pub async fn create_persona(
        &self,
        name: &str,
        definition: &str,
        avatar_rel_path: &str,
    ) -> Result<Persona, ClientError> {
        let name_len = name.chars().count();
        if !(PERSONA_NAME_MIN..=PERSONA_NAME_MAX).contains(&name_len) {
            return Err(ClientError::invalid_argument(format!(
                "persona name must be between {} and {} characters",
                PERSONA_NAME_MIN, PERSONA_NAME_MAX
            )));
        }
        if definition.chars().count() > PERSONA_DEFINITION_MAX {
            return Err(ClientError::invalid_argument(format!(
                "persona definition must be no more than {} characters",
                PERSONA_DEFINITION_MAX
            )));
        }

        let payload = PersonaCreatePayload {
            avatar_file_name: String::new(),
            avatar_rel_path: avatar_rel_path.to_string(),
            base_img_prompt: String::new(),
            categories: Vec::new(),
            copyable: false,
            definition: definition.to_string(),
            description: PERSONA_DESCRIPTION.to_string(),
            greeting: PERSONA_GREETING.to_string(),
            identifier: format!("id:{}", Uuid::new_v4()),
            img_gen_enabled: false,
            name: name.to_string(),
            strip_img_prompt_from_msg: false,
            title: name.to_string(),
            visibility: "PRIVATE".to_string(),
            voice_id: String::new(),
        };

        let url = build_url(&self.plus_base, "/chat/character/create/")?;
        tracing::info!(target: "charai::account", %url, %name, "creating persona");
        let response = self
            .post_json(url, &payload)
            .await
            .map_err(|_| ClientError::create(""))?;

        if response.status_code() == StatusCode::OK {
            let body = response.json_value()?;
            if status_text(&body) == "OK" {
                if let Some(raw) = body.get("persona").filter(|p| !p.is_null()) {
                    return Ok(serde_json::from_value(raw.clone())?);
                }
            }
            return Err(ClientError::create(error_text(&body)));
        }
        Err(ClientError::create(""))
    }

    /// Partial edit of an existing persona: empty `name`/`definition`
    /// arguments keep the previous values, and the avatar fields change
    /// only when a new `avatar_rel_path` is given. The persona is
    /// re-fetched first; a failed fetch is an edit failure.
    pub async fn edit_persona(
        &self,
        persona_id: &str,
        name: &str,
        definition: &str,
        avatar_rel_path: &str,
    ) -> Result<Persona, ClientError> {
        if !name.is_empty() {
            let name_len = name.chars().count();
            if !(PERSONA_NAME_MIN..=PERSONA_NAME_MAX).contains(&name_len) {
                return Err(ClientError::invalid_argument(format!(
                    "persona name must be between {} and {} characters",
                    PERSONA_NAME_MIN, PERSONA_NAME_MAX
                )));
            }
        }
        if definition.chars().count() > PERSONA_DEFINITION_MAX {
            return Err(ClientError::invalid_argument(format!(
                "persona definition must be no more than {} characters",
                PERSONA_DEFINITION_MAX
            )));
        }

        let old = self
            .fetch_my_persona(persona_id)
            .await
            .map_err(|_| ClientError::edit("persona", "it may not exist"))?;

        let old_avatar = old
            .avatar
            .as_ref()
            .map(|avatar| avatar.file_name().to_string())
            .unwrap_or_default();
        let (avatar_file_name, avatar_rel) = if avatar_rel_path.is_empty() {
            (old_avatar.clone(), old_avatar)
        } else {
            (avatar_rel_path.to_string(), avatar_rel_path.to_string())
        };

        let new_name = if name.is_empty() {
            old.name.clone()
        } else {
            name.to_string()
        };
        let new_definition = if definition.is_empty() {
            old.definition.clone()
        } else {
            definition.to_string()
        };

        let payload = PersonaUpdatePayload {
            archived: None,
            avatar_file_name,
            avatar_rel_path: Some(avatar_rel),
            copyable: false,
            default_voice_id: String::new(),
            definition: new_definition,
            description: PERSONA_DESCRIPTION.to_string(),
            enabled: Some(false),
            external_id: persona_id.to_string(),
            greeting: PERSONA_GREETING.to_string(),
            img_gen_enabled: false,
            is_persona: true,
            name: new_name.clone(),
            participant__name: new_name,
            participant__num_interactions: 0,
            // title tracks the raw name argument; the previous title is not
            // restored when no new name is given
            title: name.to_string(),
            user__id: self.session.account_id().to_string(),
            user__username: old.author_username,
            visibility: "PRIVATE".to_string(),
        };

        let url = build_url(&self.plus_base, "/chat/persona/update/")?;
        tracing::info!(target: "charai::account", %url, %persona_id, "editing persona");
        let response = self
            .post_json(url, &payload)
            .await
            .map_err(|_| ClientError::edit("persona", ""))?;

        if response.status_code() == StatusCode::OK {
            let body = response.json_value()?;
            if status_text(&body) == "OK" {
                if let Some(raw) = body.get("persona").filter(|p| !p.is_null()) {
                    return Ok(serde_json::from_value(raw.clone())?);
                }
            }
            return Err(ClientError::edit("persona", error_text(&body)));
        }
        Err(ClientError::edit("persona", ""))
    }

    /// Archives a persona. The server has no hard delete; the persona is
    /// re-submitted unchanged with `archived: true`.
    pub async fn delete_persona(&self, persona_id: &str) -> Result<(), ClientError> {
        let old = self
            .fetch_my_persona(persona_id)
            .await
            .map_err(|_| ClientError::delete("it may not exist"))?;

        let old_avatar = old
            .avatar
            .as_ref()
            .map(|avatar| avatar.file_name().to_string())
            .unwrap_or_default();

        let payload = PersonaUpdatePayload {
            archived: Some(true),
            avatar_file_name: old_avatar,
            avatar_rel_path: None,
            copyable: false,
            default_voice_id: String::new(),
            definition: old.definition,
            description: PERSONA_DESCRIPTION.to_string(),
            enabled: None,
            external_id: persona_id.to_string(),
            greeting: PERSONA_GREETING.to_string(),
            img_gen_enabled: false,
            is_persona: true,
            name: old.name.clone(),
            participant__name: old.name.clone(),
            participant__num_interactions: 0,
            title: old.name,
            user__id: self.session.account_id().to_string(),
            user__username: old.author_username,
            visibility: "PRIVATE".to_string(),
        };

        let url = build_url(&self.plus_base, "/chat/persona/update/")?;
        tracing::info!(target: "charai::account", %url, %persona_id, "deleting persona");
        let response = self
            .post_json(url, &payload)
            .await
            .map_err(|_| ClientError::delete(""))?;

        if response.status_code() == StatusCode::OK {
            let body = response.json_value()?;
            if status_text(&body) == "OK" && body.get("persona").is_some_and(|p| !p.is_null()) {
                return Ok(());
            }
            return Err(ClientError::delete(error_text(&body)));
        }
        Err(ClientError::delete(""))
    }

    /// Sets (or, with `None`, clears) the account-wide default persona.
    /// The inner update error is discarded; callers see only a `Set`
    /// failure.
    pub async fn set_default_persona(&self, persona_id: Option<&str>) -> Result<(), ClientError> {
        let patch = SettingsPatch {
            default_persona_id: Some(persona_id.unwrap_or_default().to_string()),
            ..SettingsPatch::default()
        };
        self.update_settings(patch)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::set("default persona"))
    }

    pub async fn unset_default_persona(&self) -> Result<(), ClientError> {
        self.set_default_persona(None).await
    }

    /// Sets (or, with `None`, clears) the persona presented to one
    /// character.
    pub async fn set_persona(
        &self,
        character_id: &str,
        persona_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let patch = SettingsPatch {
            persona_override: Some(persona_id.unwrap_or_default().to_string()),
            character_id: Some(character_id.to_string()),
            ..SettingsPatch::default()
        };
        self.update_settings(patch)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::set("persona"))
    }

    pub async fn unset_persona(&self, character_id: &str) -> Result<(), ClientError> {
        self.set_persona(character_id, None).await
    }

    /// Sets or clears the voice override for one character. Unlike the
    /// persona overrides this has its own endpoint pair: `update` takes a
    /// `{"voice_id": …}` body, `delete` takes none.
    pub async fn set_voice(
        &self,
        character_id: &str,
        voice_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let voice_id = voice_id.filter(|id| !id.is_empty());
        let action = if voice_id.is_some() { "update" } else { "delete" };
        let url = build_url(
            &self.plus_base,
            &format!("/chat/character/{}/voice_override/{}/", character_id, action),
        )?;
        tracing::info!(target: "charai::account", %url, %character_id, "updating voice override");

        let headers = self.session.headers().map_err(|_| ClientError::set("voice"))?;
        let mut options = RequestOptions::post(headers);
        if let Some(voice_id) = voice_id {
            let payload = VoiceOverridePayload {
                voice_id: voice_id.to_string(),
            };
            options = options.with_body(
                serde_json::to_string(&payload).map_err(|_| ClientError::set("voice"))?,
            );
        }

        let response = self
            .requester
            .request(url, options)
            .await
            .map_err(|_| ClientError::set("voice"))?;

        if response.status_code() == StatusCode::OK {
            if let Ok(body) = response.json_value() {
                if success_flag(&body) {
                    return Ok(());
                }
            }
        }
        Err(ClientError::set("voice"))
    }

    pub async fn unset_voice(&self, character_id: &str) -> Result<(), ClientError> {
        self.set_voice(character_id, None).await
    }
}
