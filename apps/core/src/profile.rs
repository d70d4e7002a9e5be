use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, StoreError};

pub const KEY_NAME: &str = "kapetayo.account.name";
pub const KEY_BIO: &str = "kapetayo.account.bio";
pub const KEY_VISIBLE: &str = "kapetayo.account.visible";
pub const KEY_ONBOARDED: &str = "kapetayo.account.onboarded";
pub const KEY_BOOKMARKS: &str = "kapetayo.account.bookmarks";
pub const KEY_VISITED: &str = "kapetayo.account.visited";
pub const KEY_AVATAR: &str = "kapetayo.account.avatarConfirmedId";
pub const KEY_PHOTO: &str = "kapetayo.account.photo";

pub const ACCOUNT_KEYS: [&str; 8] = [
    KEY_NAME,
    KEY_BIO,
    KEY_VISIBLE,
    KEY_BOOKMARKS,
    KEY_VISITED,
    KEY_AVATAR,
    KEY_ONBOARDED,
    KEY_PHOTO,
];

pub const DEFAULT_BIO: &str = "Marikina Explorer";
pub const MAX_NAME_CHARS: usize = 40;
pub const MAX_BIO_CHARS: usize = 120;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Please enter your display name.")]
    MissingName,
    #[error("Display name must be at most 40 characters.")]
    NameTooLong,
    #[error("Bio must be at most 120 characters.")]
    BioTooLong,
    #[error("Avatar id is required.")]
    MissingAvatar,
    #[error("Profile photo must be an image data URL.")]
    InvalidPhoto,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub visible: bool,
    pub avatar_id: Option<String>,
    pub photo: Option<String>,
    pub onboarded: bool,
}

/// Partial edit; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub clear_photo: bool,
}

pub fn validate_display_name(input: &str) -> Result<String, ProfileError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::MissingName);
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ProfileError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

pub fn validate_bio(input: &str) -> Result<String, ProfileError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_BIO.to_string());
    }
    if trimmed.chars().count() > MAX_BIO_CHARS {
        return Err(ProfileError::BioTooLong);
    }
    Ok(trimmed.to_string())
}

fn validate_photo(input: &str) -> Result<String, ProfileError> {
    let trimmed = input.trim();
    if !trimmed.starts_with("data:image/") || !trimmed.contains(";base64,") {
        return Err(ProfileError::InvalidPhoto);
    }
    Ok(trimmed.to_string())
}

pub fn has_completed_onboarding(store: &dyn KeyValueStore) -> Result<bool, StoreError> {
    if store.get(KEY_ONBOARDED)?.as_deref() == Some("true") {
        return Ok(true);
    }
    Ok(store
        .get(KEY_NAME)?
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false))
}

pub fn complete_onboarding(
    store: &dyn KeyValueStore,
    name: &str,
    bio: &str,
) -> Result<Profile, ProfileError> {
    let name = validate_display_name(name)?;
    let bio = validate_bio(bio)?;

    store.set(KEY_NAME, &name)?;
    store.set(KEY_BIO, &bio)?;
    store.set(KEY_VISIBLE, "true")?;
    store.set(KEY_ONBOARDED, "true")?;
    tracing::info!(name = %name, "onboarding completed");

    Ok(load_profile(store)?)
}

pub fn load_profile(store: &dyn KeyValueStore) -> Result<Profile, StoreError> {
    let name = store.get(KEY_NAME)?.unwrap_or_default();
    let bio = store
        .get(KEY_BIO)?
        .filter(|bio| !bio.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIO.to_string());
    let visible = store.get(KEY_VISIBLE)?.as_deref() == Some("true");
    let avatar_id = store.get(KEY_AVATAR)?.filter(|id| !id.is_empty());
    let photo = store.get(KEY_PHOTO)?.filter(|photo| !photo.is_empty());
    let onboarded = has_completed_onboarding(store)?;

    Ok(Profile {
        name,
        bio,
        visible,
        avatar_id,
        photo,
        onboarded,
    })
}

/// Validates every field of `update` before writing any of them.
pub fn update_profile(
    store: &dyn KeyValueStore,
    update: &ProfileUpdate,
) -> Result<Profile, ProfileError> {
    let name = update.name.as_deref().map(validate_display_name).transpose()?;
    let bio = update.bio.as_deref().map(validate_bio).transpose()?;
    let avatar_id = match update.avatar_id.as_deref().map(str::trim) {
        Some("") => return Err(ProfileError::MissingAvatar),
        other => other.map(str::to_string),
    };
    let photo = if update.clear_photo {
        None
    } else {
        update.photo.as_deref().map(validate_photo).transpose()?
    };

    if let Some(name) = &name {
        store.set(KEY_NAME, name)?;
    }
    if let Some(bio) = &bio {
        store.set(KEY_BIO, bio)?;
    }
    if let Some(visible) = update.visible {
        store.set(KEY_VISIBLE, if visible { "true" } else { "false" })?;
    }
    if let Some(avatar_id) = &avatar_id {
        store.set(KEY_AVATAR, avatar_id)?;
    }
    if update.clear_photo {
        store.remove(KEY_PHOTO)?;
    } else if let Some(photo) = &photo {
        store.set(KEY_PHOTO, photo)?;
    }

    Ok(load_profile(store)?)
}

pub fn reset_account(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    for key in ACCOUNT_KEYS {
        store.remove(key)?;
    }
    tracing::info!("account data cleared");
    Ok(())
}

pub fn bookmarks(store: &dyn KeyValueStore) -> Result<Vec<String>, StoreError> {
    read_id_list(store, KEY_BOOKMARKS)
}

pub fn visited(store: &dyn KeyValueStore) -> Result<Vec<String>, StoreError> {
    read_id_list(store, KEY_VISITED)
}

pub fn is_bookmarked(store: &dyn KeyValueStore, cafe_id: &str) -> Result<bool, StoreError> {
    Ok(bookmarks(store)?.iter().any(|id| id == cafe_id))
}

pub fn is_visited(store: &dyn KeyValueStore, cafe_id: &str) -> Result<bool, StoreError> {
    Ok(visited(store)?.iter().any(|id| id == cafe_id))
}

/// Returns whether the cafe is bookmarked after the toggle.
pub fn toggle_bookmark(store: &dyn KeyValueStore, cafe_id: &str) -> Result<bool, StoreError> {
    toggle_id(store, KEY_BOOKMARKS, cafe_id)
}

/// Returns whether the cafe is marked visited after the toggle.
pub fn toggle_visited(store: &dyn KeyValueStore, cafe_id: &str) -> Result<bool, StoreError> {
    toggle_id(store, KEY_VISITED, cafe_id)
}

fn toggle_id(store: &dyn KeyValueStore, key: &str, cafe_id: &str) -> Result<bool, StoreError> {
    let mut ids = read_id_list(store, key)?;
    let now_present = match ids.iter().position(|id| id == cafe_id) {
        Some(index) => {
            ids.remove(index);
            false
        }
        None => {
            ids.push(cafe_id.to_string());
            true
        }
    };
    write_id_list(store, key, &ids)?;
    tracing::debug!(key, cafe_id, now_present, "toggled cafe id");
    Ok(now_present)
}

fn read_id_list(store: &dyn KeyValueStore, key: &str) -> Result<Vec<String>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => {
            let mut unique: Vec<String> = Vec::with_capacity(ids.len());
            for id in ids {
                if !unique.contains(&id) {
                    unique.push(id);
                }
            }
            Ok(unique)
        }
        Err(error) => {
            tracing::warn!(key, %error, "ignoring unreadable stored id list");
            Ok(Vec::new())
        }
    }
}

fn write_id_list(store: &dyn KeyValueStore, key: &str, ids: &[String]) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string());
    store.set(key, &encoded)
}
