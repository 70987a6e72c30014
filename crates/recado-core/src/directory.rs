//! Identity directory: the authoritative set of users and their profiles.

use chrono::Utc;
use indexmap::IndexMap;
use recado_types::UserId;
use recado_types::models::Profile;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Sender id used for messages generated by the network itself.
pub const SYSTEM_SENDER: &str = "jackut";

/// Read-only view of the directory consumed by the relationship graph and the
/// messaging engine.
pub trait Directory {
    fn exists(&self, login: &str) -> bool;
    fn get(&self, login: &str) -> Option<&Profile>;
}

/// Profile attribute key. `nome` and `login` are resolved from the profile
/// itself rather than the attribute map, and cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey<'a> {
    Name,
    Login,
    Custom(&'a str),
}

impl<'a> AttributeKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key {
            "nome" => Self::Name,
            "login" => Self::Login,
            other => Self::Custom(other),
        }
    }
}

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: IndexMap<UserId, Profile>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            users: profiles
                .into_iter()
                .map(|profile| (profile.login.clone(), profile))
                .collect(),
        }
    }

    pub fn create(&mut self, login: &str, password_hash: &str, display_name: &str) -> Result<()> {
        if login.trim().is_empty() || login == SYSTEM_SENDER {
            return Err(CoreError::InvalidLogin);
        }
        if password_hash.is_empty() {
            return Err(CoreError::InvalidPassword);
        }
        if self.users.contains_key(login) {
            return Err(CoreError::UserExists(login.to_string()));
        }

        self.users.insert(
            login.to_string(),
            Profile {
                login: login.to_string(),
                display_name: display_name.to_string(),
                password_hash: password_hash.to_string(),
                attributes: IndexMap::new(),
                created_at: Utc::now(),
            },
        );
        debug!("Registered user {}", login);
        Ok(())
    }

    pub fn attribute(&self, login: &str, key: &str) -> Result<String> {
        let profile = self
            .users
            .get(login)
            .ok_or_else(|| CoreError::UnknownUser(login.to_string()))?;

        match AttributeKey::parse(key) {
            AttributeKey::Name => Ok(profile.display_name.clone()),
            AttributeKey::Login => Ok(profile.login.clone()),
            AttributeKey::Custom(key) => profile
                .attributes
                .get(key)
                .cloned()
                .ok_or_else(|| CoreError::AttributeNotSet(key.to_string())),
        }
    }

    pub fn set_attribute(&mut self, login: &str, key: &str, value: &str) -> Result<()> {
        let profile = self
            .users
            .get_mut(login)
            .ok_or_else(|| CoreError::UnknownUser(login.to_string()))?;

        match AttributeKey::parse(key) {
            AttributeKey::Name | AttributeKey::Login => {
                Err(CoreError::ReadOnlyAttribute(key.to_string()))
            }
            AttributeKey::Custom(key) => {
                profile.attributes.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.users.values()
    }

    pub fn remove(&mut self, login: &str) -> Option<Profile> {
        self.users.shift_remove(login)
    }

    pub fn reset(&mut self) {
        self.users.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Directory for UserDirectory {
    fn exists(&self, login: &str) -> bool {
        self.users.contains_key(login)
    }

    fn get(&self, login: &str) -> Option<&Profile> {
        self.users.get(login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        let mut dir = UserDirectory::new();
        dir.create("maria", "hash", "Maria Silva").unwrap();
        dir
    }

    #[test]
    fn rejects_bad_registrations() {
        let mut dir = directory();
        assert_eq!(dir.create("", "hash", "x"), Err(CoreError::InvalidLogin));
        assert_eq!(dir.create("   ", "hash", "x"), Err(CoreError::InvalidLogin));
        assert_eq!(dir.create(SYSTEM_SENDER, "hash", "x"), Err(CoreError::InvalidLogin));
        assert_eq!(dir.create("joao", "", "x"), Err(CoreError::InvalidPassword));
        assert_eq!(
            dir.create("maria", "hash", "Other"),
            Err(CoreError::UserExists("maria".into()))
        );
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn reserved_keys_resolve_from_profile() {
        let dir = directory();
        assert_eq!(dir.attribute("maria", "nome").unwrap(), "Maria Silva");
        assert_eq!(dir.attribute("maria", "login").unwrap(), "maria");
        assert!(dir.get("maria").unwrap().attributes.is_empty());
    }

    #[test]
    fn custom_attributes_round_trip() {
        let mut dir = directory();
        assert_eq!(
            dir.attribute("maria", "cidade"),
            Err(CoreError::AttributeNotSet("cidade".into()))
        );

        dir.set_attribute("maria", "cidade", "Maceio").unwrap();
        dir.set_attribute("maria", "cidade", "Recife").unwrap();
        assert_eq!(dir.attribute("maria", "cidade").unwrap(), "Recife");
    }

    #[test]
    fn reserved_keys_are_read_only() {
        let mut dir = directory();
        assert_eq!(
            dir.set_attribute("maria", "nome", "Other"),
            Err(CoreError::ReadOnlyAttribute("nome".into()))
        );
        assert_eq!(
            dir.set_attribute("maria", "login", "other"),
            Err(CoreError::ReadOnlyAttribute("login".into()))
        );
        assert_eq!(dir.attribute("maria", "nome").unwrap(), "Maria Silva");
    }

    #[test]
    fn unknown_user_lookups_fail() {
        let mut dir = directory();
        assert_eq!(
            dir.attribute("ghost", "nome"),
            Err(CoreError::UnknownUser("ghost".into()))
        );
        assert_eq!(
            dir.set_attribute("ghost", "cidade", "x"),
            Err(CoreError::UnknownUser("ghost".into()))
        );
    }
}
