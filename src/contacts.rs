//! Contact book shared by all profiles

use crate::storage::{LocalStore, LocalStoreExt, KEY_CONTACTS};
use crate::{BraillError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A call/message target. `name` is stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub number: String,
}

/// Normalized form used as the uniqueness key
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct ContactBook {
    store: Arc<dyn LocalStore>,
    contacts: Vec<Contact>,
}

impl ContactBook {
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let contacts: Vec<Contact> = store.load(KEY_CONTACTS).unwrap_or_default();
        Self { store, contacts }
    }

    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Contact> {
        let key = normalize_name(name);
        self.contacts.iter().find(|c| c.name == key)
    }

    /// Add a contact; blank fields and duplicate names are rejected
    pub fn add(&mut self, name: &str, number: &str) -> Result<Contact> {
        let name = normalize_name(name);
        let number = number.trim().to_string();
        if name.is_empty() || number.is_empty() {
            return Err(BraillError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }
        if self.contacts.iter().any(|c| c.name == name) {
            return Err(BraillError::Validation(
                "Contact with this name already exists".to_string(),
            ));
        }

        let contact = Contact { name, number };
        self.contacts.push(contact.clone());
        self.persist();
        info!("[CONTACTS] Added '{}'", contact.name);
        Ok(contact)
    }

    pub fn remove(&mut self, name: &str) -> Result<Contact> {
        let key = normalize_name(name);
        let index = self
            .contacts
            .iter()
            .position(|c| c.name == key)
            .ok_or_else(|| BraillError::NotFound(format!("Contact \"{}\"", key)))?;
        let removed = self.contacts.remove(index);
        self.persist();
        info!("[CONTACTS] Removed '{}'", removed.name);
        Ok(removed)
    }

    fn persist(&self) {
        self.store.save(KEY_CONTACTS, &self.contacts);
    }
}
