use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{ProfileStore, ACCOUNTS_KEY, SESSION_KEY};
use crate::types::{SubscriptionTier, UserProfile};

/// A registered account: profile plus credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    profile: UserProfile,
    password: String,
}

type AccountTable = HashMap<String, StoredAccount>;

/// Mock local authentication over the profile store.
///
/// This is a demo stand-in: credentials are kept in plaintext in local
/// storage. Any real deployment must swap in an actual credential service
/// behind the same `ProfileStore` seam.
pub struct AuthService {
    store: Box<dyn ProfileStore>,
}

impl AuthService {
    pub fn new(store: Box<dyn ProfileStore>) -> Self {
        AuthService { store }
    }

    /// Read the persisted session once at startup.
    pub fn load_session(&self) -> Result<Option<UserProfile>> {
        match self.store.read(SESSION_KEY)? {
            Some(blob) => {
                let profile = serde_json::from_str(&blob)
                    .map_err(|e| Error::Storage(format!("corrupt session blob: {e}")))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        let mut accounts = self.load_accounts()?;
        if accounts.contains_key(email) {
            return Err(Error::DuplicateAccount(email.to_string()));
        }

        let profile = UserProfile {
            name: name.to_string(),
            picture: format!(
                "https://ui-avatars.com/api/?name={}",
                name.replace(' ', "+")
            ),
            subscription_tier: SubscriptionTier::Free,
            email: Some(email.to_string()),
            notifications_enabled: Some(true),
        };

        accounts.insert(
            email.to_string(),
            StoredAccount {
                profile: profile.clone(),
                password: password.to_string(),
            },
        );
        self.save_accounts(&accounts)?;
        self.save_session(&profile)?;
        Ok(profile)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let accounts = self.load_accounts()?;
        let account = accounts.get(email).ok_or(Error::InvalidCredentials)?;
        if account.password != password {
            return Err(Error::InvalidCredentials);
        }
        self.save_session(&account.profile)?;
        Ok(account.profile.clone())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    /// Persist edited settings to the session and, when the profile is a
    /// registered account, back to the account table.
    pub fn save_settings(&self, profile: &UserProfile) -> Result<()> {
        self.save_session(profile)?;
        if let Some(email) = &profile.email {
            let mut accounts = self.load_accounts()?;
            if let Some(account) = accounts.get_mut(email) {
                account.profile = profile.clone();
                self.save_accounts(&accounts)?;
            }
        }
        Ok(())
    }

    /// Move the profile to the premium tier and persist the change.
    pub fn upgrade(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut upgraded = profile.clone();
        upgraded.subscription_tier = SubscriptionTier::Premium;
        self.save_settings(&upgraded)?;
        Ok(upgraded)
    }

    fn save_session(&self, profile: &UserProfile) -> Result<()> {
        let blob = serde_json::to_string(profile)
            .map_err(|e| Error::Storage(e.to_string()))?;
        self.store.write(SESSION_KEY, &blob)
    }

    fn load_accounts(&self) -> Result<AccountTable> {
        match self.store.read(ACCOUNTS_KEY)? {
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|e| Error::Storage(format!("corrupt account table: {e}"))),
            None => Ok(AccountTable::new()),
        }
    }

    fn save_accounts(&self, accounts: &AccountTable) -> Result<()> {
        let blob = serde_json::to_string(accounts)
            .map_err(|e| Error::Storage(e.to_string()))?;
        self.store.write(ACCOUNTS_KEY, &blob)
    }
}
