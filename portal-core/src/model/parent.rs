//! Parent accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, EmergencyContact, Guardian};
use crate::password::hash_password;

/// A parent account.
///
/// `verification_token` is `Some` exactly while `is_verified` is false.
///
/// Serialize-only: the password hash is never written out, so a
/// serialized parent cannot be read back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parent {
    /// Surrogate id
    pub id: i64,
    /// Business identifier, `PO-YYYY-Mon-NNNNN`
    pub parent_id: String,
    /// Login email, unique across parents
    pub email: String,
    /// SHA-256 digest of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the email was confirmed
    pub is_verified: bool,
    /// One-time email confirmation token
    pub verification_token: Option<String>,
    /// Father's details
    pub father: Guardian,
    /// Mother's details
    pub mother: Guardian,
    /// Where the family lives now
    pub current_address: Address,
    /// Permanent address
    pub permanent_address: Address,
    /// Emergency contact
    pub emergency: EmergencyContact,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a parent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParent {
    /// Login email
    pub email: String,
    /// Plaintext password, hashed before it is stored
    pub password: String,
    /// Father's details
    pub father: Guardian,
    /// Mother's details
    pub mother: Guardian,
    /// Current address
    pub current_address: Address,
    /// Permanent address; the current address when absent
    pub permanent_address: Option<Address>,
    /// Emergency contact
    pub emergency: EmergencyContact,
}

impl std::fmt::Debug for NewParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewParent")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("father", &self.father)
            .field("mother", &self.mother)
            .field("current_address", &self.current_address)
            .field("permanent_address", &self.permanent_address)
            .field("emergency", &self.emergency)
            .finish()
    }
}

impl NewParent {
    /// Build the stored record: hash the password, default the permanent
    /// address, start unverified with `verification_token`.
    pub(crate) fn into_record(
        self,
        id: i64,
        parent_id: String,
        verification_token: String,
        now: DateTime<Utc>,
    ) -> Parent {
        let permanent_address = self
            .permanent_address
            .unwrap_or_else(|| self.current_address.clone());

        Parent {
            id,
            parent_id,
            email: self.email,
            password_hash: hash_password(&self.password),
            is_verified: false,
            verification_token: Some(verification_token),
            father: self.father,
            mother: self.mother,
            current_address: self.current_address,
            permanent_address,
            emergency: self.emergency,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a parent profile.
///
/// Verification state changes only through `verify_parent` and
/// `reissue_verification_token`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentUpdate {
    /// New login email
    pub email: Option<String>,
    /// New plaintext password
    pub password: Option<String>,
    /// New father block
    pub father: Option<Guardian>,
    /// New mother block
    pub mother: Option<Guardian>,
    /// New current address
    pub current_address: Option<Address>,
    /// New permanent address
    pub permanent_address: Option<Address>,
    /// New emergency contact
    pub emergency: Option<EmergencyContact>,
}

impl std::fmt::Debug for ParentUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParentUpdate")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("father", &self.father)
            .field("mother", &self.mother)
            .field("current_address", &self.current_address)
            .field("permanent_address", &self.permanent_address)
            .field("emergency", &self.emergency)
            .finish()
    }
}

impl ParentUpdate {
    /// Merge into `parent` and refresh `updated_at`.
    pub fn apply(self, parent: &mut Parent, now: DateTime<Utc>) {
        if let Some(email) = self.email {
            parent.email = email;
        }
        if let Some(password) = self.password {
            parent.password_hash = hash_password(&password);
        }
        if let Some(father) = self.father {
            parent.father = father;
        }
        if let Some(mother) = self.mother {
            parent.mother = mother;
        }
        if let Some(address) = self.current_address {
            parent.current_address = address;
        }
        if let Some(address) = self.permanent_address {
            parent.permanent_address = address;
        }
        if let Some(emergency) = self.emergency {
            parent.emergency = emergency;
        }
        parent.updated_at = now;
    }
}

impl Parent {
    /// Mark the email as confirmed and drop the token.
    pub(crate) fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.is_verified = true;
        self.verification_token = None;
        self.updated_at = now;

        // Postcondition
        assert!(
            self.verification_token.is_none(),
            "verified parent must not keep a token"
        );
    }
}
