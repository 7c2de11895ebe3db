//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName, user_password::UserPassword,
};

/// Optional contact details, stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Persisted user account
#[derive(Debug, Clone)]
pub struct User {
    /// Database-assigned identifier, the token subject
    pub id: UserId,
    pub name: PersonName,
    /// Unique, lower-cased
    pub email: Email,
    /// Unique when present. Accounts created through `/user` may lack one.
    pub user_name: Option<UserName>,
    pub password: UserPassword,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User not yet persisted (no id)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: PersonName,
    pub email: Email,
    pub user_name: Option<UserName>,
    pub password: UserPassword,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        name: PersonName,
        email: Email,
        user_name: Option<UserName>,
        password: UserPassword,
        profile: UserProfile,
    ) -> Self {
        Self {
            name,
            email,
            user_name,
            password,
            profile,
            created_at: Utc::now(),
        }
    }

    /// Attach the id assigned by storage.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            user_name: self.user_name,
            password: self.password,
            profile: self.profile,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<PersonName>,
    pub email: Option<Email>,
    pub user_name: Option<UserName>,
    pub password: Option<UserPassword>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl User {
    /// True if `identifier` is this user's email or user name.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.email.as_str() == Email::normalize_lookup(identifier)
            || self
                .user_name
                .as_ref()
                .is_some_and(|name| name.as_str() == identifier.trim())
    }

    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(user_name) = changes.user_name {
            self.user_name = Some(user_name);
        }
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(dob) = changes.dob {
            self.profile.dob = Some(dob);
        }
        if let Some(phone) = changes.phone {
            self.profile.phone = Some(phone);
        }
        if let Some(address) = changes.address {
            self.profile.address = Some(address);
        }
        if let Some(city) = changes.city {
            self.profile.city = Some(city);
        }
        self.updated_at = Utc::now();
    }

    /// Swap in a re-hashed password (legacy digest upgrade).
    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }
}
