//! Account service: registration and profile maintenance.
//!
//! Session handling and login flows live outside this crate; this layer
//! only owns the persisted account records and the password digest.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{CreateUserParams, UpdateProfileParams, UsersRepo};
use crate::domain::entities::UserRecord;

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileEdit {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

pub struct AccountsService {
    users: Arc<dyn UsersRepo>,
}

impl AccountsService {
    pub fn new(users: Arc<dyn UsersRepo>) -> Self {
        Self { users }
    }

    pub async fn register(&self, registration: Registration) -> Result<UserRecord, AppError> {
        let email = registration.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation("email address is not valid"));
        }
        if registration.password.len() < 8 {
            return Err(AppError::validation(
                "password must be at least 8 characters",
            ));
        }

        Ok(self
            .users
            .create_user(CreateUserParams {
                email,
                password_hash: hash_password(&registration.password),
                first_name: registration.first_name,
                last_name: registration.last_name,
                phone: registration.phone,
                country: registration.country,
            })
            .await?)
    }

    pub async fn profile(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        edit: ProfileEdit,
    ) -> Result<UserRecord, AppError> {
        Ok(self
            .users
            .update_profile(UpdateProfileParams {
                id,
                first_name: edit.first_name,
                last_name: edit.last_name,
                phone: edit.phone,
                country: edit.country,
            })
            .await?)
    }
}

/// Salted SHA-256 digest stored as `{salt}${hex}`. Credential verification
/// happens outside this crate; the salt only has to make equal passwords
/// hash differently.
fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest_password(&salt, password))
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
