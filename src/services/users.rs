use thiserror::Error;

use crate::{
    models::user::{DEFAULT_AVATAR_PATH, User},
    services::{
        email::{Mailer, password_reset_message},
        otp::{OTP_LENGTH, generate_otp},
    },
    storage::connector::RecordStore,
};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("An account already exists for email '{0}'")]
    EmailTaken(String),

    #[error("Failed to persist account '{0}'")]
    SaveFailed(String),
}

pub struct RegisterParameters {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// Registers a new account. Username and email uniqueness are enforced
/// here, at the registration boundary; the store itself stays permissive.
pub fn register_user(
    store: &RecordStore,
    parameters: RegisterParameters,
) -> Result<(), RegisterError> {
    let users = store.all_users();
    if users.iter().any(|u| u.username == parameters.username) {
        return Err(RegisterError::UsernameTaken(parameters.username));
    }
    let normalized = parameters.email.trim().to_lowercase();
    if users
        .iter()
        .any(|u| u.email.trim().to_lowercase() == normalized)
    {
        return Err(RegisterError::EmailTaken(parameters.email));
    }

    let user = User {
        name: parameters.name,
        email: parameters.email,
        phone: parameters.phone,
        username: parameters.username.clone(),
        password: parameters.password,
        avatar: parameters
            .avatar
            .unwrap_or_else(|| DEFAULT_AVATAR_PATH.to_string()),
    };

    if !store.add_user(user) {
        return Err(RegisterError::SaveFailed(parameters.username));
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum PasswordResetError {
    #[error("No account matches email '{0}'")]
    UnknownEmail(String),

    #[error("Could not send the reset code to '{0}'")]
    SendFailed(String),

    #[error("The reset code does not match")]
    CodeMismatch,

    #[error("Failed to store the new password for '{0}'")]
    UpdateFailed(String),
}

/// Generates a reset code and mails it to the account with the given email.
/// Returns the code; the caller holds it for the comparison step.
pub fn begin_password_reset(
    store: &RecordStore,
    mailer: &impl Mailer,
    email: &str,
) -> Result<String, PasswordResetError> {
    let normalized = email.trim().to_lowercase();
    let Some(user) = store
        .all_users()
        .into_iter()
        .find(|u| u.email.trim().to_lowercase() == normalized)
    else {
        return Err(PasswordResetError::UnknownEmail(email.to_string()));
    };

    let code = generate_otp(OTP_LENGTH);
    let (subject, body) = password_reset_message(&code);
    if !mailer.send(&user.email, &subject, &body) {
        return Err(PasswordResetError::SendFailed(user.email));
    }
    Ok(code)
}

/// Compares the supplied code against the expected one and stores the new
/// password digest on match.
pub fn complete_password_reset(
    store: &RecordStore,
    email: &str,
    expected_code: &str,
    supplied_code: &str,
    new_password: &str,
) -> Result<(), PasswordResetError> {
    if supplied_code.trim() != expected_code {
        return Err(PasswordResetError::CodeMismatch);
    }
    if !store.update_password(email, new_password) {
        return Err(PasswordResetError::UpdateFailed(email.to_string()));
    }
    Ok(())
}
