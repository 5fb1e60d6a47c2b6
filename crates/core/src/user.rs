//! User profile rules: password policy and UI theme.

use crate::error::CoreError;

/// Minimum password length for new accounts and password changes.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const THEME_DARK: &str = "dark";
pub const THEME_LIGHT: &str = "light";

/// All accepted theme values.
pub const VALID_THEMES: &[&str] = &[THEME_DARK, THEME_LIGHT];

/// Validate that a theme string is one of [`VALID_THEMES`].
pub fn validate_theme(theme: &str) -> Result<(), CoreError> {
    if VALID_THEMES.contains(&theme) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid theme '{theme}'. Must be one of: {VALID_THEMES:?}"
        )))
    }
}

/// Validate that a password meets the minimum length.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
