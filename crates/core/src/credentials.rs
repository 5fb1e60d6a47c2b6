//! Temporary credentials for accounts created on someone else's behalf.

use rand::Rng;

/// Length of generated temporary passwords.
pub const TEMP_PASSWORD_LENGTH: usize = 16;

/// Generate a random alphanumeric password.
///
/// Used when a lead is converted into a client account: the plaintext is
/// returned once in the conversion response and only its hash is stored.
pub fn generate_temporary_password() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TEMP_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
