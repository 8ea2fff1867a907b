//! Throwaway passwords for new hosted-app accounts.
//!
//! The app requires a password on create; staff sign in through the
//! directory and never see it.

use rand::rngs::OsRng;
use rand::Rng;

/// Special characters the hosted app accepts.
pub const SPECIAL_CHARS: &str = "!#$%&";

pub const PASSWORD_LEN: usize = 32;

/// One character per required class.
pub const MIN_PASSWORD_LEN: usize = 4;

const ALPHABET: &[u8] =
    b"!#$%&0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A [`PASSWORD_LEN`]-character password from the OS RNG.
pub fn generate_password() -> String {
    generate_with(&mut OsRng, PASSWORD_LEN)
}

/// Draw until the password has a lowercase letter, an uppercase letter, a
/// digit and one of [`SPECIAL_CHARS`].
///
/// `len` is raised to [`MIN_PASSWORD_LEN`] when shorter.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let len = len.max(MIN_PASSWORD_LEN);
    loop {
        let candidate: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        if is_acceptable(&candidate) {
            return candidate;
        }
    }
}

pub fn is_acceptable(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}
