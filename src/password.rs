use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// One-way hash of a plaintext password (Argon2id, random salt).
/// Deliberately expensive; the digest is the only form a password is
/// ever stored or returned in.
pub fn hash(plaintext: &str) -> String {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .expect("Argon2 hashing should not fail")
        .to_string()
}

/// Check a plaintext password against a stored digest.
pub fn compare(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
