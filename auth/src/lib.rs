//! Authentication infrastructure library
//!
//! Reusable building blocks for credential handling:
//! - Password hashing (Argon2id, salted, tunable work factor)
//! - Access token signing and verification (RS256 keypair)
//! - RSA key material loading and development-mode generation
//!
//! The service crate defines its own domain traits and adapts these
//! implementations. Nothing here touches the database or the web layer;
//! the only I/O is reading and writing key files.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```no_run
//! use auth::KeyMaterial;
//! use auth::TokenCodec;
//! use chrono::Utc;
//!
//! let keys = KeyMaterial::generate(2048).unwrap();
//! let codec = TokenCodec::with_default_ttl(&keys).unwrap();
//! let token = codec.issue(42, "alice", Utc::now()).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod jwt;
pub mod keys;
pub mod password;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use keys::KeyError;
pub use keys::KeyMaterial;
pub use password::PasswordError;
pub use password::PasswordHasher;
