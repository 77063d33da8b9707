//! RSA key material for token signing.

use std::fs;
use std::io;
use std::path::Path;

use rand::rngs::OsRng;
use rsa::pkcs8::EncodePrivateKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::pkcs8::LineEnding;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;
use thiserror::Error;

/// Minimum accepted modulus size, in bits.
pub const MIN_RSA_BITS: usize = 2048;

/// Error type for key material operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Failed to read key file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write key file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to generate RSA key: {0}")]
    GenerationFailed(String),

    #[error("RSA keys must be at least {MIN_RSA_BITS} bits, got {0}")]
    KeyTooSmall(usize),
}

/// Signing and verification keys.
///
/// Loaded (or generated) once at process start and shared read-only across
/// all concurrent operations. The private key never leaves the process;
/// only the token codec reads it.
pub struct KeyMaterial {
    private_key_pem: String,
    public_key_pem: String,
}

impl KeyMaterial {
    /// Read an existing PEM pair from disk.
    ///
    /// A missing or unreadable file is a hard error so a misconfigured
    /// deployment fails at startup, not on the first login.
    pub fn load(private_path: &Path, public_path: &Path) -> Result<Self, KeyError> {
        Ok(Self {
            private_key_pem: read_pem(private_path)?,
            public_key_pem: read_pem(public_path)?,
        })
    }

    /// Generate a fresh RSA keypair of the given modulus size.
    ///
    /// # Errors
    /// * `KeyTooSmall` - Fewer than 2048 bits requested
    /// * `GenerationFailed` - Key generation or PEM encoding failed
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        if bits < MIN_RSA_BITS {
            return Err(KeyError::KeyTooSmall(bits));
        }

        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| KeyError::GenerationFailed(e.to_string()))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_key_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| KeyError::GenerationFailed(e.to_string()))?
            .to_string();
        let public_key_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::GenerationFailed(e.to_string()))?;

        Ok(Self {
            private_key_pem,
            public_key_pem,
        })
    }

    /// Load the pair if both files exist, otherwise generate a keypair and
    /// persist it before first use.
    ///
    /// Development convenience only; production deployments provision key
    /// files ahead of time and use [`KeyMaterial::load`].
    pub fn load_or_generate(
        private_path: &Path,
        public_path: &Path,
        bits: usize,
    ) -> Result<Self, KeyError> {
        if private_path.exists() && public_path.exists() {
            return Self::load(private_path, public_path);
        }

        let keys = Self::generate(bits)?;
        write_pem(private_path, &keys.private_key_pem)?;
        write_pem(public_path, &keys.public_key_pem)?;
        Ok(keys)
    }

    /// Build from PEM strings already in memory (tests, secret stores).
    pub fn from_pem(
        private_key_pem: impl Into<String>,
        public_key_pem: impl Into<String>,
    ) -> Self {
        Self {
            private_key_pem: private_key_pem.into(),
            public_key_pem: public_key_pem.into(),
        }
    }

    /// Private key in PKCS#8 PEM form.
    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }

    /// Public key in SPKI PEM form.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }
}

fn read_pem(path: &Path) -> Result<String, KeyError> {
    fs::read_to_string(path).map_err(|e| KeyError::Read {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_pem(path: &Path, pem: &str) -> Result<(), KeyError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| KeyError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    fs::write(path, pem).map_err(|e| KeyError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_rejects_small_keys() {
        assert!(matches!(
            KeyMaterial::generate(1024),
            Err(KeyError::KeyTooSmall(1024))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("jwt-private.pem");

        let result = KeyMaterial::load(&missing, &missing);
        assert!(matches!(result, Err(KeyError::Read { .. })));
    }

    #[test]
    fn test_load_or_generate_persists_pair() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let private_path = dir.path().join("certs/jwt-private.pem");
        let public_path = dir.path().join("certs/jwt-public.pem");

        let generated = KeyMaterial::load_or_generate(&private_path, &public_path, 2048)
            .expect("Failed to generate keys");

        assert!(private_path.exists());
        assert!(public_path.exists());
        assert!(generated.private_key_pem().contains("BEGIN PRIVATE KEY"));
        assert!(generated.public_key_pem().contains("BEGIN PUBLIC KEY"));

        // Second call loads the persisted pair instead of regenerating
        let loaded = KeyMaterial::load_or_generate(&private_path, &public_path, 2048)
            .expect("Failed to load keys");
        assert_eq!(loaded.private_key_pem(), generated.private_key_pem());
        assert_eq!(loaded.public_key_pem(), generated.public_key_pem());
    }
}
