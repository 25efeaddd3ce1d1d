use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Shared HMAC secret.
///
/// Both halves of the jsonwebtoken key pair are derived once at construction.
/// Clones share the same allocation, so one key can back any number of
/// issuers and authorizers across threads.
#[derive(Clone)]
pub struct SigningKey(Arc<Keys>);

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    empty: bool,
}

impl SigningKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self(Arc::new(Keys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            empty: secret.is_empty(),
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.0.empty
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.0.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.0.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("empty", &self.0.empty)
            .finish()
    }
}
