//! Claim sets carried in a token payload.
//!
//! A [`ClaimSet`] is a JSON object. The issuer always writes the reserved
//! claims [`SUBJECT`], [`ISSUED_AT`] and [`EXPIRES_AT`]; everything else is
//! supplied by the caller and travels untouched.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Subject identifier.
pub const SUBJECT: &str = "sub";
/// Issued-at, seconds since the Unix epoch.
pub const ISSUED_AT: &str = "iat";
/// Expiry, seconds since the Unix epoch.
pub const EXPIRES_AT: &str = "exp";

/// Claims set by the issuer on every token.
pub const RESERVED_CLAIMS: [&str; 3] = [SUBJECT, ISSUED_AT, EXPIRES_AT];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}

/// Mapping from claim name to any JSON value, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use gatehouse_auth::ClaimSet;
    ///
    /// let claims = ClaimSet::new().with("role", "admin").with("tenant", 42);
    /// assert_eq!(claims.get("role").and_then(|v| v.as_str()), Some("admin"));
    /// ```
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserializes a single claim. `Ok(None)` when the claim is absent.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, serde_json::Error> {
        self.0
            .get(name)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// `sub`, when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.0.get(SUBJECT).and_then(Value::as_str)
    }

    /// `iat`, when it is numeric.
    pub fn issued_at(&self) -> Option<i64> {
        self.numeric(ISSUED_AT)
    }

    /// `exp`, when it is numeric. Fractional timestamps are floored.
    pub fn expires_at(&self) -> Option<i64> {
        self.numeric(EXPIRES_AT)
    }

    fn numeric(&self, name: &str) -> Option<i64> {
        let value = self.0.get(name)?;
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        if value.is_u64() {
            return Some(i64::MAX);
        }
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for ClaimSet {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
