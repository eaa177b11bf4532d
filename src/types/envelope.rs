//! The `{data, meta}` wrapper every API response uses.

use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    /// Operation payload; may be null even on success.
    pub data: Option<T>,

    /// Status information mirrored from the HTTP exchange.
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

impl<T> Envelope<T> {
    /// Returns the payload, or `T::default()` when it is null.
    pub fn into_data_or_default(self) -> T
    where
        T: Default,
    {
        self.data.unwrap_or_default()
    }
}

/// Envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Meta {
    /// Human-readable message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    /// HTTP-mirroring status code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: u16,

    /// Success flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
