//! Serde helpers for Mattermost wire quirks.

/// Mattermost encodes an absent identifier as an empty string.
pub mod empty_string_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `None` as an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<str>,
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map_or("", AsRef::as_ref))
    }

    /// Deserializes an empty string or `null` as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor `null`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<String>,
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()).map(T::from))
    }
}
