/// Rejections from the validated text constructors.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("text must not be blank")]
    Empty,
    /// The input was not a two-letter uppercase country code
    #[error("country code must be two ASCII letters, got: '{0}'")]
    InvalidCountryCode(String),
}

/// Free text for product and report fields (names, batch numbers, descriptions).
///
/// Surrounding whitespace is dropped; what remains must not be empty. Deserialising applies the
/// same rule, so a stored record can never carry a blank name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// [`TextError::Empty`] if `input` is blank.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An ISO 3166-1 alpha-2 style country code (two uppercase ASCII letters).
///
/// Only the shape is checked; the code is not looked up against the ISO list. Lowercase input
/// is uppercased, surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let code = input.as_ref().trim().to_ascii_uppercase();
        if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Ok(Self(code));
        }
        Err(TextError::InvalidCountryCode(input.as_ref().to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for CountryCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CountryCode::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Hennessy VS \n").unwrap();
        assert_eq!(text.as_str(), "Hennessy VS");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_blank() {
        let result = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn country_code_normalises_case() {
        assert_eq!(CountryCode::new(" za ").unwrap().as_str(), "ZA");
    }

    #[test]
    fn country_code_rejects_bad_shapes() {
        for bad in ["", "Z", "ZAF", "Z1", "ÄB"] {
            assert!(
                matches!(CountryCode::new(bad), Err(TextError::InvalidCountryCode(_))),
                "{bad} should be rejected"
            );
        }
    }
}
