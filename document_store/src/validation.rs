//! Validation module
//!
//! Collection names and document field paths end up inlined in SQL text, so both are
//! checked here before any statement is generated.

use std::fmt;

/// Validation errors for collection names and field paths
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
    /// Field path has an empty segment, e.g. `profile..city`
    EmptySegment(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
            ValidationError::EmptySegment(path) => {
                write!(f, "Field path '{}' contains an empty segment", path)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// PostgreSQL identifier length limit
const MAX_LENGTH: usize = 63;

/// Shared identifier rules: non-empty, bounded, `[A-Za-z_][A-Za-z0-9_]*`
fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > MAX_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_LENGTH,
        });
    }

    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}

/// A validated collection name, used as the backing table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedCollectionName(String);

impl ValidatedCollectionName {
    /// Create a new validated collection name
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;

        if Self::is_reserved_keyword(name) {
            return Err(ValidationError::ReservedKeyword(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    /// Get the validated name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the validated name as a String
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check if a name is a reserved SQL keyword
    fn is_reserved_keyword(name: &str) -> bool {
        const RESERVED_KEYWORDS: &[&str] = &[
            "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT",
            "RIGHT", "FULL", "OUTER", "ON", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
            "CASE", "WHEN", "THEN", "ELSE", "END", "IF", "EXISTS", "IN", "LIKE", "BETWEEN",
            "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT",
            "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "DATABASE", "SCHEMA",
            "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT",
            "CONSTRAINT", "COLUMN", "USER", "RETURNING", "CONFLICT", "EXCLUDED", "TRIGGER",
            "FUNCTION",
        ];

        RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
    }
}

impl fmt::Display for ValidatedCollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated document field path such as `email` or `profile.city`
///
/// Each dot-separated segment follows the identifier rules, which keeps the
/// rendered JSONB path literal free of quotes and braces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedFieldName(String);

impl ValidatedFieldName {
    /// Create a new validated field path
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Empty);
        }

        for segment in name.split('.') {
            if segment.is_empty() {
                return Err(ValidationError::EmptySegment(name.to_string()));
            }
            validate_identifier(segment)?;
        }

        Ok(Self(name.to_string()))
    }

    /// Get the validated name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// PostgreSQL text-array path literal, e.g. `'{profile,city}'`
    pub fn to_json_path(&self) -> String {
        format!("'{{{}}}'", self.segments().collect::<Vec<_>>().join(","))
    }
}

impl fmt::Display for ValidatedFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_collection_names() {
        let max_length_name = "a".repeat(63);
        let valid_names = [
            "users",
            "user_profiles",
            "UserProfiles",
            "_private_collection",
            "collection123",
            "a",
            max_length_name.as_str(),
        ];

        for name in valid_names {
            assert!(
                ValidatedCollectionName::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_collection_names() {
        let test_cases = [
            ("", ValidationError::Empty),
            (
                "123users",
                ValidationError::InvalidStartCharacter("123users".to_string()),
            ),
            (
                "user-accounts",
                ValidationError::InvalidCharacters("user-accounts".to_string()),
            ),
            (
                "users; drop",
                ValidationError::InvalidCharacters("users; drop".to_string()),
            ),
            (
                "select",
                ValidationError::ReservedKeyword("select".to_string()),
            ),
            ("user", ValidationError::ReservedKeyword("user".to_string())),
        ];

        for (name, expected_error) in test_cases {
            let result = ValidatedCollectionName::new(name);
            assert_eq!(result.unwrap_err(), expected_error, "name: {}", name);
        }
    }

    #[test]
    fn test_too_long_name() {
        let long_name = "a".repeat(64);
        match ValidatedCollectionName::new(&long_name).unwrap_err() {
            ValidationError::TooLong {
                length, max_length, ..
            } => {
                assert_eq!(length, 64);
                assert_eq!(max_length, 63);
            }
            other => panic!("Expected TooLong error, got {:?}", other),
        }
    }

    #[test]
    fn test_field_paths() {
        assert!(ValidatedFieldName::new("is_deleted").is_ok());
        assert!(ValidatedFieldName::new("profile.city").is_ok());
        // Keywords are fine inside a JSON path, they never become SQL identifiers
        assert!(ValidatedFieldName::new("order").is_ok());

        assert_eq!(
            ValidatedFieldName::new("profile..city").unwrap_err(),
            ValidationError::EmptySegment("profile..city".to_string())
        );
        assert_eq!(
            ValidatedFieldName::new("name'}").unwrap_err(),
            ValidationError::InvalidCharacters("name'}".to_string())
        );
        assert_eq!(
            ValidatedFieldName::new("profile.9city").unwrap_err(),
            ValidationError::InvalidStartCharacter("9city".to_string())
        );
    }

    #[test]
    fn test_json_path_rendering() {
        let single = ValidatedFieldName::new("is_active").unwrap();
        assert_eq!(single.to_json_path(), "'{is_active}'");

        let nested = ValidatedFieldName::new("profile.address.city").unwrap();
        assert_eq!(nested.to_json_path(), "'{profile,address,city}'");
    }
}
