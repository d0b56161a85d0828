/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // LogicalPath validation errors
    PathTooLong {
        actual: usize,
        max: usize,
    },
    InvalidPathCharacter(char),
    PathStartsWithSlash,
    PathContainsDoubleSlash,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::PathTooLong { actual, max } => {
                write!(f, "Logical path too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidPathCharacter(c) => {
                write!(f, "Invalid character in logical path: '{}'", c)
            }
            ValidationError::PathStartsWithSlash => {
                write!(f, "Logical path cannot start with '/'")
            }
            ValidationError::PathContainsDoubleSlash => {
                write!(f, "Logical path cannot contain '//'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
