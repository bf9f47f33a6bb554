use std::fmt;

/// The main error type for view2lua file handling and conversion.
///
/// Parsing itself is lenient and never fails; these errors come from the
/// file system and project lookups around it.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// A source file, component or reference template does not exist.
    NotFound {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when input cannot be decoded at all (e.g. not UTF-8).
    MalformedInput {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    RuntimeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl ViewError {
    pub fn code(&self) -> Option<u32> {
        match self {
            ViewError::NotFound { code, .. }
            | ViewError::FileError { code, .. }
            | ViewError::MalformedInput { code, .. }
            | ViewError::RuntimeError { code, .. } => *code,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewError::NotFound { .. })
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::NotFound { message, path, hint, code } =>
                write!(f, "[VIEW2LUA] Not Found '{}': {}{}{}",
                    path, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            ViewError::FileError { message, path, hint, code } =>
                write!(f, "[VIEW2LUA] File Error '{}': {}{}{}",
                    path, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            ViewError::MalformedInput { message, path, hint, code } =>
                write!(f, "[VIEW2LUA] Malformed Input '{}': {}{}{}",
                    path, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            ViewError::RuntimeError { message, hint, code } =>
                write!(f, "[VIEW2LUA] Runtime Error: {}{}{}",
                    message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
        }
    }
}

impl std::error::Error for ViewError {}
