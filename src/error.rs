//! Errors reported by the engine and their classification.
//!
//! libipset has no structured error codes: the only way to tell a missing set
//! from any other failure is its English diagnostic text. Every fragment this
//! crate depends on is listed here, and nowhere else, so an engine upgrade that
//! rewords a message breaks the tests in this file instead of silently changing
//! behavior at a call site.

use std::error::Error as StdError;
use std::ffi::NulError;
use std::fmt::{self, Formatter};

use derive_more::{Display, From};

/// Reported when a command names a set the kernel does not know.
pub const SET_NOT_FOUND: &str = "set with the given name does not exist";

/// Reported by `create` when the name is taken.
pub const SET_ALREADY_EXISTS: &str = "set with the same name already exists";

/// Reported by `add` when the element is already a member.
pub const ELEMENT_ALREADY_ADDED: &str = "Element cannot be added to the set: it's already added";

/// Reported by `del` when the element is not a member.
pub const ELEMENT_NOT_ADDED: &str = "Element cannot be deleted from the set: it's not added";

/// Severity attached to a diagnostic. Ordered so that `level >= ErrorLevel::Error`
/// selects genuine failures, `Unknown` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    None,
    Notice,
    Warning,
    Error,
    Unknown,
}

impl ErrorLevel {
    /// Map an `enum ipset_err_type` value from the structured report channel.
    pub fn from_report_type(err_type: i32) -> Self {
        match err_type {
            0 => ErrorLevel::None,
            1 => ErrorLevel::Notice,
            2 => ErrorLevel::Warning,
            3 => ErrorLevel::Error,
            _ => ErrorLevel::Unknown,
        }
    }

    /// Map an `enum ipset_exittype` value from the legacy custom error channel.
    /// Anything but `IPSET_NO_PROBLEM` aborted the command.
    pub fn from_exit_status(status: i32) -> Self {
        match status {
            0 => ErrorLevel::Notice,
            1..=4 => ErrorLevel::Error,
            _ => ErrorLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::None => "",
            ErrorLevel::Notice => "notice",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Error => "error",
            ErrorLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic captured while one command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub level: ErrorLevel,
    pub message: String,
}

impl CommandError {
    pub fn new(level: ErrorLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: message.as_ref().trim().to_string(),
        }
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.message.contains(fragment)
    }

    pub fn is_error(&self) -> bool {
        self.level >= ErrorLevel::Error
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

impl StdError for CommandError {}

/// Errors defined in this crate.
#[derive(Debug, From, Display)]
pub enum Error {
    #[from(ignore)]
    #[display("set not found ({_0})")]
    SetNotFound(CommandError),
    #[from(ignore)]
    #[display("set exists ({_0})")]
    SetAlreadyExists(CommandError),
    #[from(ignore)]
    #[display("{_0}")]
    Command(CommandError),
    #[from(ignore)]
    #[display("invalid output: '{_0}'")]
    InvalidOutput(String),
    #[from(ignore)]
    #[display("invalid set name: '{_0}'")]
    InvalidName(String),
    #[from(ignore)]
    #[display("invalid argument: '{_0}'")]
    InvalidArgument(String),
    Nul(NulError),
}

impl Error {
    pub fn is_set_not_found(&self) -> bool {
        matches!(self, Error::SetNotFound(_))
    }

    pub fn is_set_already_exists(&self) -> bool {
        matches!(self, Error::SetAlreadyExists(_))
    }

    /// The raw engine diagnostic, whether or not it was classified.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            Error::SetNotFound(err) | Error::SetAlreadyExists(err) | Error::Command(err) => {
                Some(err)
            }
            _ => None,
        }
    }

    pub fn level(&self) -> Option<ErrorLevel> {
        self.command_error().map(|err| err.level)
    }

    pub fn is_error(&self) -> bool {
        match self.command_error() {
            Some(err) => err.is_error(),
            None => true,
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::SetNotFound(err) | Error::SetAlreadyExists(err) => Some(err),
            Error::Nul(err) => Some(err),
            _ => None,
        }
    }
}

/// Layer a semantic error onto a diagnostic when its message is one of the
/// well-known conditions. The diagnostic is kept inside the returned error.
pub fn classify(err: CommandError) -> Error {
    if err.contains(SET_NOT_FOUND) {
        Error::SetNotFound(err)
    } else if err.contains(SET_ALREADY_EXISTS) {
        Error::SetAlreadyExists(err)
    } else {
        Error::Command(err)
    }
}
