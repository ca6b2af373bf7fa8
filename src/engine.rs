//! The boundary between a [`Session`](crate::Session) and the set-management engine.

use crate::error::{CommandError, Error};

/// Everything the engine reported while running one command.
///
/// libipset hands its diagnostics and output to callbacks that fire during the
/// call; an [`Engine`] collects them and returns them here so that nothing
/// outlives the command that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Return value of the command line parser, 0 on success.
    pub status: i32,
    /// The last diagnostic reported through either error channel.
    pub error: Option<CommandError>,
    /// Output fragments, concatenated in delivery order.
    pub output: String,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Fail with the captured diagnostic, if any. Output is only meaningful
    /// when this returns `Ok`.
    pub fn into_output(self) -> Result<String, CommandError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}

/// A set-management engine that parses and runs one textual command at a time.
pub trait Engine {
    fn submit(&mut self, command: &str) -> Result<Submission, Error>;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn submit(&mut self, command: &str) -> Result<Submission, Error> {
        (**self).submit(command)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn submit(&mut self, command: &str) -> Result<Submission, Error> {
        (**self).submit(command)
    }
}
