use std::net::IpAddr;

use tracing::debug;

use crate::address::format_address;
use crate::engine::{Engine, Submission};
use crate::error::{classify, Error, ErrorLevel, ELEMENT_ALREADY_ADDED, ELEMENT_NOT_ADDED};
use crate::types::{CreateOptions, SetDescriptor};

/// This is the main entry for all the operations. Each operation is written as
/// an ipset command line and handed to the engine; the diagnostics it reports
/// are classified into [`Error`].
///
/// One command runs at a time. Open more sessions for concurrent use.
pub struct Session<E: Engine> {
    engine: E,
}

impl<E: Engine> Session<E> {
    pub fn with_engine(engine: E) -> Session<E> {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run a raw command line and return what the engine reported, unclassified.
    pub fn execute(&mut self, command: &str) -> Result<Submission, Error> {
        debug!(command, "submitting ipset command");
        self.engine.submit(command)
    }

    /// Run a command that fails on any captured diagnostic, returning its output.
    fn run_cmd(&mut self, command: String) -> Result<String, Error> {
        self.execute(&command)?.into_output().map_err(|err| {
            debug!(%command, %err, "ipset command failed");
            classify(err)
        })
    }

    /// Run all the address related commands, like add/del/test
    fn data_cmd(
        &mut self,
        cmd: &str,
        name: &str,
        addr: IpAddr,
        coerce: bool,
    ) -> Result<Submission, Error> {
        check_name(name)?;
        let command = format!("{} {} {}", cmd, name, format_address(addr, coerce));
        self.execute(&command)
    }

    /// Create a set `name` configured by `options`.
    pub fn create(&mut self, name: &str, options: &CreateOptions) -> Result<(), Error> {
        check_name(name)?;
        check_token(&options.typename)?;
        let mut command = format!("create {} {}", name, options.typename);
        if let Some(family) = &options.family {
            check_token(family.as_str())?;
            command.push_str(&format!(" family {}", family));
        }
        if let Some(timeout) = options.timeout {
            command.push_str(&format!(" timeout {}", timeout));
        }
        self.run_cmd(command).map(|_| ())
    }

    /// Destroy the set `name`
    pub fn destroy(&mut self, name: &str) -> Result<(), Error> {
        check_name(name)?;
        self.run_cmd(format!("destroy {}", name)).map(|_| ())
    }

    /// Remove all the members of the set `name`
    pub fn flush(&mut self, name: &str) -> Result<(), Error> {
        check_name(name)?;
        self.run_cmd(format!("flush {}", name)).map(|_| ())
    }

    /// Describe the set `name` from the first line of its `save` output.
    pub fn describe(&mut self, name: &str) -> Result<SetDescriptor, Error> {
        check_name(name)?;
        self.run_cmd(format!("save {}", name))?.parse()
    }

    /// Add `addr` into the set `name`. Adding a member twice is not an error.
    pub fn add(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("add", name, addr, false)?;
        added(submission)
    }

    /// Add `addr` into the IPv6 set `name`, writing IPv4 addresses in their
    /// IPv4-mapped form.
    pub fn add_coerced(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("add", name, addr, true)?;
        added(submission)
    }

    /// Delete `addr` from the set `name`. Returns `false` if it was not a member.
    pub fn del(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("del", name, addr, false)?;
        deleted(submission)
    }

    /// [`Session::del`] with the address coercion of [`Session::add_coerced`].
    pub fn del_coerced(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("del", name, addr, true)?;
        deleted(submission)
    }

    /// Test if `addr` is in the set `name`
    pub fn test(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("test", name, addr, false)?;
        tested(submission)
    }

    /// [`Session::test`] with the address coercion of [`Session::add_coerced`].
    pub fn test_coerced(&mut self, name: &str, addr: IpAddr) -> Result<bool, Error> {
        let submission = self.data_cmd("test", name, addr, true)?;
        tested(submission)
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// Set names are embedded in a whitespace separated command line.
fn check_name(name: &str) -> Result<(), Error> {
    if is_token(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Option values must stay a single token as well.
fn check_token(value: &str) -> Result<(), Error> {
    if is_token(value) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(value.to_string()))
    }
}

fn added(submission: Submission) -> Result<bool, Error> {
    let status = submission.status;
    match submission.error {
        None => Ok(status == 0),
        Some(err) if err.contains(ELEMENT_ALREADY_ADDED) => {
            debug!(%err, "element already in set");
            Ok(true)
        }
        Some(err) => Err(classify(err)),
    }
}

fn deleted(submission: Submission) -> Result<bool, Error> {
    let status = submission.status;
    match submission.error {
        None => Ok(status == 0),
        Some(err) if err.contains(ELEMENT_NOT_ADDED) => {
            debug!(%err, "element not in set");
            Ok(false)
        }
        Some(err) => Err(classify(err)),
    }
}

/// The engine reports membership through the diagnostic channel: a notice for
/// a member, a warning with a failed status for an absent address. Only
/// diagnostics at error level or above are failures.
fn tested(submission: Submission) -> Result<bool, Error> {
    match submission.error {
        Some(err) if err.level >= ErrorLevel::Error => Err(classify(err)),
        Some(err) => {
            debug!(%err, status = submission.status, "membership reported");
            Ok(submission.status == 0)
        }
        None => Ok(submission.status == 0),
    }
}
