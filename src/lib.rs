//! A command session client for `libipset`.
//! Support the following commands:
//! * create
//! * destroy
//! * flush
//! * save (as [`Session::describe`])
//! * add
//! * del
//! * test
//!
//! Every operation is written as an ipset command line. The engine reports
//! failures only as text, which is classified into [`Error`]: callers check
//! [`Error::is_set_not_found`] and [`Error::is_set_already_exists`] first and
//! fall back to the level and message of [`Error::command_error`].
//!
//! The libipset backend is behind the `libipset` feature; any other backend
//! can be plugged in by implementing [`Engine`].
//!
//! # Example
//! With the `libipset` feature, `Session::with_engine(IPSet::new())` drives the
//! kernel. Any [`Engine`] works the same way; this one only records commands:
//! ```
//! use ipset_session::{CreateOptions, Engine, Error, Session, Submission};
//!
//! #[derive(Default)]
//! struct Recorder(Vec<String>);
//!
//! impl Engine for Recorder {
//!     fn submit(&mut self, command: &str) -> Result<Submission, Error> {
//!         self.0.push(command.to_string());
//!         Ok(Submission::default())
//!     }
//! }
//!
//! fn main() -> Result<(), Error> {
//!     let mut session = Session::with_engine(Recorder::default());
//!     let options = CreateOptions::new().with_timeout(604800);
//!     match session.create("bl", &options) {
//!         Err(err) if err.is_set_already_exists() => {}
//!         other => other?,
//!     }
//!     assert!(session.add("bl", "1.2.3.5".parse().unwrap())?);
//!     assert!(session.test_coerced("bl", "1.2.3.4".parse().unwrap())?);
//!
//!     assert_eq!(
//!         session.into_engine().0,
//!         [
//!             "create bl hash:ip family inet timeout 604800",
//!             "add bl 1.2.3.5",
//!             "test bl ::ffff:1.2.3.4",
//!         ]
//!     );
//!     Ok(())
//! }
//! ```

pub use engine::{Engine, Submission};
pub use error::{classify, CommandError, Error, ErrorLevel};
#[cfg(feature = "libipset")]
pub use ipset::IPSet;
pub use ipset_session_derive::SetType;
pub use session::Session;
pub use types::{
    CreateOptions, Family, HashIp, HashIpMac, HashIpPort, HashMac, HashNet, HashNetPort, ListSet,
    SetDescriptor, SetType,
};

/// A session driving libipset.
#[cfg(feature = "libipset")]
pub type IpsetSession = Session<IPSet>;

pub mod address;
#[cfg(feature = "libipset")]
#[allow(non_camel_case_types)]
#[allow(unused)]
#[allow(non_upper_case_globals)]
#[allow(non_snake_case)]
mod binding;
mod engine;
pub mod error;
#[cfg(feature = "libipset")]
mod ipset;
#[cfg(test)]
mod mock;
mod session;
mod types;
