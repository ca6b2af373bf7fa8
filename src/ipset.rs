use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::sync::Once;

use tracing::{debug, trace};

use crate::binding;
use crate::engine::{Engine, Submission};
use crate::error::{CommandError, Error, ErrorLevel};

static LOAD_TYPES: Once = Once::new();

/// Collects what libipset reports through its callbacks during one command.
#[derive(Default)]
struct Capture {
    error: Option<CommandError>,
    output: String,
}

impl Capture {
    fn into_submission(self, status: i32) -> Submission {
        Submission {
            status,
            error: self.error,
            output: self.output,
        }
    }
}

unsafe fn capture<'a>(p: *mut c_void) -> Option<&'a mut Capture> {
    (p as *mut Capture).as_mut()
}

unsafe fn message(msg: *const c_char) -> String {
    if msg.is_null() {
        String::new()
    } else {
        CStr::from_ptr(msg).to_string_lossy().to_string()
    }
}

/// Structured report channel, called with the session's `ipset_err_type`.
#[no_mangle]
pub unsafe extern "C" fn ipset_rs_on_report(
    p: *mut c_void,
    err_type: c_int,
    msg: *const c_char,
) {
    if let Some(capture) = capture(p) {
        let level = ErrorLevel::from_report_type(err_type);
        capture.error = Some(CommandError::new(level, message(msg)));
    }
}

/// Legacy channel used by the command line parser, called with an `ipset_exittype`.
#[no_mangle]
pub unsafe extern "C" fn ipset_rs_on_custom(
    p: *mut c_void,
    status: c_int,
    msg: *const c_char,
) {
    if let Some(capture) = capture(p) {
        let level = ErrorLevel::from_exit_status(status);
        capture.error = Some(CommandError::new(level, message(msg)));
    }
}

/// Output function required by libipset to get `save`/`list` output.
#[no_mangle]
pub unsafe extern "C" fn ipset_rs_on_output(p: *mut c_void, msg: *const c_char) {
    if let Some(capture) = capture(p) {
        capture.output.push_str(&message(msg));
    }
}

/// An [`Engine`] backed by libipset. The handle is finalized and initialized
/// again before every command, since libipset leaves it unusable after some
/// error classes.
pub struct IPSet {
    set: *mut binding::ipset,
}

impl IPSet {
    /// Load the set types once per process and initialize a handle.
    pub fn new() -> IPSet {
        LOAD_TYPES.call_once(|| unsafe {
            binding::ipset_load_types();
        });
        IPSet {
            set: unsafe { binding::ipset_init() },
        }
    }

    fn reinit(&mut self) {
        unsafe {
            if !self.set.is_null() {
                binding::ipset_fini(self.set);
            }
            self.set = binding::ipset_init();
        }
    }
}

impl Default for IPSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for IPSet {
    fn submit(&mut self, command: &str) -> Result<Submission, Error> {
        let mut line = CString::new(command)?.into_bytes_with_nul();
        self.reinit();
        if self.set.is_null() {
            return Err(Error::Command(CommandError::new(
                ErrorLevel::Unknown,
                "ipset_init failed",
            )));
        }

        let mut capture = Capture::default();
        let status = unsafe {
            binding::ipset_rs_arm(self.set, &mut capture as *mut Capture as *mut c_void);
            let status = binding::ipset_parse_line(self.set, line.as_mut_ptr() as *mut c_char);
            binding::ipset_rs_disarm(self.set);
            status
        };
        debug!(command, status, "ipset command returned");
        trace!(output = %capture.output, "ipset command output");
        Ok(capture.into_submission(status))
    }
}

impl Drop for IPSet {
    fn drop(&mut self) {
        unsafe {
            if !self.set.is_null() {
                binding::ipset_fini(self.set);
            }
        }
    }
}

unsafe impl Send for IPSet {}
