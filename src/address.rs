//! Textual address representation used in `add`, `del` and `test` commands.

use std::net::IpAddr;

/// Format `addr` as the engine expects it in a command.
///
/// An IPv4-mapped IPv6 address is written in dotted form, matching what an
/// `inet` set accepts. With `coerce`, IPv4 addresses are instead written as
/// `::ffff:a.b.c.d` so they can be stored in an `inet6` set. IPv6 addresses
/// are never rewritten.
pub fn format_address(addr: IpAddr, coerce: bool) -> String {
    match addr.to_canonical() {
        IpAddr::V4(v4) if coerce => format!("::ffff:{}", v4),
        canonical => canonical.to_string(),
    }
}
