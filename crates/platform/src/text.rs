//! Fixed-capacity text that truncates instead of overflowing.
//!
//! Every string that crosses the message bus has a capacity fixed at build
//! time. Oversized input is cut at the last whole UTF-8 character that fits,
//! at construction, so consumers never have to re-check lengths.

use core::fmt;

use heapless::String;

/// Capacity of an IPv4 dotted-quad, including room for `"????"`.
pub const IP_TEXT_LEN: usize = 16;

/// IP address as shown on the display.
pub type IpText = String<IP_TEXT_LEN>;

/// Placeholder shown while there is no address.
pub const UNKNOWN_IP: &str = "????";

/// Copy `s` into a `String<N>`, dropping whatever does not fit.
///
/// Truncation happens on a character boundary, so the result is always
/// valid UTF-8 and never longer than `N` bytes.
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `true` when `s` fits into a `String<N>` unchanged.
pub fn fits<const N: usize>(s: &str) -> bool {
    s.len() <= N
}

/// `core::fmt::Write` sink that keeps the prefix that fits.
///
/// `write!` into a bare `heapless::String` fails halfway on overflow and
/// leaves a partial result behind; this writer never fails and records that
/// truncation happened instead.
///
/// ```
/// use core::fmt::Write;
/// use platform::TruncatingWriter;
///
/// let mut w = TruncatingWriter::<4>::new();
/// write!(w, "{} C", 123).ok();
/// assert_eq!(w.as_str(), "123 ");
/// assert!(w.was_truncated());
/// ```
#[derive(Debug, Default)]
pub struct TruncatingWriter<const N: usize> {
    buf: String<N>,
    truncated: bool,
}

impl<const N: usize> TruncatingWriter<N> {
    /// Empty writer.
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            truncated: false,
        }
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    /// Whether any input was dropped.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Take the underlying string.
    pub fn into_inner(self) -> String<N> {
        self.buf
    }
}

impl<const N: usize> fmt::Write for TruncatingWriter<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for c in s.chars() {
            if self.buf.push(c).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}
