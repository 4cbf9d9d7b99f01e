//! Best-effort byte decoding.

use std::borrow::Cow;

/// Text decoded from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    /// Set when invalid UTF-8 sequences were replaced.
    pub lossy: bool,
}

/// Decode a response body as UTF-8, replacing invalid sequences instead of failing.
pub fn decode(bytes: &[u8]) -> Decoded<'_> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Decoded {
            text: Cow::Borrowed(text),
            lossy: false,
        },
        Err(e) => {
            log::debug!(
                "Body is not valid UTF-8 after {} bytes, decoding lossily",
                e.valid_up_to()
            );
            Decoded {
                text: String::from_utf8_lossy(bytes),
                lossy: true,
            }
        }
    }
}
