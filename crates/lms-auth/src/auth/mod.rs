//! Session token issuance and verification.

pub mod claims;
pub mod clock;
pub mod token_codec;

pub use clock::{Clock, FixedClock, SystemClock};
pub use token_codec::{DecodedToken, IssuedToken, TokenCodec, TokenError};
