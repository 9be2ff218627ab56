//! Verification endpoints: code issuance and code checking. Both are
//! exempt from the access gate by construction (mounted outside the
//! gated scope).

mod send_code;
mod verify_code;

pub use send_code::send_code;
pub use verify_code::verify_code;
