//! Protocol modules (club message codec + chain response views).
//!
//! - `message`: the tagged byte encoding stored in a club message's
//!   `vector<u8>` content field.
//! - `shapes`: typed extraction from the JSON the chain returns for objects,
//!   dynamic fields, dev-inspect runs and executed transactions.
//!
//! Both are panic-free: malformed input is reported as `SuiClubError`
//! instead of panicking or indexing raw buffers.

pub mod message;
pub mod shapes;
