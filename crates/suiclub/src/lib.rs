//! Top-level facade crate for suiclub.
//!
//! Re-exports the message codec and the demo clients so users can depend on a single crate.

pub mod core {
    pub use suiclub_core::*;
}

pub mod demo {
    pub use suiclub_demo::*;
}
