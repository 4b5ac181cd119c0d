//! Core infrastructure
//!
//! Cross-cutting pieces shared by the device sources and the session.

pub mod logging;
