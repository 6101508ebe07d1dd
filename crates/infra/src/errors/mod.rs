//! Infrastructure error plumbing
//!
//! External library errors are converted into [`InkpostError`] on the
//! infrastructure side so the domain crate stays free of I/O dependencies.
//!
//! [`InkpostError`]: inkpost_domain::InkpostError

mod conversions;

pub use conversions::InfraError;
