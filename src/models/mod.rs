//! Model definitions.

#[cfg(feature = "google")]
pub mod google;

#[cfg(feature = "google")]
pub use google::GoogleModel;
