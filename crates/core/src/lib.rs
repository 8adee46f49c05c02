//! Domain logic for the upload-to-data-URI service.
//!
//! Everything here is synchronous and free of I/O so the HTTP layer in
//! `dataurl-api` stays a thin shell around these functions.

pub mod data_uri;
pub mod error;
pub mod media_type;
pub mod sniff;
