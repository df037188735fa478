//! Types shared between bookhub-server and other Bookhub crates:
//! the error code registry, the response envelopes, and the data models.

pub mod error;
pub mod models;
pub mod response;
