//! Client SDK for the ILN essence engine.

pub mod client;

pub use client::{ClientError, IlnClient, ProcessRequest, ProcessResponse};
