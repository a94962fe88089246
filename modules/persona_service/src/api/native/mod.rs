//! In-process API

pub mod client;

pub use client::NativeClient;
