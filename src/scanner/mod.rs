pub mod analysis;
pub mod client;
pub mod error;

#[cfg(test)]
pub mod mock;

pub use client::VirusTotalClient;
pub use error::ScanError;
