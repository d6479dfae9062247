mod client;
mod orders;
mod signature;

pub use client::RazorpayClient;
pub use orders::*;
pub use signature::SignatureVerifier;
