mod core;

pub use core::OAuth2Client;
