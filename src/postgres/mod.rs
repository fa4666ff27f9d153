// ABOUTME: PostgreSQL connectivity module
// ABOUTME: Re-exports the TLS-aware connection helper

pub mod connection;

pub use connection::connect;
