// ABOUTME: Library module for dw-cloud-migrate
// ABOUTME: Exports all core functionality for use in the binary and tests

pub mod artifact;
pub mod catalog;
pub mod config;
pub mod export;
pub mod import;
pub mod literal;
pub mod postgres;
pub mod tables;
