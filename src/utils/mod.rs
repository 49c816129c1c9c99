// Utility functions
pub mod cache;
pub mod error;
