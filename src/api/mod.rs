pub mod health;
pub mod posts;
pub mod metrics;
pub mod auth;
pub mod swagger;
