pub mod auth;
pub mod controller;
