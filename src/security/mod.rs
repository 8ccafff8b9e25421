// src/security/mod.rs

pub mod rate_limit;
