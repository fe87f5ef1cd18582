// src/models/mod.rs

pub mod hunt;
pub mod question;
