// src/lib.rs

pub mod headers;
pub mod verify;
