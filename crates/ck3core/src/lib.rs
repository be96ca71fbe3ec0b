//! Core library for the CK3 mod manager: launcher database access, playset
//! and load-order management, and conflict analysis between mods.

pub mod config;
pub mod conflict;
pub mod db;
pub mod gamedef;
pub mod launcher;
pub mod loader;
pub mod modinfo;
pub mod paths;
