#![doc = "gist-drop: HTTP front end publishing uploads to a git-backed gist."]

//! Thin binary crate: configuration, the axum server and response
//! rendering. The publish pipeline itself lives in `gist_drop_core`.

pub mod config;
pub mod server;
