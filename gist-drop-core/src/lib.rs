#![doc = "gist-drop-core: publish pipeline library for gist-drop."]

//! This crate contains the upload-to-publish pipeline and everything it
//! sequences: workspace management, the version-control port with its git
//! CLI implementation, and link derivation. HTTP handling and configuration
//! live in the binary crate.
//!
//! # Usage
//! Call [`publish::publish`] with a [`publish::PublishConfig`], a
//! [`contract::VersionControl`] implementation and the uploaded files.

pub mod contract;
pub mod error;
pub mod git;
pub mod links;
pub mod publish;
pub mod workspace;
