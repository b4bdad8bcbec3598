//! API client module
//!
//! HTTP access to the InterPro and UniProt REST services. The page schema
//! itself lives in [`ipr_common::model`].

pub mod client;
pub mod endpoints;

pub use client::{InterProClient, ACCEPT_JSON, ACCEPT_RDF_XML};
pub use endpoints::{Database, DomainSource};
