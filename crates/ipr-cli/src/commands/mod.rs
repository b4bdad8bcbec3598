//! CLI command implementations

pub mod bed;
pub mod fetch;
pub mod mnemonics;
pub mod rdf;
