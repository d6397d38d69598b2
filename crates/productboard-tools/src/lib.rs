//! Productboard endpoint catalog + runtime.
//!
//! Each Productboard operation is declared once in [`catalog`] and executed by the single generic
//! pipeline in [`runtime`]: build the request from the supplied arguments, send it once, and
//! normalize the outcome into a [`envelope::ToolEnvelope`].
//!
//! The crate contains **no** transport code; the server binary wires it to MCP.

pub mod catalog;
pub mod config;
pub mod envelope;
pub mod runtime;
pub mod safety;
pub mod semantics;
