//! Chat translator application: runs the translator against a chat page.
pub mod runtime;
