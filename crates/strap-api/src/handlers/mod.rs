//! HTTP request handlers for the strap API

pub mod parser;
