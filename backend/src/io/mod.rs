//! # IO Module
//!
//! Adapters between the outside world and the domain services. Only HTTP
//! is exposed today.

pub mod rest;
