//! Interface adapters

pub mod http;
