//! Core types for the tender processing service

pub mod activity;
pub mod document;
pub mod email;
pub mod order;
pub mod supplier;

pub use activity::*;
pub use document::*;
pub use email::*;
pub use order::*;
pub use supplier::*;
