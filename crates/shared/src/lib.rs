//! Types shared by the mint core and its front ends.

pub mod domain;
pub mod error;
pub mod notification;
