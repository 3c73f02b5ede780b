//! API layer - native client, request envelope adapter and REST

pub mod dispatch;
pub mod native;
pub mod rest;
