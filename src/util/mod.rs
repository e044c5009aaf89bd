//! Cross-cutting helpers

pub mod net;
pub mod time;
