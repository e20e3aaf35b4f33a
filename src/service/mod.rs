//! Business logic layer.
//!
//! Services coordinate between the registries, the data layer and the Discord API. They
//! own the invocation pipeline, event dispatch, command synchronization, guild setup and
//! extension loading.

pub mod dispatch;
pub mod extension;
pub mod guild;
pub mod invocation;
pub mod sync;
