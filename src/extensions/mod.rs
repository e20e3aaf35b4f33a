//! Extensions that ship with the framework.

pub mod manage;

use std::sync::Arc;

use crate::service::{
    extension::{Extension, ExtensionService},
    sync::CommandSynchronizer,
};

pub use manage::ExtensionManager;

/// Built-in extensions, in load order.
pub fn builtin(
    service: ExtensionService,
    synchronizer: CommandSynchronizer,
) -> Vec<Arc<dyn Extension>> {
    vec![Arc::new(ExtensionManager::new(service, synchronizer))]
}
