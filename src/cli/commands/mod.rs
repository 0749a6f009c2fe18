pub mod expense;
pub mod group;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in group::definitions() {
        registry.register(entry);
    }
    for entry in expense::definitions() {
        registry.register(entry);
    }
    for entry in system::definitions() {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry.alias("?", "help");
}
