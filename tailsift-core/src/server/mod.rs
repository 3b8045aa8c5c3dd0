//! Process lifecycle: wiring, backlog import, live tailing, reload and shutdown.

mod lifecycle;
mod reload;
mod runtime;

#[cfg(test)]
mod tests;

pub use lifecycle::{run, run_import, shutdown_signal};
pub use reload::{ReloadEvent, ReloadHandle, reload_signatures, run_reload_loop};
pub use runtime::{Components, build_components, open_store};
