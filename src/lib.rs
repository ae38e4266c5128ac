//! Selection-triggered text assistant
//!
//! A floating panel appears over selected page text and offers four
//! functions: explain, translate, speak and polish. The page document is
//! reached through [`system::HostDocument`]; everything else runs on a single
//! controller task started by [`spawn_assistant`].

pub mod api;
pub mod engine;
pub mod runtime;
pub mod shared;
pub mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use runtime::{spawn_assistant, AssistantHandle, AssistantServices};
pub use shared::error::{AppError, AppResult};
pub use shared::settings::AssistantConfig;

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
/// Does nothing if the host already installed a subscriber.
pub fn init_tracing() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .try_init();
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
