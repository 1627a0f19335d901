// Sequential fallback over candidate applications
//
// Used wherever a request names alternatives: app specs, names inside one
// spec, and candidate binaries from the application table.

use std::future::Future;

use crate::command_execution::error::{CommandError, CommandResult};

/// Try each candidate in order until one succeeds.
///
/// Attempts run one after another. The first success is returned right away
/// and earlier failures are dropped. When every candidate fails, the error
/// of the last one is returned.
pub async fn try_each<T, R, F, Fut>(
    candidates: impl IntoIterator<Item = T>,
    mut attempt: F,
) -> CommandResult<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = CommandResult<R>>,
{
    let mut latest_error = None;

    for candidate in candidates {
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("Launch candidate failed: {}", e);
                latest_error = Some(e);
            }
        }
    }

    Err(latest_error
        .unwrap_or_else(|| CommandError::invalid_argument("Expected at least one candidate")))
}
