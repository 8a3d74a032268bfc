use std::fmt::Display;
use tracing::warn;

/// Run `op`; on failure log it against `what` and return `fallback`.
///
/// Every collaborator call in the pipeline goes through here, so a failure
/// only ever degrades the entity or pass it belongs to.
pub fn attempt<T, E: Display>(
    what: impl Display,
    fallback: T,
    op: impl FnOnce() -> Result<T, E>,
) -> T {
    match op() {
        Ok(value) => value,
        Err(e) => {
            warn!("{what} failed: {e}");
            fallback
        }
    }
}

/// [`attempt`] with `T::default()` as the fallback
pub fn attempt_or_default<T: Default, E: Display>(
    what: impl Display,
    op: impl FnOnce() -> Result<T, E>,
) -> T {
    attempt(what, T::default(), op)
}
