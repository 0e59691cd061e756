use std::sync::OnceLock;

use crate::error::SessionError;

static THREADS_INIT: OnceLock<bool> = OnceLock::new();

/// Run `init` once for `cell`; later calls return the remembered outcome.
///
/// A failed initialisation stays failed: the display library cannot be
/// made thread-safe after the fact.
pub fn init_threads_once(
    cell: &OnceLock<bool>,
    init: impl FnOnce() -> bool,
) -> Result<(), SessionError> {
    let ok = *cell.get_or_init(|| {
        let ok = init();
        if ok {
            log::info!("Display library thread support initialised");
        } else {
            log::error!("Display library thread support initialisation failed");
        }
        ok
    });
    if ok { Ok(()) } else { Err(SessionError::ThreadInit) }
}

/// Process-wide variant of [`init_threads_once`], used by `spawn`.
pub fn init_threads_process(init: impl FnOnce() -> bool) -> Result<(), SessionError> {
    init_threads_once(&THREADS_INIT, init)
}
