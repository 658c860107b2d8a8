//! Tracing conventions for embedders.
//!
//! This crate emits `tracing` spans and events but owns no subscriber or
//! exporter, that's an application concern, kept separate from binary-owned
//! subscriber/exporter setup the way a library should: the library code just
//! calls `tracing::info!`/`#[tracing::instrument]`. Every
//! `Repository` method is instrumented with `skip` on any argument that
//! could carry the plaintext token, so an embedder's own `EnvFilter` and
//! exporter setup never has to special-case this crate to keep secrets out
//! of its logs.

/// Installs a bare `tracing_subscriber::fmt` layer for test binaries. Not
/// exported outside `cfg(test)` builds; production embedders bring their own
/// subscriber.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
