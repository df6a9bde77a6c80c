use alstream_core::{init_tracing, logging::LOG_ENV};

#[test]
fn init_tracing_is_idempotent() {
    std::env::set_var(LOG_ENV, "alstream_core=debug");
    init_tracing();
    init_tracing();
    tracing::debug!("tracing initialised twice without panicking");
    std::env::remove_var(LOG_ENV);
}
