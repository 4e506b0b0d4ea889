/// Initialize logging (reads RUST_LOG, info level by default). Safe to
/// call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
