fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    flashnote::platform::hide_console();
    flashnote::run(flashnote::Config::default())
}
