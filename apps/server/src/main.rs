use anyhow::Context;
use packhub::domain::config::AppConfig;
use packhub::kernel::config::load_settings;
use packhub_logger::Logger;
use packhub_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    let settings = load_settings(Some("server")).context("Critical: Configuration is malformed")?;
    let cfg: AppConfig = settings.deserialize().context("Critical: Configuration is malformed")?;

    Server::builder().config(cfg).settings(settings).build()?.run().await
}
