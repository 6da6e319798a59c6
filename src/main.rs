use anyhow::Context;

use httpd::config::Config;
use httpd::server;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    // Served paths resolve against the working directory from here on.
    std::env::set_current_dir(&cfg.static_files.root).with_context(|| {
        format!(
            "failed to enter server directory {}",
            cfg.static_files.root.display()
        )
    })?;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    let runtime = builder
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async {
        tokio::select! {
            res = server::listener::run(&cfg) => {
                res?;
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
