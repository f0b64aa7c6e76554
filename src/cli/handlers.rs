use std::future::Future;
use std::path::PathBuf;

use tracing::warn;

use crate::config::ServerConfig;
use crate::error::{NoteStashError, Result};
use crate::server;
use crate::storage::{BootstrapOutcome, SnapshotStore};

pub fn handle_serve(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(server::serve(&config, shutdown_signal()))
}

pub fn handle_init(data_dir: PathBuf) -> Result<()> {
    let store = SnapshotStore::new(data_dir);

    match store.bootstrap() {
        BootstrapOutcome::Created => {
            println!(
                "Created {} and {}",
                store.paths().compact().display(),
                store.paths().readable().display()
            );
            Ok(())
        }
        BootstrapOutcome::AlreadyPresent => {
            println!(
                "{} already exists, nothing to do",
                store.paths().compact().display()
            );
            Ok(())
        }
        BootstrapOutcome::Failed => Err(NoteStashError::Server(format!(
            "could not create stores in {}",
            store.paths().data_dir().display()
        ))),
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. If the listener fails the future never
/// resolves, so the server keeps running instead of stopping right after it
/// binds.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "ctrl-c listener error, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
