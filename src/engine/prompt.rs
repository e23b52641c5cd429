//! Operator confirmation collaborator
//!
//! The engine only needs a confirmation channel: show a prompt with a
//! countdown, reflect probe/scan state, and dismiss it once the terminal
//! resolves. How that renders is the frontend's business. Confirmation is
//! advisory and never changes the hardware-derived pass/fail outcome.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Confirmation channel consumed by the orchestrator.
#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// Show a prompt for the terminal under test, with a countdown the
    /// operator has to react within.
    async fn present(&self, title: &str, message: &str, countdown: Duration) -> Result<()>;

    /// Reflect the current hardware state: `passed` once continuity is
    /// confirmed, `pending` while the fallback scan is running.
    async fn update_state(&self, passed: bool, pending: bool) -> Result<()>;

    /// Take the prompt down; cancels a still-running countdown.
    async fn dismiss(&self) -> Result<()>;
}

/// Plain-console prompt with a cooperative countdown task.
///
/// The countdown runs as its own task on the same thread as the engine
/// and yields on every tick, so it stays live while probing and scanning
/// proceed. Expiry without operator input is logged and nothing more.
#[derive(Default)]
pub struct ConsolePrompt {
    cancel: Mutex<Option<flume::Sender<()>>>,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OperatorPrompt for ConsolePrompt {
    async fn present(&self, title: &str, message: &str, countdown: Duration) -> Result<()> {
        println!("── {title} ──");
        println!("{message} (confirm within {}s)", countdown.as_secs());

        let (tx, rx) = flume::bounded::<()>(1);
        *self.cancel.lock() = Some(tx);
        tokio::spawn(async move {
            tokio::select! {
                _ = rx.recv_async() => {}
                _ = tokio::time::sleep(countdown) => {
                    log::info!("⏰ Confirmation countdown expired without operator input");
                }
            }
        });
        Ok(())
    }

    async fn update_state(&self, passed: bool, pending: bool) -> Result<()> {
        if pending {
            println!("🔍 No continuity on the expected line, scanning for the actual connection...");
        } else if passed {
            println!("✅ Continuity confirmed");
        } else {
            println!("❌ No continuity");
        }
        Ok(())
    }

    async fn dismiss(&self) -> Result<()> {
        if let Some(tx) = self.cancel.lock().take() {
            let _ = tx.try_send(());
        }
        println!();
        Ok(())
    }
}
