use crate::config::BotConfig;
use crate::telegram::{parse_batch, TelegramClient};
use anyhow::{Context, Result};
use kb_catalog::KnowledgeBase;
use kb_engine::{report_malformed, Engine};
use std::sync::Arc;
use std::time::Duration;

/// Long-poll `getUpdates` and handle each update to completion, one at a time.
///
/// Returns when Ctrl-C is received. Poll errors back off and retry.
pub async fn run(config: &BotConfig, kb: Arc<KnowledgeBase>) -> Result<()> {
    let token = config.require_token()?;
    let client = TelegramClient::new(
        &config.api_base,
        token,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let me = client
        .get_me()
        .await
        .context("getMe failed; check the bot token")?;
    log::info!(
        "Bot @{} ({}) online",
        me.username.as_deref().unwrap_or("unknown"),
        me.id
    );
    log::info!(
        "Serving {} documents from {}",
        kb.catalog().document_count(),
        config.documents_dir.display()
    );

    let engine = Engine::new(kb, config.documents_dir.clone(), client);
    let backoff = Duration::from_secs(config.error_backoff_secs);
    let mut offset = 0_i64;

    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutdown requested");
                return Ok(());
            }
            updates = engine.transport().get_updates(offset, config.poll_timeout_secs) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(err) => {
                log::error!("Polling failed: {err}; retrying in {}s", backoff.as_secs());
                tokio::time::sleep(backoff).await;
                continue;
            }
        };

        let (next, outcomes) = parse_batch(updates, offset);
        offset = next;
        for outcome in outcomes {
            match outcome {
                Ok(Some(event)) => {
                    engine.on_event(&event).await;
                }
                Ok(None) => log::debug!("ignoring update without text or callback"),
                Err(err) => report_malformed(&err),
            }
        }
    }
}
