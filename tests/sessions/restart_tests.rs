//! Lists surviving restarts, and recovery from unreadable stored values.

use std::sync::Arc;

use eyre::WrapErr;
use rstest::rstest;
use tasklist::task::{
    adapters::memory::InMemoryKeyValueStore,
    services::{DEFAULT_STORAGE_KEY, DeleteConfirmation, SyncNotice},
};

use super::helpers::{open_session, storage, stored_list};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edited_list_is_restored_after_restart(
    storage: InMemoryKeyValueStore,
) -> eyre::Result<()> {
    let shared = Arc::new(storage.clone());
    let first = open_session(Arc::clone(&shared)).await?;
    let milk = first
        .tasks
        .add("buy milk")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    let rent = first
        .tasks
        .add("pay rent")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    first
        .tasks
        .add("water plants")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    eyre::ensure!(first.tasks.toggle_complete(&milk), "toggle rejected");

    let mut confirmation = DeleteConfirmation::new();
    confirmation.request(rent);
    eyre::ensure!(confirmation.confirm(&first.tasks), "delete rejected");
    let before_restart = first.tasks.snapshot();
    first.close().await?;

    let second = open_session(shared).await?;
    let restored = second.tasks.snapshot();
    eyre::ensure!(
        restored.tasks() == before_restart.tasks(),
        "restored list differs: {:?}",
        second.texts()
    );
    eyre::ensure!(
        second.texts() == vec!["water plants", "buy milk"],
        "unexpected order: {:?}",
        second.texts()
    );
    let milk_task = restored
        .tasks()
        .get(&milk)
        .ok_or_else(|| eyre::eyre!("completed task missing after restart"))?;
    eyre::ensure!(milk_task.is_completed(), "completion flag lost");
    second.close().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restart_without_edits_writes_nothing(storage: InMemoryKeyValueStore) -> eyre::Result<()> {
    let shared = Arc::new(storage.clone());
    let first = open_session(Arc::clone(&shared)).await?;
    first
        .tasks
        .add("only task")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    first.close().await?;
    let writes_before = storage.writes().wrap_err("write history")?.len();

    open_session(shared).await?.close().await?;

    let writes_after = storage.writes().wrap_err("write history")?.len();
    eyre::ensure!(
        writes_after == writes_before,
        "loading wrote back {} times",
        writes_after - writes_before
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreadable_value_is_replaced_by_next_edit() -> eyre::Result<()> {
    let storage = InMemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, "{not a list");
    let mut session = open_session(Arc::new(storage.clone())).await?;

    let notice = session.notices.try_recv().wrap_err("load notice")?;
    eyre::ensure!(
        matches!(notice, SyncNotice::LoadFailed { .. }),
        "unexpected notice {notice:?}"
    );
    eyre::ensure!(session.texts().is_empty(), "list should start empty");

    session
        .tasks
        .add("fresh start")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    session.flush().await?;

    let stored = stored_list(&storage)?;
    eyre::ensure!(stored.len() == 1, "stored list was not replaced");
    session.close().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_save_keeps_list_and_reports_once(
    storage: InMemoryKeyValueStore,
) -> eyre::Result<()> {
    let mut session = open_session(Arc::new(storage.clone())).await?;
    storage.set_fail_writes(true).wrap_err("toggle writes")?;

    session
        .tasks
        .add("unsaved")
        .ok_or_else(|| eyre::eyre!("add rejected"))?;
    session.flush().await?;

    let notice = session.notices.recv().await.wrap_err("save notice")?;
    eyre::ensure!(
        notice.user_message() == "could not save tasks",
        "unexpected notice {notice:?}"
    );
    eyre::ensure!(
        session.notices.try_recv().is_err(),
        "expected a single notice"
    );
    eyre::ensure!(session.texts() == vec!["unsaved"], "in-memory list lost");
    session.close().await
}
