//! When steps for task list persistence scenarios.

use super::world::{PersistenceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the user adds the task "{text}""#)]
fn add_task(world: &mut PersistenceWorld, text: String) -> Result<(), eyre::Report> {
    world
        .running()?
        .tasks
        .add(&text)
        .ok_or_else(|| eyre::eyre!("adding {text:?} was rejected"))?;
    Ok(())
}

#[when(r#"the user completes the task "{text}""#)]
fn complete_task(world: &mut PersistenceWorld, text: String) -> Result<(), eyre::Report> {
    let id = world.task_id_for(&text)?;
    eyre::ensure!(
        world.running()?.tasks.toggle_complete(&id),
        "toggling {text:?} was rejected"
    );
    Ok(())
}

#[when(r#"the user asks to delete the task "{text}""#)]
fn request_delete(world: &mut PersistenceWorld, text: String) -> Result<(), eyre::Report> {
    let id = world.task_id_for(&text)?;
    world.confirmation.request(id);
    Ok(())
}

#[when("the user declines the deletion")]
fn decline_delete(world: &mut PersistenceWorld) -> Result<(), eyre::Report> {
    world
        .confirmation
        .cancel()
        .ok_or_else(|| eyre::eyre!("no deletion was pending"))?;
    Ok(())
}

#[when("the user confirms the deletion")]
fn confirm_delete(world: &mut PersistenceWorld) -> Result<(), eyre::Report> {
    let running = world
        .running
        .as_ref()
        .ok_or_else(|| eyre::eyre!("task list has not been started"))?;
    eyre::ensure!(
        world.confirmation.confirm(&running.tasks),
        "confirmed deletion removed nothing"
    );
    Ok(())
}

#[when("the slow read completes")]
fn release_read(world: &mut PersistenceWorld) -> Result<(), eyre::Report> {
    world.storage.release_reads();
    world.settle()
}

#[when("the task list restarts")]
fn restart(world: &mut PersistenceWorld) -> Result<(), eyre::Report> {
    world.settle()?;
    let running = world
        .running
        .take()
        .ok_or_else(|| eyre::eyre!("task list has not been started"))?;
    drop(running.tasks);
    run_async(running.handle.join()).wrap_err("join persistence task")?;
    world.start();
    world.settle()
}
