//! Adapter for legacy callback-style consumers.
//!
//! Every client operation returns a future; consumers that still follow the
//! completion-callback convention wrap any operation with [`deliver`] instead
//! of getting a second callback variant of the whole API surface.

use std::future::Future;

use crate::error::Result;

/// Bridge an async operation to a completion callback.
///
/// Spawns the future on the current tokio runtime and hands its outcome,
/// success or failure, to `callback`.
///
/// # Example
/// ```no_run
/// # use projectlib::{DevMachine, ProjectServiceClient};
/// # fn example(client: ProjectServiceClient, machine: DevMachine) {
/// let future = async move { client.get_projects(&machine).await };
/// projectlib::callback::deliver(future, |result| match result {
///     Ok(projects) => println!("{} projects", projects.len()),
///     Err(e) => eprintln!("failed: {}", e),
/// });
/// # }
/// ```
pub fn deliver<T, F, C>(future: F, callback: C)
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
    C: FnOnce(Result<T>) + Send + 'static,
{
    tokio::spawn(async move {
        callback(future.await);
    });
}
