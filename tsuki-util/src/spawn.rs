use std::{future::Future, time::Duration};

use futures::future::join_all;
use tokio::time::{self, error::Elapsed};

/// Awaits all futures concurrently and returns their outputs in the order
/// they were given.
///
/// If a timeout is specified and the futures don't finish in time, all of
/// them are dropped and an error is returned.
pub async fn spawn<I>(
    futures: I,
    timeout: Option<Duration>,
) -> Result<Vec<<I::Item as Future>::Output>, Elapsed>
where
    I: IntoIterator,
    I::Item: Future,
{
    let all = join_all(futures);

    match timeout {
        Some(timeout) => time::timeout(timeout, all).await,
        None => Ok(all.await),
    }
}
