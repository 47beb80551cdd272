use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Run `future` to completion, turning a panic into `Err(message)`.
///
/// Background tasks use this so a panic reaches the event loop as an
/// `AppEvent::TaskPanicked` instead of vanishing inside the runtime.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast_ref::<&'static str>() {
            Some(s) => (*s).to_string(),
            None => "task panicked with a non-string payload".to_string(),
        },
    }
}
