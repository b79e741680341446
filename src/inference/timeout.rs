//! Deadline guard for blocking backend calls.

use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;

use crate::error::{Result, VimojiError};

/// Run `call` and wait at most `timeout` for its result.
///
/// With `timeout = None` the call runs inline. Otherwise it runs on a helper
/// thread and the caller waits on a channel; when the deadline passes the
/// helper is abandoned (its late result is dropped) and an inference timeout
/// error is returned. A panicking call is reported as an inference error.
pub fn call_with_timeout<T, F>(label: &str, timeout: Option<Duration>, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let Some(timeout) = timeout else {
        return call();
    };

    let (sender, receiver) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name(format!("vimoji-{label}"))
        .spawn(move || {
            // The receiver is gone once the caller timed out.
            let _ = sender.send(call());
        })
        .map_err(|e| VimojiError::inference(format!("failed to start {label} call: {e}")))?;

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(VimojiError::timeout(format!(
            "{label} did not answer within {} ms",
            timeout.as_millis()
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(VimojiError::inference(format!(
            "{label} call terminated without a result"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_without_timeout() {
        let result = call_with_timeout("inline", None, || Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_fast_call_completes() {
        let result = call_with_timeout("fast", Some(Duration::from_secs(5)), || Ok("done"));
        assert_eq!(result.unwrap(), "done");
    }

    #[test]
    fn test_errors_are_passed_through() {
        let result: Result<()> = call_with_timeout("failing", Some(Duration::from_secs(5)), || {
            Err(VimojiError::inference("backend down"))
        });
        assert!(result.unwrap_err().to_string().contains("backend down"));
    }

    #[test]
    fn test_slow_call_times_out() {
        let result = call_with_timeout("slow", Some(Duration::from_millis(20)), || {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        });
        let err = result.unwrap_err();
        assert!(err.is_inference());
        assert!(err.to_string().contains("Timeout"));
    }

    #[test]
    fn test_panicking_call_is_an_inference_error() {
        let result: Result<()> =
            call_with_timeout("panicky", Some(Duration::from_secs(5)), || panic!("boom"));
        assert!(result.unwrap_err().is_inference());
    }
}
