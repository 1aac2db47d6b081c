use log::{error, warn};
use mathnote_notation::operation::{dispatch, Args, Failure, OperationError, Response};
use serde::Deserialize;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};

/// A single line of input: the name of an operation and its arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    pub operation: String,

    #[serde(default)]
    pub args: Args,
}

/// Turns an error into a failure response.
fn failure(err: OperationError) -> Response {
    Response::Failure(Failure::from(&err))
}

/// Extracts the message of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "the operation panicked".to_string()
    }
}

/// Decrements the count of running request threads when a thread is done, however it exits.
struct RunningGuard(Arc<AtomicUsize>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs requests on their own threads, each with a deadline.
///
/// A request that runs out of time produces a `TimeoutError` failure, but its thread is left to
/// finish on its own and its result is discarded. Such threads are _stalled_. Once `max_stalled`
/// of them are alive, new requests are refused with an `OverloadedError` failure until some of
/// them exit.
#[derive(Debug, Clone)]
pub struct Runner {
    timeout: Duration,
    max_stalled: usize,

    /// The number of request threads that have not exited yet.
    running: Arc<AtomicUsize>,
}

impl Runner {
    /// Creates a runner with the given time limit per request and cap on stalled threads. With a
    /// cap of zero, new requests are refused while any stalled thread is alive.
    pub fn new(timeout: Duration, max_stalled: usize) -> Self {
        Self { timeout, max_stalled, running: Arc::new(AtomicUsize::new(0)) }
    }

    /// The number of stalled threads. Requests are handled one at a time, so between requests
    /// every running thread is stalled.
    pub fn stalled(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs `task` on its own thread, waiting at most the time limit for it to finish. A task that
    /// panics produces an `InternalError` failure.
    pub fn run<F>(&self, task: F) -> Response
    where
        F: FnOnce() -> Response + Send + 'static,
    {
        let stalled = self.stalled();
        if stalled > 0 && stalled >= self.max_stalled {
            warn!("refusing request: {} stalled requests are still running", stalled);
            return failure(OperationError::Overloaded(stalled));
        }

        self.running.fetch_add(1, Ordering::SeqCst);
        let guard = RunningGuard(Arc::clone(&self.running));
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("mathnote-request".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(task));
                drop(guard);
                // the receiver is gone if the deadline passed
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            error!("could not spawn a request thread: {}", err);
            return failure(OperationError::Internal(err.to_string()));
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(response)) => response,
            Ok(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                error!("request panicked: {}", message);
                failure(OperationError::Internal(message))
            },
            Err(RecvTimeoutError::Timeout) => {
                warn!("request exceeded its deadline of {:?}", self.timeout);
                failure(OperationError::Timeout)
            },
            Err(RecvTimeoutError::Disconnected) => {
                failure(OperationError::Internal("the request thread exited early".to_string()))
            },
        }
    }

    /// Handles one line of input, returning the response to write.
    pub fn handle_line(&self, line: &str) -> Response {
        let request = match serde_json::from_str::<Request>(line) {
            Ok(request) => request,
            Err(err) => {
                warn!("rejecting malformed request: {}", err);
                return failure(OperationError::InvalidRequest(format!("Invalid request: {}", err)));
            },
        };

        self.run(move || dispatch(&request.operation, &request.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathnote_notation::operation::Field;
    use pretty_assertions::assert_eq;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn handle_line(line: &str) -> Response {
        Runner::new(TIMEOUT, 8).handle_line(line)
    }

    fn done() -> Response {
        Response::Failure(Failure { kind: "Done".to_string(), message: String::new() })
    }

    fn kind(response: &Response) -> &str {
        match response {
            Response::Failure(failure) => &failure.kind,
            Response::Success(success) => panic!("expected a failure, got {:?}", success),
        }
    }

    #[test]
    fn requests() {
        let request: Request = serde_json::from_str(
            r#"{"operation": "derive", "args": {"expr": "x^2", "var": "x"}}"#,
        ).unwrap();
        assert_eq!(request.operation, "derive");
        assert_eq!(request.args["var"], Field::One("x".to_string()));

        let request: Request = serde_json::from_str(r#"{"operation": "evaluate"}"#).unwrap();
        assert!(request.args.is_empty());
    }

    #[test]
    fn successful_line() {
        let response = handle_line(r#"{"operation": "derive", "args": {"expr": "x^2", "var": "x"}}"#);
        let Response::Success(success) = response else {
            panic!("derive failed");
        };
        assert_eq!(success.answer, Some(Field::One("2x".to_string())));
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(kind(&handle_line("not json")), "InvalidRequest");
        assert_eq!(kind(&handle_line(r#"{"args": {}}"#)), "InvalidRequest");
        assert_eq!(kind(&handle_line(r#"{"operation": "derive", "args": {"expr": 1}}"#)), "InvalidRequest");
    }

    #[test]
    fn failures_pass_through() {
        let response = handle_line(r#"{"operation": "frobnicate", "args": {}}"#);
        assert_eq!(kind(&response), "UnknownOperation");
    }

    #[test]
    fn deadline() {
        let runner = Runner::new(Duration::from_millis(50), 8);
        let response = runner.run(|| {
            thread::sleep(Duration::from_secs(2));
            done()
        });
        assert_eq!(response, Response::Failure(Failure {
            kind: "TimeoutError".to_string(),
            message: "Exceeded time limit".to_string(),
        }));
    }

    #[test]
    fn panics_are_contained() {
        let runner = Runner::new(TIMEOUT, 8);
        let response = runner.run(|| panic!("boom"));
        assert_eq!(response, Response::Failure(Failure {
            kind: "InternalError".to_string(),
            message: "Internal error: boom".to_string(),
        }));
    }

    #[test]
    fn stalled_requests_are_capped() {
        let runner = Runner::new(Duration::from_millis(50), 1);
        let (release, blocked) = mpsc::channel::<()>();
        let response = runner.run(move || {
            let _ = blocked.recv();
            done()
        });
        assert_eq!(kind(&response), "TimeoutError");
        assert_eq!(runner.stalled(), 1);

        assert_eq!(runner.run(done), Response::Failure(Failure {
            kind: "OverloadedError".to_string(),
            message: "1 earlier requests are still running, try again later".to_string(),
        }));

        // once the stalled request finishes, requests are accepted again
        release.send(()).unwrap();
        for _ in 0..200 {
            if runner.stalled() == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(runner.stalled(), 0);
        assert_eq!(runner.run(done), done());
    }

    #[test]
    fn finished_requests_are_not_stalled() {
        let runner = Runner::new(TIMEOUT, 1);
        for _ in 0..3 {
            assert_eq!(runner.run(done), done());
        }
        assert_eq!(kind(&runner.run(|| panic!("boom"))), "InternalError");
        assert_eq!(runner.stalled(), 0);
    }
}
