use liquid_core::{Error, Primitive, Term};
use liquid_environment::{
    Config, EnvironmentError, FutureMessage, ReplySender, RequestReceiver, Worker, WorkerExit,
    random_delay,
};
use liquid_tests::InlineSpawner;
use std::time::Duration;

struct OneRequest(Option<FutureMessage>);

impl RequestReceiver for OneRequest {
    fn recv(&mut self) -> Result<FutureMessage, EnvironmentError> {
        self.0.take().ok_or(EnvironmentError::ChannelDisconnected)
    }
}

struct Replies<'a>(&'a mut Vec<FutureMessage>);

impl ReplySender for Replies<'_> {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError> {
        self.0.push(message);
        Ok(())
    }
}

fn run_worker(request: FutureMessage) -> (Result<WorkerExit, EnvironmentError>, Vec<FutureMessage>) {
    let mut replies = Vec::new();
    let worker = Worker::new(
        OneRequest(Some(request)),
        Replies(&mut replies),
        Config::default(),
    );
    let exit = worker.run(&mut InlineSpawner::new());
    (exit, replies)
}

#[test]
fn test_decode_request() {
    let message = FutureMessage::decode(
        r#"{"term":{"kind":"Lambda","arg":"x","body":{"kind":"Variable","label":"x"}}}"#,
    )
    .unwrap();
    assert_eq!(
        message,
        FutureMessage::request(Term::lambda("x", Term::variable("x")))
    );
}

#[test]
fn test_resolved_variable_is_serialized() {
    let mut term = Term::lambda("y", Term::variable("x"));
    term.bind(&[liquid_core::Binding::new("x", Term::number(2.0))]);
    let line = FutureMessage::request(term.clone()).encode().unwrap();

    assert!(line.contains(r#""resolved":{"kind":"Value","value":2.0}"#), "{}", line);
    assert!(!line.contains('\n'));
    assert_eq!(FutureMessage::decode(&line).unwrap().term, Some(term));
}

#[test]
fn test_unknown_kind_is_decode_error() {
    let error = FutureMessage::decode(r#"{"term":{"kind":"Closure","arg":"x"}}"#).unwrap_err();
    assert!(matches!(error, EnvironmentError::Decode(_)));
    assert!(matches!(Error::from(error), Error::Decode(_)));
}

#[test]
fn test_missing_kind_is_decode_error() {
    let error = FutureMessage::decode(r#"{"term":{"label":"x"}}"#).unwrap_err();
    assert!(matches!(error, EnvironmentError::Decode(_)));
}

#[test]
fn test_error_reply_is_future_failure() {
    let reply = FutureMessage::failure("runtime error: given no bindings for \"z\"");
    assert_eq!(
        reply.into_result(),
        Err(Error::FutureFailed(
            "runtime error: given no bindings for \"z\"".to_string()
        ))
    );
}

#[test]
fn test_empty_reply_is_decode_error() {
    let reply = FutureMessage::decode("{}").unwrap();
    assert!(matches!(reply.into_result(), Err(Error::Decode(_))));
}

#[test]
fn test_transport_error_converts_to_core() {
    let error = Error::from(EnvironmentError::ChannelDisconnected);
    assert_eq!(
        error,
        Error::Transport("channel disconnected".to_string())
    );
}

#[test]
fn test_worker_success() {
    let request = FutureMessage::request(Term::application(
        Term::primitive(Primitive::And),
        Term::pair(Term::bool(true), Term::bool(true)),
    ));
    let (exit, replies) = run_worker(request);
    assert_eq!(exit, Ok(WorkerExit::Success));
    assert_eq!(exit.unwrap().code(), 0);
    assert_eq!(replies, vec![FutureMessage::success(Term::bool(true))]);
}

#[test]
fn test_worker_failure_sends_error_string() {
    let request = FutureMessage::request(Term::application(
        Term::primitive(Primitive::Not),
        Term::variable("z"),
    ));
    let (exit, replies) = run_worker(request);
    assert_eq!(exit, Ok(WorkerExit::Failure));
    assert_eq!(WorkerExit::Failure.code(), 1);
    assert_eq!(
        replies,
        vec![FutureMessage::failure("runtime error: given no bindings for \"z\"")]
    );
}

#[test]
fn test_worker_request_without_term() {
    let (exit, replies) = run_worker(FutureMessage::failure("unexpected"));
    assert_eq!(exit, Ok(WorkerExit::Failure));
    assert_eq!(
        replies,
        vec![FutureMessage::failure("decode error: request carries no term")]
    );
}

#[test]
fn test_worker_evaluates_nested_futures() {
    let inner = Term::future(Term::primitive(Primitive::Not), Term::variable("x"));
    let request = FutureMessage::request(Term::application(
        Term::lambda("x", inner),
        Term::bool(false),
    ));
    let (exit, replies) = run_worker(request);
    assert_eq!(exit, Ok(WorkerExit::Success));
    assert_eq!(replies, vec![FutureMessage::success(Term::bool(true))]);
}

#[test]
fn test_config_defaults() {
    let config = Config::from_lookup(|_| None).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.delay, None);
    assert_eq!(config.poll_interval, Duration::from_micros(100));
}

#[test]
fn test_config_from_variables() {
    let config = Config::from_lookup(|name| match name {
        "LIQUID_FUTURE_DELAY_MS" => Some("25".to_string()),
        "LIQUID_POLL_INTERVAL_US" => Some("10".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.delay, Some(Duration::from_millis(25)));
    assert_eq!(config.poll_interval, Duration::from_micros(10));
}

#[test]
fn test_config_zero_delay_disables_delay() {
    let config = Config::from_lookup(|name| {
        (name == "LIQUID_FUTURE_DELAY_MS").then(|| "0".to_string())
    })
    .unwrap();
    assert_eq!(config.delay, None);
}

#[test]
fn test_config_rejects_garbage() {
    let error = Config::from_lookup(|name| {
        (name == "LIQUID_FUTURE_DELAY_MS").then(|| "soon".to_string())
    })
    .unwrap_err();
    assert!(matches!(error, EnvironmentError::Config(_)));
}

#[test]
fn test_config_survives_child_environment() {
    let config = Config {
        delay: Some(Duration::from_millis(40)),
        poll_interval: Duration::from_micros(250),
        worker_program: Some("/usr/local/bin/liquid".into()),
    };
    let vars = config.to_env();
    let restored = Config::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    })
    .unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_decode_deeply_nested_request() {
    let mut term = Term::variable("x");
    for _ in 0..400 {
        term = Term::application(Term::primitive(Primitive::Not), term);
    }
    let request = FutureMessage::request(Term::application(
        Term::lambda("x", term),
        Term::bool(true),
    ));
    let decoded = FutureMessage::decode(&request.encode().unwrap()).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_decode_rejects_trailing_text() {
    let line = format!("{} {{}}", FutureMessage::success(Term::bool(true)).encode().unwrap());
    assert!(matches!(
        FutureMessage::decode(&line),
        Err(EnvironmentError::Decode(_))
    ));
}

#[test]
fn test_random_delay_stays_within_bound() {
    assert_eq!(random_delay(Duration::ZERO), Duration::ZERO);
    let bound = Duration::from_millis(20);
    assert!(random_delay(bound) <= bound);
    let largest = Duration::from_millis(u64::MAX);
    assert!(random_delay(largest) <= largest);
    assert!(random_delay(Duration::MAX) <= Duration::MAX);
}

#[test]
fn test_config_saturates_oversized_durations() {
    let config = Config {
        delay: Some(Duration::MAX),
        poll_interval: Duration::MAX,
        worker_program: None,
    };
    let vars = config.to_env();
    let max = u64::MAX.to_string();
    assert!(vars.contains(&("LIQUID_FUTURE_DELAY_MS", max.clone())));
    assert!(vars.contains(&("LIQUID_POLL_INTERVAL_US", max)));

    let restored = Config::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    })
    .unwrap();
    assert_eq!(restored.delay, Some(Duration::from_millis(u64::MAX)));
}
