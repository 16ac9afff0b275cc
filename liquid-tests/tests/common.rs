use liquid_cli::{Config, Error, Liquid, WorkerMode};
use liquid_compiler::{ErrorKind, TypeErrorKind};
use liquid_core::{Term, Type};
use liquid_tests::ScriptedSpawner;

#[allow(dead_code)]
pub struct TestBuilder {
    release_order: Vec<usize>,
}

#[allow(dead_code)]
impl TestBuilder {
    pub fn new() -> Self {
        Self {
            release_order: Vec::new(),
        }
    }

    /// Deliver future replies in this order instead of dispatch order.
    pub fn with_release_order(mut self, order: &[usize]) -> Self {
        self.release_order = order.to_vec();
        self
    }

    pub fn evaluate(self, source: &str) -> TestResult {
        let liquid = Liquid::new(Config::default(), WorkerMode::Thread);
        let mut spawner = ScriptedSpawner::new(&self.release_order);
        let result = liquid.evaluate_with(source, &mut spawner);

        TestResult {
            result,
            source: source.to_string(),
            spawner,
        }
    }
}

#[allow(dead_code)]
pub struct TestResult {
    result: Result<(Term, Type), Error>,
    source: String,
    spawner: ScriptedSpawner,
}

#[allow(dead_code)]
impl TestResult {
    /// Expect a value with the given rendering
    pub fn expect(self, expected: &str) -> Self {
        match &self.result {
            Ok((value, _)) => {
                let actual = value.to_string();
                assert_eq!(
                    actual, expected,
                    "Expected '{}', got '{}' for source: {}",
                    expected, actual, self.source
                );
            }
            Err(e) => {
                panic!(
                    "Expected value '{}', got error: {} for source: {}",
                    expected, e, self.source
                );
            }
        }
        self
    }

    /// Expect the program's checked type to render as given
    pub fn expect_type(self, expected: &str) -> Self {
        match &self.result {
            Ok((_, ty)) => {
                let actual = ty.to_string();
                assert_eq!(
                    actual, expected,
                    "Expected type '{}', got '{}' for source: {}",
                    expected, actual, self.source
                );
            }
            Err(e) => {
                panic!(
                    "Expected type '{}', got error: {} for source: {}",
                    expected, e, self.source
                );
            }
        }
        self
    }

    pub fn expect_futures(self, expected: usize) -> Self {
        assert_eq!(
            self.spawner.spawned(),
            expected,
            "Expected {} futures dispatched for source: {}",
            expected,
            self.source
        );
        self
    }

    pub fn expect_delivered(self, expected: &[usize]) -> Self {
        assert_eq!(
            self.spawner.delivered(),
            expected,
            "Unexpected reply order for source: {}",
            self.source
        );
        self
    }

    pub fn expect_runtime_error(self, expected: liquid_core::Error) {
        match self.result {
            Ok(result) => {
                panic!(
                    "Expected runtime error {:?}, but evaluation succeeded with result: {:?} for source: {}",
                    expected, result, self.source
                );
            }
            Err(Error::RuntimeError(actual)) => {
                assert_eq!(
                    actual, expected,
                    "Expected runtime error {:?}, but got {:?} for source: {}",
                    expected, actual, self.source
                );
            }
            Err(e) => {
                panic!(
                    "Expected runtime error {:?}, but got {:?} for source: {}",
                    expected, e, self.source
                );
            }
        }
    }

    pub fn expect_type_error(self, expected: TypeErrorKind) {
        match self.result {
            Ok(result) => {
                panic!(
                    "Expected type error {:?}, but evaluation succeeded with result: {:?} for source: {}",
                    expected, result, self.source
                );
            }
            Err(Error::TypeError(actual)) => {
                assert_eq!(
                    actual.kind, expected,
                    "Expected type error {:?}, but got {:?} for source: {}",
                    expected, actual, self.source
                );
            }
            Err(e) => {
                panic!(
                    "Expected type error {:?}, but got {:?} for source: {}",
                    expected, e, self.source
                );
            }
        }
    }

    pub fn expect_syntax_error(self, expected: ErrorKind) {
        match self.result {
            Ok(result) => {
                panic!(
                    "Expected syntax error {:?}, but evaluation succeeded with result: {:?} for source: {}",
                    expected, result, self.source
                );
            }
            Err(Error::ParseError(actual)) => {
                assert_eq!(
                    actual.kind, expected,
                    "Expected syntax error {:?}, but got {:?} for source: {}",
                    expected, actual, self.source
                );
            }
            Err(e) => {
                panic!(
                    "Expected syntax error {:?}, but got {:?} for source: {}",
                    expected, e, self.source
                );
            }
        }
    }
}

#[allow(dead_code)]
pub fn liquid() -> TestBuilder {
    TestBuilder::new()
}
