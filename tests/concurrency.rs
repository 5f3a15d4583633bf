//! One function instance shared by concurrent callers

use std::sync::Arc;
use std::time::Duration;

use decorum::function::from_async_fn;
use decorum::prelude::*;
use decorum::testing::RecordingSink;

#[derive(Debug, Clone, PartialEq)]
struct Lookup {
    key: String,
    delay_ms: u64,
}

impl Nullable for Lookup {}

struct Resolve;

impl AsyncLogic for Resolve {
    type Input = Lookup;
    type Output = String;

    fn rules(&self, rules: &mut Rules<Lookup>) {
        rules.rule_for("key", |l: &Lookup| &l.key, |k: &String| !k.is_empty(), "key must not be empty");
    }

    fn call(&self, input: Lookup) -> Aff<String> {
        Aff::from_async(move |_| {
            let input = input.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(input.delay_ms)).await;
                if input.key.starts_with("gone") {
                    return Err(Error::new(404, format!("no value for {}", input.key)));
                }
                Ok(format!("value-of-{}", input.key))
            }
        })
    }
}

fn lookup(key: &str, delay_ms: u64) -> Lookup {
    Lookup {
        key: key.to_string(),
        delay_ms,
    }
}

#[tokio::test]
async fn test_interleaved_runs_do_not_mix_inputs() {
    let function = AsyncValidated::new(Resolve);

    let slow = function.apply(lookup("slow", 40));
    let fast = function.apply(lookup("fast", 1));
    let token = CancellationToken::new();

    let (slow, fast) = tokio::join!(slow.run(&token), fast.run(&token));
    assert_eq!(slow, Ok("value-of-slow".to_string()));
    assert_eq!(fast, Ok("value-of-fast".to_string()));
}

#[tokio::test]
async fn test_spawned_callers_share_one_decorated_instance() {
    let sink = Arc::new(RecordingSink::new());
    let function: Arc<dyn AsyncFunction<Lookup, String>> =
        Arc::new(ErrorLogging::resolve(|| AsyncValidated::new(Resolve), sink.clone()));

    // Even callers succeed, n % 4 == 1 breaks a rule, n % 4 == 3 fails inside the logic.
    let handles: Vec<_> = (0..8u64)
        .map(|n| {
            let function = Arc::clone(&function);
            tokio::spawn(async move {
                let key = match n % 4 {
                    1 => String::new(),
                    3 => format!("gone{}", n),
                    _ => format!("k{}", n),
                };
                function.apply(lookup(&key, 8 - n)).run_standalone().await
            })
        })
        .collect();

    let mut failures = Vec::new();
    for (n, handle) in handles.into_iter().enumerate() {
        match (n % 4, handle.await.unwrap()) {
            (0 | 2, Ok(value)) => assert_eq!(value, format!("value-of-k{}", n)),
            (1, Err(error)) => {
                assert_eq!(error.code(), VALIDATION_ERROR_CODE);
                failures.push(error);
            }
            (3, Err(error)) => {
                assert_eq!(error.message(), format!("no value for gone{}", n));
                failures.push(error);
            }
            (_, other) => panic!("caller {} got {:?}", n, other),
        }
    }

    let logged = sink.errors();
    assert_eq!(logged.len(), 4);
    for entry in logged {
        assert_eq!(entry.function, Identity::of::<Resolve>());
        let error = entry.error.unwrap();
        let own = failures
            .iter()
            .position(|failure| *failure == error)
            .unwrap_or_else(|| panic!("logged failure {:?} was returned to no caller", error));
        failures.remove(own);
    }
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_cancelling_one_run_leaves_other_alone() {
    let function = AsyncValidated::new(from_async_fn("jobs::Sleep", |ms: u64| {
        Aff::from_async(move |_| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(ms)
        })
    }));

    let doomed = CancellationToken::new();
    let free = CancellationToken::new();
    doomed.cancel();

    let doomed_run = function.apply(5_000);
    let free_run = function.apply(5);
    let (a, b) = tokio::join!(doomed_run.run(&doomed), free_run.run(&free));
    assert!(a.unwrap_err().is_cancelled());
    assert_eq!(b, Ok(5));
}
