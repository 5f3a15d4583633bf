//! Demonstrates decorated functions logging through `tracing`
//!
//! Run with: cargo run --example tracing_demo

use std::sync::Arc;
use std::time::Duration;

use decorum::function::from_async_fn;
use decorum::predicate::not_empty;
use decorum::prelude::*;

#[derive(Debug, Clone)]
struct Signup {
    email: String,
}

impl Nullable for Signup {}

struct Register;

impl Logic for Register {
    type Input = Signup;
    type Output = u64;

    fn rules(&self, rules: &mut Rules<Signup>) {
        rules.rule_for("email", |s: &Signup| &s.email, not_empty(), "email must not be empty");
    }

    fn call(&self, input: Signup) -> Eff<u64> {
        Eff::pure(input.email.len() as u64).instrument(tracing::info_span!("register"))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let sink: Arc<dyn LogSink> = Arc::new(TracingSink);

    // ErrorLogging outermost, Tracing inside
    let inner_sink = Arc::clone(&sink);
    let register = ErrorLogging::resolve(
        move || Tracing::resolve(|| Validated::new(Register), Arc::clone(&inner_sink)),
        Arc::clone(&sink),
    );

    let ok = register.apply(Signup {
        email: "ada@example.com".into(),
    });
    tracing::info!("effect built, nothing logged yet");
    let _ = ok.run();

    let _ = register
        .apply(Signup {
            email: String::new(),
        })
        .run();

    let fetch = ErrorLogging::resolve(
        || {
            AsyncValidated::new(from_async_fn("inventory::Fetch", |sku: String| {
                Aff::from_async(move |_| {
                    let sku = sku.clone();
                    async move {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        Ok(sku.len())
                    }
                })
            }))
        },
        Arc::clone(&sink),
    );

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    match fetch.apply("sku-1".to_string()).run(&token).await {
        Ok(n) => tracing::info!("fetched {}", n),
        Err(e) => tracing::warn!("fetch ended: {}", e),
    }
}
