use monguito::collection::{Collection, Document};
use monguito::errors::MonguitoResult;
use monguito::monguito::Monguito;
use monguito::store::memory::InMemoryStorage;
use monguito::store::KeyValueStore;
use serde_json::{json, Value};
use std::backtrace::Backtrace;
use std::time::Instant;

/// Collections every test context declares.
pub const TEST_COLLECTIONS: [&str; 2] = ["orders", "users"];

/// Runs `test` against the context built by `before`, always running
/// `after` once the context exists.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> MonguitoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> MonguitoResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> MonguitoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx)
                    .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();
    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed. Error: {}", error);
}

#[derive(Clone)]
pub struct TestContext {
    db: Monguito,
    storage: KeyValueStore,
}

impl TestContext {
    pub fn new(db: Monguito, storage: KeyValueStore) -> Self {
        Self { db, storage }
    }

    pub fn db(&self) -> Monguito {
        self.db.clone()
    }

    /// The raw storage behind [TestContext::db], for inspecting entries.
    pub fn storage(&self) -> KeyValueStore {
        self.storage.clone()
    }

    pub fn orders(&self) -> MonguitoResult<Collection> {
        self.db.collection("orders")
    }

    pub fn users(&self) -> MonguitoResult<Collection> {
        self.db.collection("users")
    }

    /// Parses the raw JSON entry stored under `key`.
    pub fn stored_value(&self, key: &str) -> MonguitoResult<Option<Value>> {
        match self.storage.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

/// A store over fresh in-memory storage declaring [TEST_COLLECTIONS].
pub fn create_test_context() -> MonguitoResult<TestContext> {
    let storage = InMemoryStorage::store();
    let db = Monguito::builder()
        .storage(storage.clone())
        .collections(&TEST_COLLECTIONS)
        .open()?;
    Ok(TestContext::new(db, storage))
}

pub fn cleanup(ctx: TestContext) -> MonguitoResult<()> {
    ctx.storage().clear()
}

pub fn create_test_orders() -> Vec<Value> {
    vec![
        json!({
            "recipient": "Juan",
            "seller": "Armani",
            "total": 500,
            "status": "Pending",
            "items": ["shirt", "tie"]
        }),
        json!({
            "recipient": "Ana",
            "seller": "Gucci",
            "total": 800,
            "status": "Delivered",
            "items": ["bag"]
        }),
        json!({
            "recipient": "Luis",
            "seller": "Armani",
            "total": 700,
            "status": "Pending",
            "items": []
        }),
    ]
}

/// Inserts [create_test_orders] and returns the handles in insertion order.
pub fn insert_test_orders(collection: &Collection) -> MonguitoResult<Vec<Document>> {
    create_test_orders()
        .into_iter()
        .map(|order| collection.insert(order))
        .collect()
}
