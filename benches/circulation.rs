//! Circulation throughput benchmarks
//!
//! - issue_return/ephemeral: one issue + one return, no files
//! - issue_return/standard: same, with the WAL and audit mirror on disk
//! - contention: threads issuing and returning copies of one book
//!
//! Run with: cargo bench --bench circulation

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stacks::{
    BorrowerId, CatalogNumber, CirculationLedger, Database, IssueRequest, RegisterRequest,
    ReturnRequest,
};
use std::sync::Arc;
use std::time::Duration;

const ROUNDS_PER_THREAD: usize = 200;

fn register(ledger: &CirculationLedger, catalog: &str, copies: u32) {
    ledger
        .register(&RegisterRequest {
            catalog_number: CatalogNumber::new(catalog).unwrap(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            initial_available: copies,
        })
        .unwrap();
}

fn requests(catalog: &str, roll: u64) -> (IssueRequest, ReturnRequest) {
    let catalog_number = CatalogNumber::new(catalog).unwrap();
    let borrower = BorrowerId::new(format!("reader{}@x.com", roll), roll).unwrap();
    (
        IssueRequest {
            catalog_number: catalog_number.clone(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            borrower: borrower.clone(),
        },
        ReturnRequest {
            catalog_number,
            title: "Dune".to_string(),
            borrower,
        },
    )
}

fn bench_issue_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("issue_return");
    group.throughput(Throughput::Elements(2));

    let ledger = CirculationLedger::new(Database::ephemeral()).unwrap();
    register(&ledger, "111", 1);
    let (issue, ret) = requests("111", 1);
    group.bench_function("ephemeral", |b| {
        b.iter(|| {
            ledger.issue(&issue).unwrap();
            ledger.return_book(&ret).unwrap();
        })
    });

    let dir = tempfile::tempdir().unwrap();
    let ledger = CirculationLedger::new(Database::open(dir.path()).unwrap()).unwrap();
    register(&ledger, "111", 1);
    group.bench_function("standard", |b| {
        b.iter(|| {
            ledger.issue(&issue).unwrap();
            ledger.return_book(&ret).unwrap();
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    group.measurement_time(Duration::from_secs(10));

    for threads in [1u64, 2, 4, 8] {
        group.throughput(Throughput::Elements(threads * ROUNDS_PER_THREAD as u64));
        group.bench_function(BenchmarkId::new("one_book", threads), |b| {
            b.iter(|| {
                let ledger = Arc::new(CirculationLedger::new(Database::ephemeral()).unwrap());
                register(&ledger, "111", 2);

                let handles: Vec<_> = (1..=threads)
                    .map(|roll| {
                        let ledger = Arc::clone(&ledger);
                        std::thread::spawn(move || {
                            let (issue, ret) = requests("111", roll);
                            for _ in 0..ROUNDS_PER_THREAD {
                                if ledger.issue(&issue).is_ok() {
                                    ledger.return_book(&ret).unwrap();
                                }
                            }
                        })
                    })
                    .collect();

                for h in handles {
                    h.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_issue_return, bench_contention);
criterion_main!(benches);
