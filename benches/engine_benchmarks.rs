//! Performance benchmarks for the Attendance Recording Engine.
//!
//! The write path is dominated by policy checks and store lookups, so the
//! benchmarks cover the pure validators on their own and the full mark path
//! against the in-memory store.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{NaiveDate, TimeZone, Utc};

use attendance_engine::audit::MemoryAuditSink;
use attendance_engine::auth::{Permission, PermissionScope, StaticAccessPolicy};
use attendance_engine::config::AttendanceConfig;
use attendance_engine::engine::{Actor, AttendanceEngine, BulkItem, BulkMarkRequest};
use attendance_engine::models::{Employee, EmployeeStatus};
use attendance_engine::policy::{month_end, parse_date};
use attendance_engine::store::InMemoryStore;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Builds an engine with `employee_count` seeded employees and a
/// company-wide bulk writer.
fn create_engine(employee_count: usize) -> (AttendanceEngine, Actor) {
    let store = Arc::new(InMemoryStore::with_today(date("2025-03-15")));
    let access = Arc::new(StaticAccessPolicy::new());

    for i in 0..employee_count {
        let id = format!("emp_{:04}", i);
        store.add_employee(Employee {
            id: id.clone(),
            name: format!("Employee {}", i),
            division: "engineering".to_string(),
            joining_date: Some(date("2024-01-01")),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            status: EmployeeStatus::Active,
        });
        access.assign_division(&id, "engineering");
    }

    let permissions = vec![Permission::AttendanceWrite, Permission::AttendanceBulkWrite];
    for permission in &permissions {
        access.grant("hr_bench", *permission, PermissionScope::Company);
    }
    let actor = Actor {
        id: "hr_bench".to_string(),
        permissions,
    };

    let engine = AttendanceEngine::new(
        store,
        access,
        Arc::new(MemoryAuditSink::new()),
        AttendanceConfig::default(),
    );
    (engine, actor)
}

fn bench_policy(c: &mut Criterion) {
    c.bench_function("parse_date", |b| {
        b.iter(|| parse_date(black_box("2025-03-15")))
    });

    c.bench_function("month_end", |b| {
        let d = date("2024-02-10");
        b.iter(|| month_end(black_box(d)))
    });
}

fn bench_bulk_mark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");

    let mut group = c.benchmark_group("bulk_mark");
    for size in [10usize, 100] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                // Fresh engine per iteration so every item is a creation.
                let (engine, actor) = create_engine(size);
                let request = BulkMarkRequest {
                    date: "2025-03-15".to_string(),
                    source: "HR".to_string(),
                    reason: None,
                    items: (0..size)
                        .map(|i| BulkItem {
                            employee_id: format!("emp_{:04}", i),
                            status: "PRESENT".to_string(),
                            note: None,
                        })
                        .collect(),
                    actor,
                };
                let outcome = engine.bulk_mark(request).await.expect("bulk mark succeeds");
                assert_eq!(outcome.results.len(), size);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_policy, bench_bulk_mark);
criterion_main!(benches);
