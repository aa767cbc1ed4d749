use common::{Money, OrderId, ProductId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Order, OrderLine, OrderStatus};
use ledger::{InMemoryLedger, OrderLedger};

fn make_order() -> Order {
    Order::create(
        OrderId::new(),
        UserId::new("bench-user"),
        vec![OrderLine {
            product_id: ProductId::new(1),
            quantity: 2,
            unit_price: Money::from_cents(1000),
        }],
    )
}

fn bench_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("ledger/create", |b| {
        b.iter(|| {
            rt.block_on(async {
                let ledger = InMemoryLedger::new();
                ledger.create(make_order()).await.unwrap();
            });
        });
    });
}

fn bench_create_then_update_status(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("ledger/create_then_update_status", |b| {
        b.iter(|| {
            rt.block_on(async {
                let ledger = InMemoryLedger::new();
                let order = make_order();
                let id = order.order_id;
                ledger.create(order).await.unwrap();
                ledger.update_status(id, OrderStatus::Paid).await.unwrap();
            });
        });
    });
}

fn bench_list_by_user_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = InMemoryLedger::new();

    rt.block_on(async {
        for _ in 0..100 {
            ledger.create(make_order()).await.unwrap();
        }
    });

    c.bench_function("ledger/list_by_user_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let orders = ledger.list_by_user(&UserId::new("bench-user")).await.unwrap();
                assert_eq!(orders.len(), 100);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_create_then_update_status,
    bench_list_by_user_100
);
criterion_main!(benches);
