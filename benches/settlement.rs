use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use splitbook::core::{compute_settlement, ExpenseDraft, GroupService};
use splitbook::domain::Group;
use splitbook::storage::{load_groups_from_path, save_groups_to_path};
use tempfile::tempdir;

const MEMBERS: [&str; 8] = ["Ann", "Ben", "Cat", "Dev", "Eli", "Fay", "Gus", "Hal"];

fn build_sample_group(expense_count: usize) -> Group {
    let mut group = GroupService::create("Benchmark", MEMBERS).expect("group");
    let members = group.members.clone();
    for idx in 0..expense_count {
        let payer = &members[idx % members.len()];
        let amount = 10.0 + (idx % 97) as f64;
        let draft = ExpenseDraft::even_split(format!("Expense {idx}"), amount, payer, &members);
        GroupService::add_expense(&mut group, draft).expect("expense");
    }
    group
}

fn bench_settlement(c: &mut Criterion) {
    let group = build_sample_group(black_box(10_000));

    c.bench_function("settlement_10k_expenses", |b| {
        b.iter(|| black_box(compute_settlement(&group.expenses)))
    });

    c.bench_function("settle_up_10k_expenses", |b| {
        b.iter_batched(
            || group.clone(),
            |mut group| black_box(GroupService::settle_up(&mut group).expect("settle")),
            BatchSize::LargeInput,
        )
    });
}

fn bench_group_io(c: &mut Criterion) {
    let groups = vec![build_sample_group(black_box(10_000))];
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("groups.json");

    c.bench_function("groups_save_10k", |b| {
        b.iter(|| save_groups_to_path(&groups, &path).expect("save groups"))
    });

    save_groups_to_path(&groups, &path).expect("seed");

    c.bench_function("groups_load_10k", |b| {
        b.iter(|| black_box(load_groups_from_path(&path).expect("load groups")))
    });
}

criterion_group!(benches, bench_settlement, bench_group_io);
criterion_main!(benches);
