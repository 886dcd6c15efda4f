use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use ledger_emulator_lib::genesis::{self, DEFAULT_INITIAL_AMOUNT};
use ledger_emulator_lib::{Emulator, Transaction};

const NUM_TRANSACTIONS: usize = 500;

/// An emulator with one genesis output per transaction, and the transactions spending them.
fn prepare() -> (Emulator, Vec<Transaction>) {
    let utxos = genesis::random_initial_utxos(NUM_TRANSACTIONS, DEFAULT_INITIAL_AMOUNT);
    let emulator = Emulator::with_utxos(utxos.clone());
    let builder = emulator.tx_builder();
    let transactions = utxos
        .iter()
        .map(|utxo| {
            builder
                .build(&[utxo.clone()], vec![], utxo.address())
                .unwrap()
        })
        .collect();
    (emulator, transactions)
}

fn submit_and_settle_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Settlement");
    group.throughput(Throughput::Elements(NUM_TRANSACTIONS as u64));

    group.bench_function("submit and settle 500 transactions", |b| {
        b.iter_batched(
            prepare,
            |(mut emulator, transactions)| {
                for transaction in transactions {
                    black_box(emulator.submit(transaction).unwrap());
                }
                // Blocks are filled by size, so settling everything takes several blocks.
                while !emulator.mempool().is_empty() {
                    black_box(emulator.await_block(1));
                }
                emulator
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, submit_and_settle_benchmark);

criterion_main!(benches);
