use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use evo_automata::config::Config;
use evo_automata::evolution::prepare_next_generation;
use evo_automata::simulation::Game;
use rand::{rngs::StdRng, SeedableRng};

fn tick_benchmark(c: &mut Criterion) {
    let config = Config::default();
    let mut rng = StdRng::seed_from_u64(1);
    let game = Game::new(&config, &mut rng).unwrap();

    c.bench_function("tick_default_board", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| {
                game.step(&config);
                black_box(game);
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("run_to_extinction", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| black_box(game.run_to_extinction(&config)),
            BatchSize::SmallInput,
        );
    });
}

fn breeding_benchmark(c: &mut Criterion) {
    let config = Config::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut finished = Game::new(&config, &mut rng).unwrap();
    finished.run_to_extinction(&config);

    c.bench_function("prepare_next_generation", |b| {
        b.iter(|| {
            let next = prepare_next_generation(black_box(&finished), &config, &mut rng).unwrap();
            black_box(next);
        });
    });
}

criterion_group!(benches, tick_benchmark, breeding_benchmark);
criterion_main!(benches);
