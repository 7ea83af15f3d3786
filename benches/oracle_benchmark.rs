use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prime_problems::{
    mersenne_number, pattern_number, repunit, PalindromeTier, PrimalityConfig, PrimalityMode,
    PrimalityOracle,
};

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");

    let mut oracle = PrimalityOracle::seeded(PrimalityConfig::default(), 1);
    group.bench_function("trial_division_999983", |b| {
        b.iter(|| oracle.is_prime_u64(black_box(999_983)))
    });

    let m521 = mersenne_number(521);
    group.bench_function("miller_rabin_m521", |b| b.iter(|| oracle.is_prime(black_box(&m521))));

    let r317 = repunit(317);
    group.bench_function("miller_rabin_r317", |b| b.iter(|| oracle.is_prime(black_box(&r317))));

    let mut single_round = PrimalityOracle::seeded(
        PrimalityConfig {
            mode: PrimalityMode::MillerRabin,
            rounds: 1,
            ..PrimalityConfig::default()
        },
        1,
    );
    let composite = pattern_number(1000);
    group.bench_function("reject_pattern_1000", |b| {
        b.iter(|| single_round.is_prime(black_box(&composite)))
    });

    group.finish();
}

fn bench_generators(c: &mut Criterion) {
    c.bench_function("pattern_number_3000", |b| b.iter(|| pattern_number(black_box(3000))));
    c.bench_function("palindrome_tier_7_digits", |b| {
        b.iter(|| PalindromeTier::new(black_box(7)).skip_composite_ends().count())
    });
}

criterion_group!(benches, bench_oracle, bench_generators);
criterion_main!(benches);
