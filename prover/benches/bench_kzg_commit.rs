use ark_bn254::{Bn254, Fr};
use ark_std::UniformRand;
use criterion::{criterion_group, criterion_main, Criterion};
use kzg_iop_primitives::srs::SRS;
use kzg_iop_prover::kzg::{batch_open_single_point, commit, open};
use sha2::{Digest, Sha256};
use std::time::Duration;

fn bench_kzg_commit(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let srs = SRS::<Bn254>::new(1 << 16, &Fr::from(42u64)).unwrap();

    for size in [1usize << 10, 1 << 13, 1 << 16] {
        let coeffs: Vec<Fr> = (0..size).map(|_| Fr::rand(&mut rng)).collect();
        c.bench_function(&format!("bench_kzg_commit_{}", size), |b| {
            b.iter(|| commit(&coeffs, &srs).unwrap());
        });
    }

    let coeffs: Vec<Fr> = (0..1 << 13).map(|_| Fr::rand(&mut rng)).collect();
    let point = Fr::rand(&mut rng);
    c.bench_function("bench_kzg_open_8192", |b| {
        b.iter(|| open(&coeffs, &point, &srs).unwrap());
    });

    let polys: Vec<Vec<Fr>> = (0..8)
        .map(|_| (0..1 << 12).map(|_| Fr::rand(&mut rng)).collect())
        .collect();
    let digests: Vec<_> = polys.iter().map(|p| commit(p, &srs).unwrap()).collect();
    c.bench_function("bench_kzg_batch_open_8x4096", |b| {
        b.iter(|| {
            batch_open_single_point(&polys, &digests, &point, &mut Sha256::new(), &srs).unwrap()
        });
    });
}

fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(5)) // Warm-up time
        .measurement_time(Duration::from_secs(10)) // Measurement time
        .sample_size(10) // Number of samples to take
}

criterion_group!(
    name = benches;
    config = criterion_config();
    targets = bench_kzg_commit
);
criterion_main!(benches);
