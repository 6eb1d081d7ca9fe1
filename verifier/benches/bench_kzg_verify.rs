use ark_bn254::{Bn254, Fr};
use ark_std::UniformRand;
use criterion::{criterion_group, criterion_main, Criterion};
use kzg_iop_primitives::srs::SRS;
use kzg_iop_prover::kzg::{batch_open_single_point, commit, open};
use kzg_iop_verifier::{
    batch::{batch_verify_multi_points, batch_verify_single_point, fold_proof},
    verify::verify,
};
use sha2::{Digest, Sha256};
use std::time::Duration;

fn bench_kzg_verify(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let srs = SRS::<Bn254>::new(1 << 12, &Fr::from(42u64)).unwrap();

    let coeffs: Vec<Fr> = (0..1 << 12).map(|_| Fr::rand(&mut rng)).collect();
    let point = Fr::rand(&mut rng);
    let digest = commit(&coeffs, &srs).unwrap();
    let proof = open(&coeffs, &point, &srs).unwrap();
    c.bench_function("bench_kzg_verify", |b| {
        b.iter(|| verify(&digest, &proof, &srs).unwrap());
    });

    for nb in [4usize, 16] {
        let polys: Vec<Vec<Fr>> = (0..nb)
            .map(|_| (0..1 << 10).map(|_| Fr::rand(&mut rng)).collect())
            .collect();
        let digests: Vec<_> = polys.iter().map(|p| commit(p, &srs).unwrap()).collect();
        let batch =
            batch_open_single_point(&polys, &digests, &point, &mut Sha256::new(), &srs).unwrap();
        c.bench_function(&format!("bench_kzg_batch_verify_single_point_{}", nb), |b| {
            b.iter(|| {
                batch_verify_single_point(&digests, &batch, &mut Sha256::new(), &srs).unwrap()
            });
        });

        let proofs: Vec<_> = polys
            .iter()
            .map(|p| open(p, &Fr::rand(&mut rng), &srs).unwrap())
            .collect();
        c.bench_function(&format!("bench_kzg_batch_verify_multi_points_{}", nb), |b| {
            b.iter(|| batch_verify_multi_points(&digests, &proofs, &srs).unwrap());
        });

        c.bench_function(&format!("bench_kzg_fold_proof_{}", nb), |b| {
            b.iter(|| fold_proof(&digests, &batch, &mut Sha256::new()).unwrap());
        });
    }
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
    targets = bench_kzg_verify
);
criterion_main!(benches);
