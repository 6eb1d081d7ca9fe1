#[cfg(test)]
mod tests {
    use ark_bn254::{Bn254, Fr, G1Affine};
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_ff::UniformRand;
    use kzg_iop_primitives::{
        domain::Domain,
        errors::KzgError,
        polynomial::{Form, Polynomial},
        srs::SRS,
        traits::PointBytes,
        types::{read_digest, write_digest, BatchOpeningProof, OpeningProof},
    };

    fn random_vector(size: usize) -> Vec<Fr> {
        let mut rng = rand::thread_rng();
        (0..size).map(|_| Fr::rand(&mut rng)).collect()
    }

    fn random_point() -> G1Affine {
        (G1Affine::generator() * Fr::rand(&mut rand::thread_rng())).into_affine()
    }

    #[test]
    fn test_polynomial_round_trip() {
        let size = 8;
        let domain = Domain::<Fr>::new(size).unwrap();
        let mut p = Polynomial::from_coefficients(random_vector(size))
            .with_shift(3)
            .unwrap();
        p.to_lagrange_coset(&domain).unwrap();

        let mut buf = Vec::new();
        let written = p.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len());

        let mut reader = &buf[..];
        let reconstructed = Polynomial::<Fr>::read_from(&mut reader).unwrap();
        assert!(reader.is_empty(), "bytes left after reading");

        assert_eq!(reconstructed.form(), p.form());
        assert_eq!(reconstructed.shift(), p.shift());
        assert_eq!(reconstructed.size(), p.size());
        assert_eq!(reconstructed.blinded_size(), p.blinded_size());
        assert_eq!(reconstructed, p);
    }

    #[test]
    fn test_blinded_polynomial_round_trip() {
        let mut p = Polynomial::from_coefficients(random_vector(4));
        p.blind(1, &mut rand::thread_rng()).unwrap();

        let mut buf = Vec::new();
        p.write_to(&mut buf).unwrap();
        let reconstructed = Polynomial::<Fr>::read_from(&mut &buf[..]).unwrap();
        assert_eq!(reconstructed.blinded_size(), 6);
        assert_eq!(reconstructed, p);
    }

    #[test]
    fn test_polynomial_decoding_errors() {
        let p = Polynomial::new(random_vector(4), Form::LAGRANGE_BIT_REVERSE);
        let mut buf = Vec::new();
        p.write_to(&mut buf).unwrap();

        // short buffer
        let short = &buf[..buf.len() - 1];
        assert!(matches!(
            Polynomial::<Fr>::read_from(&mut &short[..]),
            Err(KzgError::SerializationError(_))
        ));

        // unknown basis tag, right after the three u64 header fields
        let mut bad = buf.clone();
        bad[24] = 9;
        assert!(matches!(
            Polynomial::<Fr>::read_from(&mut &bad[..]),
            Err(KzgError::SerializationError(_))
        ));

        // size larger than the coefficient count
        let mut bad = buf.clone();
        bad[7] = 5;
        assert!(matches!(
            Polynomial::<Fr>::read_from(&mut &bad[..]),
            Err(KzgError::SerializationError(_))
        ));

        // bit-reversed layout tag on storage that cannot be bit-reversed
        let q = Polynomial::from_coefficients(random_vector(6));
        let mut buf = Vec::new();
        q.write_to(&mut buf).unwrap();
        buf[25] = 1;
        assert!(matches!(
            Polynomial::<Fr>::read_from(&mut &buf[..]),
            Err(KzgError::SerializationError(_))
        ));
    }

    #[test]
    fn test_srs_round_trip() {
        let srs = SRS::<Bn254>::new(16, &Fr::from(42u64)).unwrap();
        let mut buf = Vec::new();
        let written = srs.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(SRS::<Bn254>::read_from(&mut &buf[..]).unwrap(), srs);

        assert!(SRS::<Bn254>::read_from(&mut &buf[..buf.len() - 3]).is_err());
    }

    #[test]
    fn test_srs_rejects_too_few_points() {
        let srs = SRS::<Bn254>::new(2, &Fr::from(42u64)).unwrap();
        let mut buf = Vec::new();
        srs.write_to(&mut buf).unwrap();
        // claim one G1 point and drop the second one
        buf[7] = 1;
        let g1_len = G1Affine::compressed_len();
        buf.drain(8 + g1_len..8 + 2 * g1_len);
        assert_eq!(
            SRS::<Bn254>::read_from(&mut &buf[..]),
            Err(KzgError::MinSrsSize { size: 1, min: 2 })
        );
    }

    #[test]
    fn test_digest_round_trip() {
        let digest = random_point();
        let mut buf = Vec::new();
        write_digest::<Bn254, _>(&mut buf, &digest).unwrap();
        assert_eq!(read_digest::<Bn254, _>(&mut &buf[..]).unwrap(), digest);
    }

    #[test]
    fn test_opening_proof_round_trip() {
        let mut rng = rand::thread_rng();
        let proof = OpeningProof::<Bn254> {
            h: random_point(),
            point: Fr::rand(&mut rng),
            claimed_value: Fr::rand(&mut rng),
        };
        let mut buf = Vec::new();
        let written = proof.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(OpeningProof::<Bn254>::read_from(&mut &buf[..]).unwrap(), proof);
    }

    #[test]
    fn test_batch_opening_proof_round_trip() {
        let mut rng = rand::thread_rng();
        let proof = BatchOpeningProof::<Bn254> {
            h: random_point(),
            point: Fr::rand(&mut rng),
            claimed_values: random_vector(7),
        };
        let mut buf = Vec::new();
        let written = proof.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(
            BatchOpeningProof::<Bn254>::read_from(&mut &buf[..]).unwrap(),
            proof
        );

        let truncated = &buf[..buf.len() - 1];
        assert!(BatchOpeningProof::<Bn254>::read_from(&mut &truncated[..]).is_err());
    }
}
