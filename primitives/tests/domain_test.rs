#[cfg(test)]
mod tests {
    use ark_bn254::Fr;
    use ark_ff::{FftField, UniformRand};
    use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
    use kzg_iop_primitives::{
        domain::{bit_reverse, Decimation, Domain, FftOptions},
        errors::PolynomialError,
        helpers::horner,
    };

    fn random_vector(size: usize) -> Vec<Fr> {
        let mut rng = rand::thread_rng();
        (0..size).map(|_| Fr::rand(&mut rng)).collect()
    }

    #[test]
    fn test_domain_too_large() {
        let result = Domain::<Fr>::new(1 << (Fr::TWO_ADICITY + 1));
        assert_eq!(
            result,
            Err(PolynomialError::DomainTooLarge {
                requested: 1 << (Fr::TWO_ADICITY + 1),
                two_adicity: Fr::TWO_ADICITY,
            })
        );
    }

    #[test]
    fn test_fft_matches_reference_domain() {
        for log_n in 0..10 {
            let n = 1usize << log_n;
            let coeffs = random_vector(n);
            let reference = Radix2EvaluationDomain::<Fr>::new(n).unwrap();
            let expected = reference.fft(&coeffs);

            let domain = Domain::<Fr>::new(n).unwrap();
            assert_eq!(domain.generator(), reference.group_gen());

            // DIF: natural in, bit-reversed out
            let mut dif = coeffs.clone();
            domain
                .fft(&mut dif, Decimation::Dif, FftOptions::default())
                .unwrap();
            bit_reverse(&mut dif);
            assert_eq!(dif, expected, "DIF, n = {}", n);

            // DIT: bit-reversed in, natural out
            let mut dit = coeffs.clone();
            bit_reverse(&mut dit);
            domain
                .fft(&mut dit, Decimation::Dit, FftOptions::default())
                .unwrap();
            assert_eq!(dit, expected, "DIT, n = {}", n);
        }
    }

    #[test]
    fn test_fft_on_coset_evaluates_shifted_domain() {
        let n = 16;
        let coeffs = random_vector(n);
        let domain = Domain::<Fr>::new(n).unwrap();

        let mut evals = coeffs.clone();
        domain
            .fft(&mut evals, Decimation::Dif, FftOptions::new().on_coset())
            .unwrap();
        bit_reverse(&mut evals);

        for (i, e) in evals.iter().enumerate() {
            let x = domain.coset_shift() * domain.element(i);
            assert_eq!(*e, horner(&coeffs, &x));
        }

        let mut evals_dit = coeffs.clone();
        bit_reverse(&mut evals_dit);
        domain
            .fft(&mut evals_dit, Decimation::Dit, FftOptions::new().on_coset())
            .unwrap();
        assert_eq!(evals_dit, evals);
    }

    #[test]
    fn test_fft_inverse_round_trip() {
        let n = 64;
        let domain = Domain::<Fr>::new(n).unwrap();
        let coeffs = random_vector(n);

        for options in [FftOptions::new(), FftOptions::new().on_coset()] {
            // DIF forward leaves bit-reversed values, which DIT inverse reads.
            let mut a = coeffs.clone();
            domain.fft(&mut a, Decimation::Dif, options).unwrap();
            domain.fft_inverse(&mut a, Decimation::Dit, options).unwrap();
            assert_eq!(a, coeffs);

            // DIT forward leaves natural values, which DIF inverse reads.
            let mut b = coeffs.clone();
            bit_reverse(&mut b);
            domain.fft(&mut b, Decimation::Dit, options).unwrap();
            domain.fft_inverse(&mut b, Decimation::Dif, options).unwrap();
            bit_reverse(&mut b);
            assert_eq!(b, coeffs);
        }
    }

    #[test]
    fn test_custom_coset_shift() {
        let n = 8;
        let shift = Fr::from(7u64);
        let domain = Domain::<Fr>::with_coset_shift(n, shift).unwrap();
        assert_eq!(domain.coset_shift() * domain.coset_shift_inv(), Fr::from(1u64));

        let coeffs = random_vector(n);
        let mut evals = coeffs.clone();
        domain
            .fft(&mut evals, Decimation::Dif, FftOptions::new().on_coset())
            .unwrap();
        bit_reverse(&mut evals);
        assert_eq!(evals[3], horner(&coeffs, &(shift * domain.element(3))));

        assert!(Domain::<Fr>::with_coset_shift(n, Fr::from(0u64)).is_err());
    }

    #[test]
    fn test_fft_rejects_wrong_length() {
        let domain = Domain::<Fr>::new(8).unwrap();
        let mut a = random_vector(4);
        let result = domain.fft(&mut a, Decimation::Dif, FftOptions::default());
        assert!(matches!(result, Err(PolynomialError::FFTError(_))));
        let result = domain.fft_inverse(&mut a, Decimation::Dit, FftOptions::default());
        assert!(matches!(result, Err(PolynomialError::FFTError(_))));
    }

    #[test]
    fn test_bit_reverse_involution() {
        for log_n in 0..12 {
            let v: Vec<usize> = (0..1usize << log_n).collect();
            let mut w = v.clone();
            bit_reverse(&mut w);
            if log_n >= 2 {
                assert_ne!(w, v);
            }
            bit_reverse(&mut w);
            assert_eq!(w, v);
        }
    }

    #[test]
    #[should_panic(expected = "bit reversal of a slice of length 6")]
    fn test_bit_reverse_rejects_non_power_of_two() {
        let mut v: Vec<u32> = (0..6).collect();
        bit_reverse(&mut v);
    }

    #[test]
    fn test_bit_reverse_permutation() {
        let mut v: Vec<u32> = (0..8).collect();
        bit_reverse(&mut v);
        assert_eq!(v, vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn test_domain_serialization_round_trip() {
        let domain = Domain::<Fr>::with_coset_shift(32, Fr::from(11u64)).unwrap();
        let mut buf = Vec::new();
        let written = domain.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len());

        let reconstructed = Domain::<Fr>::read_from(&mut &buf[..]).unwrap();
        assert_eq!(reconstructed, domain);

        // cardinality that is not a power of two
        let mut bad = buf.clone();
        bad[7] = 3;
        assert!(Domain::<Fr>::read_from(&mut &bad[..]).is_err());
    }
}
