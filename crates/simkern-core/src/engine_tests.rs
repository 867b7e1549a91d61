#![allow(clippy::float_cmp)]
//! Tests for the validated distance engine.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::DispatchConfig;
use crate::dispatch::{Capabilities, Isa};
use crate::engine::DistanceEngine;
use crate::error::Error;
use crate::kernels::{scalar, MAX_I8_DIMENSION};
use crate::metric::{Datatype, Metric};

#[test]
fn test_with_defaults_picks_best_available() {
    let caps = Capabilities::detect();
    for metric in Metric::ALL {
        let engine = DistanceEngine::with_defaults(metric).unwrap();
        assert_eq!(engine.metric(), metric);
        assert!(caps.supports(engine.isa()));
    }
}

#[test]
fn test_engine_matches_scalar_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    let hamming = DistanceEngine::with_defaults(Metric::Hamming).unwrap();
    let jaccard = DistanceEngine::with_defaults(Metric::Jaccard).unwrap();
    let l2sq = DistanceEngine::with_defaults(Metric::SqEuclidean).unwrap();
    let cosine = DistanceEngine::with_defaults(Metric::Cosine).unwrap();
    let inner = DistanceEngine::with_defaults(Metric::Inner).unwrap();

    for n in [0, 1, 7, 64, 129, 1000] {
        let a: Vec<u8> = (0..n).map(|_| rng.gen()).collect();
        let b: Vec<u8> = (0..n).map(|_| rng.gen()).collect();
        assert_eq!(hamming.distance_b8(&a, &b).unwrap(), scalar::hamming_b8(&a, &b));
        assert_eq!(jaccard.distance_b8(&a, &b).unwrap(), scalar::jaccard_b8(&a, &b));

        let x: Vec<i8> = (0..n).map(|_| rng.gen()).collect();
        let y: Vec<i8> = (0..n).map(|_| rng.gen()).collect();
        assert_eq!(l2sq.distance_i8(&x, &y).unwrap(), scalar::l2sq_i8(&x, &y));
        assert_eq!(cosine.distance_i8(&x, &y).unwrap(), scalar::cos_i8(&x, &y));
        assert_eq!(inner.distance_i8(&x, &y).unwrap(), scalar::ip_i8(&x, &y));
    }
}

#[test]
fn test_length_mismatch() {
    let engine = DistanceEngine::with_defaults(Metric::Hamming).unwrap();
    let err = engine.distance_b8(&[1, 2, 3], &[1, 2]).unwrap_err();
    assert_eq!(err, Error::LengthMismatch { left: 3, right: 2 });

    let engine = DistanceEngine::with_defaults(Metric::Cosine).unwrap();
    let err = engine.distance_i8(&[1], &[1, 2]).unwrap_err();
    assert_eq!(err, Error::LengthMismatch { left: 1, right: 2 });
}

#[test]
fn test_datatype_mismatch() {
    let engine = DistanceEngine::with_defaults(Metric::Jaccard).unwrap();
    let err = engine.distance_i8(&[1], &[1]).unwrap_err();
    assert_eq!(
        err,
        Error::DatatypeMismatch {
            metric: Metric::Jaccard,
            expected: Datatype::B8,
            actual: Datatype::I8,
        }
    );

    let engine = DistanceEngine::with_defaults(Metric::SqEuclidean).unwrap();
    assert!(matches!(
        engine.distance_b8(&[1], &[1]),
        Err(Error::DatatypeMismatch { .. })
    ));
}

#[test]
fn test_int8_dimension_limit() {
    let engine = DistanceEngine::with_defaults(Metric::SqEuclidean).unwrap();
    let a = vec![i8::MIN; MAX_I8_DIMENSION];
    let b = vec![i8::MAX; MAX_I8_DIMENSION];
    assert_eq!(
        engine.distance_i8(&a, &b).unwrap(),
        255.0_f32 * 255.0 * 32_768.0
    );

    let a = vec![0_i8; MAX_I8_DIMENSION + 1];
    let err = engine.distance_i8(&a, &a).unwrap_err();
    assert_eq!(
        err,
        Error::DimensionTooLarge {
            metric: Metric::SqEuclidean,
            dimension: MAX_I8_DIMENSION + 1,
            max: MAX_I8_DIMENSION,
        }
    );
}

#[test]
fn test_binary_has_no_dimension_limit() {
    let engine = DistanceEngine::with_defaults(Metric::Hamming).unwrap();
    let a = vec![0xFF_u8; MAX_I8_DIMENSION * 2];
    let b = vec![0_u8; MAX_I8_DIMENSION * 2];
    assert_eq!(
        engine.distance_b8(&a, &b).unwrap(),
        (MAX_I8_DIMENSION * 16) as f32
    );
}

#[test]
fn test_forced_serial_engine() {
    let engine = DistanceEngine::new(Metric::Cosine, &DispatchConfig::forced(Isa::Serial)).unwrap();
    assert_eq!(engine.isa(), Isa::Serial);
    assert_eq!(engine.distance_i8(&[0; 4], &[1, 2, 3, 4]).unwrap(), 1.0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = DispatchConfig {
        force_isa: None,
        disabled_isas: vec![Isa::Serial],
    };
    assert!(matches!(
        DistanceEngine::new(Metric::Hamming, &config),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_disabling_everything_but_serial() {
    let config = DispatchConfig {
        force_isa: None,
        disabled_isas: vec![Isa::Avx512, Isa::Avx2, Isa::Sve, Isa::Neon],
    };
    for metric in Metric::ALL {
        let engine = DistanceEngine::new(metric, &config).unwrap();
        assert_eq!(engine.isa(), Isa::Serial);
    }
}
