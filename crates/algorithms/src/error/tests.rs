use super::*;
use bls381_api::ResultExt;

#[test]
fn test_error_conversion() {
    // Parameter error
    let err = Error::param("n", "scalar must be below the group order");
    match CoreError::from(err) {
        CoreError::InvalidParameter { context, .. } => assert_eq!(context, "n"),
        other => panic!("Expected InvalidParameter error, got {:?}", other),
    }

    // Length error
    let err = Error::Length {
        context: "G1Affine",
        expected: 48,
        actual: 47,
    };
    match CoreError::from(err) {
        CoreError::InvalidLength {
            context,
            expected,
            actual,
        } => {
            assert_eq!(context, "G1Affine");
            assert_eq!(expected, 48);
            assert_eq!(actual, 47);
        }
        other => panic!("Expected InvalidLength error, got {:?}", other),
    }

    // Encoding error
    let err = Error::encoding("G2Affine", "compression flag not set");
    match CoreError::from(err) {
        CoreError::SerializationError { context, .. } => assert_eq!(context, "G2Affine"),
        other => panic!("Expected SerializationError, got {:?}", other),
    }

    // OutOfBounds maps to an invalid parameter
    assert!(matches!(
        CoreError::from(Error::OutOfBounds { context: "Fp" }),
        CoreError::InvalidParameter { context: "Fp", .. }
    ));
}

#[test]
fn test_validation_functions() {
    assert!(validate::parameter(true, "test", "should pass").is_ok());
    match validate::parameter(false, "test", "should fail").unwrap_err() {
        Error::Parameter { name, reason } => {
            assert_eq!(name, "test");
            assert_eq!(reason, "should fail");
        }
        other => panic!("Expected Parameter error, got {:?}", other),
    }

    assert!(validate::length("buffer", 32, 32).is_ok());
    assert_eq!(
        validate::length("buffer", 16, 32).unwrap_err(),
        Error::Length {
            context: "buffer",
            expected: 32,
            actual: 16,
        }
    );

    assert!(validate::bounds("Fp", true).is_ok());
    assert_eq!(
        validate::bounds("Fp", false).unwrap_err(),
        Error::OutOfBounds { context: "Fp" }
    );

    assert!(validate::encoding(true, "G1Affine", "unused").is_ok());
    assert_eq!(
        validate::encoding(false, "G1Affine", "point is not on the curve").unwrap_err(),
        Error::encoding("G1Affine", "point is not on the curve")
    );
}

#[test]
fn test_core_result_context() {
    let r: Result<()> = Err(Error::encoding("G1Affine", "non-canonical coordinate"));
    let core = r.with_context("decode public key").unwrap_err();
    assert_eq!(core.context(), "decode public key");
}

#[cfg(feature = "std")]
#[test]
fn test_display() {
    let err = Error::encoding("G1Affine", "x^3 + b is not a square");
    assert_eq!(
        err.to_string(),
        "Malformed G1Affine encoding: x^3 + b is not a square"
    );
}
