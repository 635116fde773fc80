//! Tests for the 3-isogeny onto the G2 twist

use super::super::field::fp::Fp;
use super::super::field::fp2::Fp2;
use super::super::isogeny::{is_on_isogenous_curve, iso3, ISO_A, ISO_B};

fn fp(v: u64) -> Fp {
    Fp::from_raw([v, 0, 0, 0, 0, 0]).unwrap()
}

/// Points of E2' with x = i + k for consecutive k
fn isogenous_points(count: usize) -> Vec<(Fp2, Fp2)> {
    let mut points = Vec::with_capacity(count);
    let mut k = 0u64;
    while points.len() < count {
        let x = Fp2::new(fp(k), Fp::one());
        let rhs = x.square() * x + ISO_A * x + ISO_B;
        let y = rhs.sqrt();
        if bool::from(y.is_some()) {
            points.push((x, y.unwrap()));
        }
        k += 1;
    }
    points
}

#[test]
fn test_isogenous_curve_constants() {
    assert_eq!(ISO_A, Fp2::new(Fp::zero(), fp(240)));
    assert_eq!(ISO_B, Fp2::new(fp(1012), fp(1012)));
}

#[test]
fn test_iso3_lands_on_g2_curve() {
    for (x, y) in isogenous_points(8) {
        assert!(bool::from(is_on_isogenous_curve(&x, &y)));

        let image = iso3(&x, &y);
        assert!(bool::from(image.is_on_curve()));
        assert!(!bool::from(image.is_identity()));
        assert_eq!(iso3(&x, &-y), -image);

        // Cofactor clearing finishes the map into G2
        assert!(bool::from(image.clear_cofactor().is_torsion_free()));
    }
}

#[test]
fn test_is_on_isogenous_curve_rejects() {
    let (x, y) = isogenous_points(1)[0];
    assert!(!bool::from(is_on_isogenous_curve(&x, &(y + Fp2::one()))));
    assert!(!bool::from(is_on_isogenous_curve(&Fp2::zero(), &Fp2::zero())));
}

#[test]
fn test_iso3_kernel_maps_to_identity() {
    // The denominators share the root x = -6 + 6i
    let kernel_x = Fp2::new(-fp(6), fp(6));
    assert!(bool::from(iso3(&kernel_x, &Fp2::one()).is_identity()));
}
