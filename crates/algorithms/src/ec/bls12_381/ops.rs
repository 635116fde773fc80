//! Operator boilerplate shared by the field and group types.
//!
//! Each type implements the by-reference form `&A op &B` by hand; these
//! macros derive the by-value, mixed and assigning forms from it.

macro_rules! impl_add_sub_ops {
    ($lhs:ident, $rhs:ident, $out:ident) => {
        impl<'b> core::ops::Add<&'b $rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn add(self, rhs: &'b $rhs) -> $out {
                &self + rhs
            }
        }

        impl<'a> core::ops::Add<$rhs> for &'a $lhs {
            type Output = $out;
            #[inline]
            fn add(self, rhs: $rhs) -> $out {
                self + &rhs
            }
        }

        impl core::ops::Add<$rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn add(self, rhs: $rhs) -> $out {
                &self + &rhs
            }
        }

        impl<'b> core::ops::Sub<&'b $rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn sub(self, rhs: &'b $rhs) -> $out {
                &self - rhs
            }
        }

        impl<'a> core::ops::Sub<$rhs> for &'a $lhs {
            type Output = $out;
            #[inline]
            fn sub(self, rhs: $rhs) -> $out {
                self - &rhs
            }
        }

        impl core::ops::Sub<$rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn sub(self, rhs: $rhs) -> $out {
                &self - &rhs
            }
        }
    };
    ($t:ident) => {
        impl_add_sub_ops!($t, $t, $t);
        impl_add_sub_assign!($t, $t);
    };
}

macro_rules! impl_add_sub_assign {
    ($lhs:ident, $rhs:ident) => {
        impl core::ops::AddAssign<$rhs> for $lhs {
            #[inline]
            fn add_assign(&mut self, rhs: $rhs) {
                *self = &*self + &rhs;
            }
        }

        impl<'b> core::ops::AddAssign<&'b $rhs> for $lhs {
            #[inline]
            fn add_assign(&mut self, rhs: &'b $rhs) {
                *self = &*self + rhs;
            }
        }

        impl core::ops::SubAssign<$rhs> for $lhs {
            #[inline]
            fn sub_assign(&mut self, rhs: $rhs) {
                *self = &*self - &rhs;
            }
        }

        impl<'b> core::ops::SubAssign<&'b $rhs> for $lhs {
            #[inline]
            fn sub_assign(&mut self, rhs: &'b $rhs) {
                *self = &*self - rhs;
            }
        }
    };
}

macro_rules! impl_mul_ops {
    ($lhs:ident, $rhs:ident, $out:ident) => {
        impl<'b> core::ops::Mul<&'b $rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn mul(self, rhs: &'b $rhs) -> $out {
                &self * rhs
            }
        }

        impl<'a> core::ops::Mul<$rhs> for &'a $lhs {
            type Output = $out;
            #[inline]
            fn mul(self, rhs: $rhs) -> $out {
                self * &rhs
            }
        }

        impl core::ops::Mul<$rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn mul(self, rhs: $rhs) -> $out {
                &self * &rhs
            }
        }
    };
    ($lhs:ident, $rhs:ident) => {
        impl_mul_ops!($lhs, $rhs, $lhs);

        impl core::ops::MulAssign<$rhs> for $lhs {
            #[inline]
            fn mul_assign(&mut self, rhs: $rhs) {
                *self = &*self * &rhs;
            }
        }

        impl<'b> core::ops::MulAssign<&'b $rhs> for $lhs {
            #[inline]
            fn mul_assign(&mut self, rhs: &'b $rhs) {
                *self = &*self * rhs;
            }
        }
    };
    ($t:ident) => {
        impl_mul_ops!($t, $t);
    };
}

macro_rules! impl_neg_by_value {
    ($t:ident) => {
        impl core::ops::Neg for $t {
            type Output = $t;
            #[inline]
            fn neg(self) -> $t {
                -&self
            }
        }
    };
}
