//! Constants for the BLS12-381 pairing-friendly curve
//!
//! The curve is defined by the parameter `x = -0xd201000000010000`:
//! the base field modulus is `q = (x - 1)^2 (x^4 - x^2 + 1) / 3 + x` and the
//! prime group order is `r = x^4 - x^2 + 1`.

/// Base field modulus q (381 bits)
pub const BLS12_381_FIELD_MODULUS: &str = "4002409555221667393417789825735904156556882819939007885332058136124031650490837864442687629129015664037894272559787";

/// Prime order r of G1, G2 and GT (255 bits)
pub const BLS12_381_GROUP_ORDER: &str =
    "52435875175126190479447740508185965837690552500527637822603658699938581184513";

/// Absolute value of the curve parameter x
pub const BLS12_381_X: &str = "15132376222941642752";

/// Sign of the curve parameter x
pub const BLS12_381_X_IS_NEGATIVE: bool = true;

/// Affine x-coordinate of the G1 generator
pub const BLS12_381_G1_GENERATOR_X: &str = "3685416753713387016781088315183077757961620795782546409894578378688607592378376318836054947676345821548104185464507";

/// Affine y-coordinate of the G1 generator
pub const BLS12_381_G1_GENERATOR_Y: &str = "1339506544944476473020471379941921221584933875938349620426543736416511423956333506472724655353366534992391756441569";

/// Affine x-coordinate of the G2 generator, real part
pub const BLS12_381_G2_GENERATOR_X_C0: &str = "352701069587466618187139116011060144890029952792775240219908644239793785735715026873347600343865175952761926303160";

/// Affine x-coordinate of the G2 generator, imaginary part
pub const BLS12_381_G2_GENERATOR_X_C1: &str = "3059144344244213709971259814753781636986470325476647558659373206291635324768958432433509563104347017837885763365758";

/// Affine y-coordinate of the G2 generator, real part
pub const BLS12_381_G2_GENERATOR_Y_C0: &str = "1985150602287291935568054521177171638300868978215655730859378665066344726373823718423869104263333984641494340347905";

/// Affine y-coordinate of the G2 generator, imaginary part
pub const BLS12_381_G2_GENERATOR_Y_C1: &str = "927553665492332455747201965776037880757740193453592970025027978793976877002675564980949289727957565575433344219582";

// ----------------------------------------------------------------------------
// Endomorphism eigenvalues and decomposition lattices
// ----------------------------------------------------------------------------

/// Eigenvalue of the G1 endomorphism `(x, y) -> (beta x, y)`, equal to `-x^2 mod r`
pub const BLS12_381_G1_EIGENVALUE: &str =
    "52435875175126190479447740508185965837461563690374988244538805122978187051009";

/// Eigenvalue of the untwist-Frobenius-twist endomorphism on G2, equal to `x mod r`
pub const BLS12_381_G2_EIGENVALUE: &str =
    "52435875175126190479447740508185965837690552500527637822588526323715639541761";

/// Row-major 2x2 GLV lattice basis for G1: rows `(x^2, 1)` and `(-1, x^2 - 1)`
pub const BLS12_381_G1_LATTICE_BASIS: [[&str; 2]; 2] = [
    ["228988810152649578064853576960394133504", "1"],
    ["-1", "228988810152649578064853576960394133503"],
];

/// First row of the adjugate of the G1 lattice basis
pub const BLS12_381_G1_LATTICE_ADJUGATE: [&str; 2] = ["228988810152649578064853576960394133503", "-1"];

/// Row-major 4x4 GLS lattice basis for G2 built from powers of `x`
pub const BLS12_381_G2_LATTICE_BASIS: [[&str; 4]; 4] = [
    ["15132376222941642752", "1", "0", "0"],
    ["0", "15132376222941642752", "1", "0"],
    ["0", "0", "15132376222941642752", "1"],
    ["1", "0", "-1", "-15132376222941642752"],
];

/// First row of the adjugate of the G2 lattice basis
pub const BLS12_381_G2_LATTICE_ADJUGATE: [&str; 4] = [
    "3465144826073652318776269530687742778255120092542420320256",
    "-228988810152649578064853576960394133503",
    "15132376222941642752",
    "1",
];

// ----------------------------------------------------------------------------
// Encoding sizes
// ----------------------------------------------------------------------------

/// Size of an encoded base field element in bytes
pub const BLS12_381_FIELD_ELEMENT_SIZE: usize = 48;

/// Size of an encoded scalar in bytes
pub const BLS12_381_SCALAR_SIZE: usize = 32;

/// Size of a compressed G1 point in bytes
pub const BLS12_381_G1_COMPRESSED_SIZE: usize = 48;

/// Size of an uncompressed G1 point in bytes
pub const BLS12_381_G1_UNCOMPRESSED_SIZE: usize = 96;

/// Size of a compressed G2 point in bytes
pub const BLS12_381_G2_COMPRESSED_SIZE: usize = 96;

/// Size of an uncompressed G2 point in bytes
pub const BLS12_381_G2_UNCOMPRESSED_SIZE: usize = 192;
