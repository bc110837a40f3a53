//! ITS-90 polynomial approximation for type N cold-junction compensation.
//!
//! The chip linearizes the thermocouple reading with a single fixed scale, so
//! the result drifts from the true temperature as the thermocouple curve
//! bends. The correction here rebuilds the reading from voltages:
//!
//! 1. convert the cold-junction temperature to its equivalent thermocouple
//!    voltage with the forward polynomial,
//! 2. subtract it from the thermocouple voltage (raw code times the type N
//!    sensitivity) to reference the measurement to 0 C,
//! 3. convert the total voltage back to a temperature with the inverse
//!    polynomial and add the cold-junction temperature back on.

/// Type N sensitivity in microvolts per LSB of the 14-bit code
/// (0.25 C/LSB at roughly 36.3 uV/C).
pub const N_TYPE_UV_PER_LSB: f64 = 9.064;

// ITS-90 forward polynomial, temperature (C) to voltage (uV), terms i = 1..=10
const N_TEMP_TO_UV: [f64; 10] = [
    2.5929394601e+01,
    1.5710141880e-02,
    4.3825627237e-05,
    -2.5261169794e-07,
    6.4311819339e-10,
    -1.0063471519e-12,
    9.9745338992e-16,
    -6.0863245607e-19,
    2.0849229339e-22,
    -3.0682196151e-26,
];

// Inverse polynomial, voltage (uV) to temperature (C), terms i = 1..=8
const N_UV_TO_TEMP: [f64; 8] = [
    3.8783277e-02,
    -1.1612344e-06,
    6.9525655e-11,
    -3.0090077e-15,
    8.8311584e-20,
    -1.6213839e-24,
    1.6693362e-29,
    -7.3117540e-35,
];

// Sum of c[i] * x^(i+1); powers by repeated multiplication, there is no
// constant term in either table.
fn power_series(x: f64, coefficients: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut x_pow = 1.0;
    for &c in coefficients {
        x_pow *= x;
        sum += c * x_pow;
    }
    sum
}

/// Cold-junction compensated temperature (C) for a type N thermocouple.
///
/// `code` is the sign-extended 14-bit thermocouple field, `cjc_celsius` the
/// cold-junction temperature from the same frame. Pure and deterministic.
pub fn adjust_n_type(code: i16, cjc_celsius: f32) -> f32 {
    let cjc = cjc_celsius as f64;
    let cjc_uv = power_series(cjc, &N_TEMP_TO_UV);
    let total_uv = code as f64 * N_TYPE_UV_PER_LSB - cjc_uv;
    (power_series(total_uv, &N_UV_TO_TEMP) + cjc) as f32
}
