//! WGS84 transverse Mercator using the 6th order Krüger series.
//!
//! Coordinates here are raw projection coordinates: `x` metres east of the
//! central meridian and `y` metres north of the equator, before any false
//! easting/northing is applied.

// Semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// Flattening
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;
// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;

const MAX_ITERATIONS: usize = 20;

struct Series {
    e: f64,
    // Rectifying radius scaled by k0
    k0_a: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

fn series() -> Series {
    let f = WGS84_F;
    let e = (f * (2.0 - f)).sqrt();
    let n = f / (2.0 - f);
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    let n5 = n4 * n;
    let n6 = n5 * n;

    let a = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

    let alpha = [
        n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
            + 7891.0 / 37800.0 * n6,
        13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
            - 1983433.0 / 1935360.0 * n6,
        61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5
            + 167603.0 / 181440.0 * n6,
        49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
        34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
        212378941.0 / 319334400.0 * n6,
    ];

    let beta = [
        n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
            + 96199.0 / 604800.0 * n6,
        1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
            - 1118711.0 / 3870720.0 * n6,
        17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
        4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
        4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
        20648693.0 / 638668800.0 * n6,
    ];

    Series {
        e,
        k0_a: UTM_K0 * a,
        alpha,
        beta,
    }
}

// Conformal latitude helper shared by both directions.
fn conformal(tau: f64, e: f64) -> f64 {
    let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
    tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
}

/// Project geodetic degrees to `(x, y)` around `central_meridian` (degrees).
pub fn forward(latitude: f64, longitude: f64, central_meridian: f64) -> (f64, f64) {
    let s = series();
    let phi = latitude.to_radians();
    let lambda = (longitude - central_meridian).to_radians();

    let tau_p = conformal(phi.tan(), s.e);
    let xi_p = tau_p.atan2(lambda.cos());
    let eta_p = (lambda.sin() / (tau_p * tau_p + lambda.cos().powi(2)).sqrt()).asinh();

    let mut xi = xi_p;
    let mut eta = eta_p;
    for (j, alpha) in s.alpha.iter().enumerate() {
        let k = 2.0 * (j + 1) as f64;
        xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
        eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
    }

    (s.k0_a * eta, s.k0_a * xi)
}

/// Invert [`forward`], returning `(latitude, longitude)` in degrees.
pub fn inverse(x: f64, y: f64, central_meridian: f64) -> (f64, f64) {
    let s = series();
    let eta = x / s.k0_a;
    let xi = y / s.k0_a;

    let mut xi_p = xi;
    let mut eta_p = eta;
    for (j, beta) in s.beta.iter().enumerate() {
        let k = 2.0 * (j + 1) as f64;
        xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
        eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
    }

    let sinh_eta_p = eta_p.sinh();
    let sin_xi_p = xi_p.sin();
    let cos_xi_p = xi_p.cos();
    let tau_p = sin_xi_p / (sinh_eta_p * sinh_eta_p + cos_xi_p * cos_xi_p).sqrt();

    // Newton-Raphson on the conformal latitude.
    let e2 = s.e * s.e;
    let mut tau = tau_p;
    for _ in 0..MAX_ITERATIONS {
        let tau_i_p = conformal(tau, s.e);
        let delta = (tau_p - tau_i_p) / (1.0 + tau_i_p * tau_i_p).sqrt()
            * (1.0 + (1.0 - e2) * tau * tau)
            / ((1.0 - e2) * (1.0 + tau * tau).sqrt());
        tau += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }

    let latitude = tau.atan().to_degrees();
    let longitude = central_meridian + sinh_eta_p.atan2(cos_xi_p).to_degrees();
    (latitude, longitude)
}
