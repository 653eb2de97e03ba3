//! Finite-difference reference for Jacobian tests.

use kinchain_core::SerialChain;
use nalgebra::Matrix6xX;

/// Central-difference Jacobian of the end frame of `serial` at `q`.
///
/// Linear rows differentiate the end position; angular rows take the
/// rotation from `R(q - h)` to `R(q + h)`, expressed in the root frame, as a
/// scaled axis over `2h`.
///
/// # Panics
///
/// Panics if `q.len()` differs from the chain's DOF.
pub fn numerical_jacobian(serial: &SerialChain, q: &[f64], step: f64) -> Matrix6xX<f64> {
    let n = serial.dof();
    let mut jacobian = Matrix6xX::zeros(n);
    let mut q_plus = q.to_vec();
    let mut q_minus = q.to_vec();

    for i in 0..n {
        q_plus[i] = q[i] + step;
        q_minus[i] = q[i] - step;
        let plus = serial.end_transform(&q_plus).expect("q matches chain DOF");
        let minus = serial.end_transform(&q_minus).expect("q matches chain DOF");
        q_plus[i] = q[i];
        q_minus[i] = q[i];

        let linear = (plus.translation() - minus.translation()) / (2.0 * step);
        let angular = (plus.rotation() * minus.rotation().inverse()).scaled_axis() / (2.0 * step);
        for r in 0..3 {
            jacobian[(r, i)] = linear[r];
            jacobian[(r + 3, i)] = angular[r];
        }
    }
    jacobian
}
