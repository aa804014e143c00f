use nalgebra::DMatrix;

/// Internal (spring and kinetic-estimator) terms of the ring polymer, owned by the host.
///
/// `q` is `ndof x ntraj`, `inv_m` is `ndof x 1`; `force` returns a matrix shaped like `q`.
pub trait RingPolymerInternal {
    fn potential(&self, q: &DMatrix<f64>, inv_m: &DMatrix<f64>, beta: f64) -> f64;
    fn force(&self, q: &DMatrix<f64>, inv_m: &DMatrix<f64>, beta: f64) -> DMatrix<f64>;
}

/// Single-bead ring polymer: no springs, so no internal potential or force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassicalNuclei;

impl RingPolymerInternal for ClassicalNuclei {
    fn potential(&self, _q: &DMatrix<f64>, _inv_m: &DMatrix<f64>, _beta: f64) -> f64 {
        0.0
    }

    fn force(&self, q: &DMatrix<f64>, _inv_m: &DMatrix<f64>, _beta: f64) -> DMatrix<f64> {
        DMatrix::zeros(q.nrows(), q.ncols())
    }
}

impl<T: RingPolymerInternal + ?Sized> RingPolymerInternal for &T {
    fn potential(&self, q: &DMatrix<f64>, inv_m: &DMatrix<f64>, beta: f64) -> f64 {
        (**self).potential(q, inv_m, beta)
    }

    fn force(&self, q: &DMatrix<f64>, inv_m: &DMatrix<f64>, beta: f64) -> DMatrix<f64> {
        (**self).force(q, inv_m, beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classical_nuclei_contribute_nothing() {
        let q = DMatrix::from_element(3, 1, 0.7);
        let inv_m = DMatrix::from_element(3, 1, 1.0 / 1836.0);
        assert_eq!(ClassicalNuclei.potential(&q, &inv_m, 10.0), 0.0);
        assert_eq!(ClassicalNuclei.force(&q, &inv_m, 10.0), DMatrix::zeros(3, 1));
    }

    #[test]
    fn references_forward_to_the_implementation() {
        let internal = ClassicalNuclei;
        let by_ref: &dyn RingPolymerInternal = &internal;
        let q = DMatrix::zeros(2, 1);
        assert_eq!((&by_ref).potential(&q, &q, 1.0), 0.0);
    }
}
