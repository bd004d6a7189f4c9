//! Classical fixed-step 4th-order Runge-Kutta integration.

use tracing::debug;

use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::observer::{NullObserver, StepObserver};
use crate::vector_field::VectorField;

/// Fixed-step RK4 driver over `[a, b]` with step `dt`, bound to a
/// finalized circuit: a small builder struct validated once up front,
/// with one method per mode of operation.
pub struct Rk4Driver<'a> {
    circuit: &'a Circuit,
    field: VectorField<'a>,
    int_gates: &'a [Name],
    a: f64,
    b: f64,
    dt: f64,
}

impl<'a> Rk4Driver<'a> {
    /// Construct a driver over `[a, b]` with step size `dt`.
    pub fn new(circuit: &'a Circuit, a: f64, b: f64, dt: f64) -> SimResult<Self> {
        if !(b > a) {
            return Err(SimError::InvalidInterval { a, b });
        }
        if !(dt > 0.0) {
            return Err(SimError::InvalidStepSize(dt));
        }
        let field = VectorField::new(circuit)?;
        let int_gates = circuit
            .int_gates()
            .ok_or_else(|| SimError::NotFinalized(circuit.name().to_string()))?;
        Ok(Self { circuit, field, int_gates, a, b, dt })
    }

    fn initial_state(&self) -> Vec<f64> {
        self.int_gates
            .iter()
            .map(|name| {
                *self
                    .circuit
                    .init_values()
                    .get(name)
                    .expect("finalize guarantees every Int gate has an initial value")
            })
            .collect()
    }

    /// Integrate to `b`, discarding intermediate steps, and return the
    /// final state vector.
    pub fn run(&self) -> SimResult<Vec<f64>> {
        let mut observer = NullObserver;
        self.run_with_observer(&mut observer)
    }

    /// Integrate to `b`, reporting `(t, output)` at every step boundary
    /// (including the starting point) to `observer`.
    pub fn run_with_observer(&self, observer: &mut impl StepObserver) -> SimResult<Vec<f64>> {
        let n_steps = ((self.b - self.a) / self.dt).round().max(1.0) as usize;
        debug!(a = self.a, b = self.b, dt = self.dt, n_steps, "running RK4");

        let mut y = self.initial_state();
        let mut t = self.a;
        observer.on_step(t, self.field.output_value(&y, t)?);

        for _ in 0..n_steps {
            y = self.step(&y, t)?;
            t += self.dt;
            observer.on_step(t, self.field.output_value(&y, t)?);
        }

        Ok(y)
    }

    fn step(&self, y: &[f64], t: f64) -> SimResult<Vec<f64>> {
        rk4_step(&self.field, y, t, self.dt)
    }
}

/// One classical RK4 step of size `dt` (positive or negative) against
/// `field`, starting at state `y`, time `t`.
///
/// Free function, not a [`Rk4Driver`] method, so `gpac-algebra`'s
/// composition can reuse the exact same four-stage formula to pre-simulate
/// a circuit from `t=0` to an arbitrary (possibly negative) target time
/// when propagating initial values across `compose`, without
/// going through [`Rk4Driver::new`]'s `b > a`, `dt > 0` interval validation —
/// the RK4 formula itself is agnostic to the sign of `dt`.
pub fn rk4_step(field: &VectorField, y: &[f64], t: f64, dt: f64) -> SimResult<Vec<f64>> {
    let k1 = field.eval(y, t)?;
    let y2 = axpy(y, &k1, dt / 2.0);
    let k2 = field.eval(&y2, t + dt / 2.0)?;
    let y3 = axpy(y, &k2, dt / 2.0);
    let k3 = field.eval(&y3, t + dt / 2.0)?;
    let y4 = axpy(y, &k3, dt);
    let k4 = field.eval(&y4, t + dt)?;

    Ok(y
        .iter()
        .enumerate()
        .map(|(i, &yi)| yi + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
        .collect())
}

/// `y + scale * k`, element-wise.
fn axpy(y: &[f64], k: &[f64], scale: f64) -> Vec<f64> {
    y.iter().zip(k).map(|(&yi, &ki)| yi + scale * ki).collect()
}
