//! Streaming step observers for the RK4 integrator.
//!
//! Wraps the integrator's step loop without altering the driver's own
//! logic, yielding a `(t, output)` pair per completed step.

/// Receives one `(t, output_value)` pair per completed integration step.
pub trait StepObserver {
    /// Called once per step, including the initial point `t = a`.
    fn on_step(&mut self, t: f64, output: f64);
}

/// Collects every `(t, output)` pair into a `Vec`, in step order.
#[derive(Debug, Default, Clone)]
pub struct VecObserver {
    /// Recorded `(t, output)` pairs.
    pub steps: Vec<(f64, f64)>,
}

impl VecObserver {
    /// Create an empty observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The final recorded output value, if any steps were observed.
    pub fn last_output(&self) -> Option<f64> {
        self.steps.last().map(|&(_, y)| y)
    }
}

impl StepObserver for VecObserver {
    fn on_step(&mut self, t: f64, output: f64) {
        self.steps.push((t, output));
    }
}

/// Forwards each `(t, output)` pair to a user-supplied closure — the
/// streaming-to-stdout or streaming-to-a-plotting-collaborator case,
/// without committing to a particular sink.
pub struct CallbackObserver<F: FnMut(f64, f64)> {
    callback: F,
}

impl<F: FnMut(f64, f64)> CallbackObserver<F> {
    /// Wrap `callback` as a [`StepObserver`].
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(f64, f64)> StepObserver for CallbackObserver<F> {
    fn on_step(&mut self, t: f64, output: f64) {
        (self.callback)(t, output);
    }
}

/// An observer that discards every step. The integrator's default when
/// the caller only wants the final state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn on_step(&mut self, _t: f64, _output: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_observer_records_in_order() {
        let mut obs = VecObserver::new();
        obs.on_step(0.0, 1.0);
        obs.on_step(0.1, 1.1);
        assert_eq!(obs.steps, vec![(0.0, 1.0), (0.1, 1.1)]);
        assert_eq!(obs.last_output(), Some(1.1));
    }

    #[test]
    fn callback_observer_forwards_to_closure() {
        let mut total = 0.0;
        let mut obs = CallbackObserver::new(|_t, y| total += y);
        obs.on_step(0.0, 2.0);
        obs.on_step(1.0, 3.0);
        assert_eq!(total, 5.0);
    }

    #[test]
    fn null_observer_is_a_no_op() {
        let mut obs = NullObserver;
        obs.on_step(0.0, 1.0);
    }
}
