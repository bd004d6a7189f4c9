//! GPAC circuit simulation.
//!
//! Evaluates a finalized [`gpac_ir::Circuit`] as a polynomial ODE system
//! and integrates it with a fixed-step classical RK4 driver.
//! [`VectorField`] does the per-point evaluation; [`Rk4Driver`]
//! drives it over an interval; [`StepObserver`] implementations capture
//! or forward the trajectory.

pub mod error;
pub mod observer;
pub mod rk4;
pub mod vector_field;

pub use error::{SimError, SimResult};
pub use observer::{CallbackObserver, NullObserver, StepObserver, VecObserver};
pub use rk4::{rk4_step, Rk4Driver};
pub use vector_field::VectorField;
