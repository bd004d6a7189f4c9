//! Pass manager for orchestrating compilation.

use tracing::{debug, info};

use gpac_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;

/// Manages and executes a sequence of compilation passes, mirroring the
/// teacher's `arvak_compile::manager::PassManager` (same run loop and
/// `tracing::{debug,info}` shape, without the `PropertySet` side channel
/// this domain doesn't need — see `pass.rs`).
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes, in order, on `circuit`.
    pub fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        info!(passes = self.passes.len(), gates = circuit.gates().len(), "running pass manager");
        for pass in &self.passes {
            if pass.should_run(circuit) {
                debug!(pass = pass.name(), "running pass");
                pass.run(circuit)?;
                debug!(pass = pass.name(), gates = circuit.gates().len(), "pass completed");
            } else {
                debug!(pass = pass.name(), "skipping pass");
            }
        }
        Ok(())
    }

    /// Number of passes registered.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether no passes are registered.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::pass::PassKind;
    use gpac_ir::builtins;

    struct CountingPass;
    impl Pass for CountingPass {
        fn name(&self) -> &str {
            "counting"
        }
        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }
        fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
            if circuit.gates().is_empty() {
                return Err(CompileError::InvalidOutput);
            }
            Ok(())
        }
    }

    #[test]
    fn empty_manager_is_a_no_op() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        let mut c = builtins::identity();
        pm.run(&mut c).unwrap();
    }

    #[test]
    fn runs_registered_passes_in_order() {
        let mut pm = PassManager::new();
        pm.add_pass(CountingPass);
        assert_eq!(pm.len(), 1);
        let mut c = builtins::exp();
        assert!(pm.run(&mut c).is_ok());
    }
}
