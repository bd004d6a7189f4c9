//! The circuit container: a mapping from gate name to gate plus bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{validate_user_name, IrError, IrResult};
use crate::gate::Gate;
use crate::name::{FreshNames, Name};

/// A GPAC circuit: a named collection of gates, one designated output, and
/// the initial values of its integration gates.
///
/// Gates are stored in a `BTreeMap` rather than a hash map so iteration is
/// always lexicographic on names — the normalizer's tie-break rule and the
/// simplifier's canonicalization both depend on a deterministic order
///, and this way that order falls out
/// of the container for free instead of being re-sorted at every pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    gates: BTreeMap<Name, Gate>,
    output: Option<Name>,
    init_values: BTreeMap<Name, f64>,
    validation_on_insert: bool,
    /// Marks a builtin library circuit; its name is preserved under copy.
    block: bool,
    finalized: bool,
    /// Populated by `gpac_compile::finalize`; `None` until then or after
    /// any mutation flips `finalized` back to `false`.
    int_gates: Option<Vec<Name>>,
    fresh: FreshNames,
}

impl Circuit {
    /// Create a new, empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gates: BTreeMap::new(),
            output: None,
            init_values: BTreeMap::new(),
            validation_on_insert: true,
            block: false,
            finalized: false,
            int_gates: None,
            fresh: FreshNames::new(),
        }
    }

    /// Mark this circuit as a builtin-library block.
    ///
    /// Builtin circuits (see `gpac_ir::builtins`) set this so that copying
    /// them (e.g. as the left operand of a composition) preserves the
    /// block's name as documentation, instead of treating it as throwaway
    /// scratch state.
    #[must_use]
    pub fn as_block(mut self) -> Self {
        self.block = true;
        self
    }

    /// Disable per-insertion validation (name rules, constant-differential
    /// check). Used by tests that intentionally build a structurally
    /// invalid circuit to exercise `finalize`'s failure path.
    #[must_use]
    pub fn without_validation(mut self) -> Self {
        self.validation_on_insert = false;
        self
    }

    fn mark_dirty(&mut self) {
        self.finalized = false;
        self.int_gates = None;
    }

    /// Resolve a requested name: use it if given (validating and bumping
    /// the fresh counter past it), otherwise mint a fresh one.
    fn resolve_name(&mut self, requested: Option<Name>) -> IrResult<Name> {
        match requested {
            Some(name) => {
                if self.validation_on_insert && !name.is_generated() {
                    validate_user_name(name.as_str())?;
                }
                self.fresh.observe(&name);
                Ok(name)
            }
            None => Ok(self.fresh.next_name()),
        }
    }

    fn insert(&mut self, name: Name, gate: Gate) -> Name {
        if self.gates.contains_key(&name) {
            warn!(gate = %name, "overwriting existing gate");
        }
        self.gates.insert(name.clone(), gate);
        self.mark_dirty();
        name
    }

    /// Insert a constant gate. Returns the assigned name.
    pub fn add_const(&mut self, name: Option<Name>, value: f64) -> IrResult<Name> {
        let name = self.resolve_name(name)?;
        Ok(self.insert(name, Gate::Constant(value)))
    }

    /// Insert an addition gate. Returns the assigned name.
    ///
    /// Input existence (invariant 1) is *not* checked here: builtin
    /// circuits and the normalizer routinely insert a gate before all of
    /// its eventual consumers exist (e.g. the Sin/Cos builtins form a
    /// genuine cycle through an intermediate Prod gate). Invariant 1 is
    /// enforced once, structurally, by `gpac-compile`'s validator.
    pub fn add_add(&mut self, name: Option<Name>, x: Name, y: Name) -> IrResult<Name> {
        let name = self.resolve_name(name)?;
        Ok(self.insert(name, Gate::Add(x, y)))
    }

    /// Insert a product gate. Returns the assigned name. See
    /// [`Circuit::add_add`] for why input existence is not checked here.
    pub fn add_prod(&mut self, name: Option<Name>, x: Name, y: Name) -> IrResult<Name> {
        let name = self.resolve_name(name)?;
        Ok(self.insert(name, Gate::Prod(x, y)))
    }

    /// Insert an integration gate `g' = x * y'`, with optional initial value.
    /// Returns the assigned name.
    ///
    /// `x` (the integrand) may legitimately name the gate being inserted
    /// itself, or any gate not yet inserted — `exp' = exp` is exactly this
    /// shape — since only Int gates are permitted to close a cycle. The
    /// one check performed eagerly is the Int-specific rule: the
    /// differential variable `y` must not already be a `Constant` gate.
    pub fn add_int(
        &mut self,
        name: Option<Name>,
        x: Name,
        y: Name,
        init: Option<f64>,
    ) -> IrResult<Name> {
        let name = self.resolve_name(name)?;
        if self.validation_on_insert {
            if let Some(Gate::Constant(_)) = self.gates.get(&y) {
                return Err(IrError::ConstantDifferential(name.to_string()));
            }
        }
        let name = self.insert(name, Gate::Int(x, y));
        if let Some(v) = init {
            self.init_values.insert(name.clone(), v);
        }
        Ok(name)
    }

    /// Rename a gate in place, moving its init value and fixing up `output`
    /// if it pointed at the old name. Does **not** rewrite other gates'
    /// inputs that reference `old` — call [`Circuit::rename_inputs`]
    /// separately when that is needed.
    pub fn rename_gate(&mut self, old: &Name, new: Name) -> IrResult<()> {
        let gate = self
            .gates
            .remove(old)
            .ok_or_else(|| IrError::UnknownInput {
                consumer: "rename_gate".into(),
                input: old.to_string(),
            })?;
        self.gates.insert(new.clone(), gate);
        if let Some(v) = self.init_values.remove(old) {
            self.init_values.insert(new.clone(), v);
        }
        if self.output.as_ref() == Some(old) {
            self.output = Some(new.clone());
        }
        self.fresh.observe(&new);
        self.mark_dirty();
        Ok(())
    }

    /// Rewrite every Binary gate's inputs equal to `old` to `new`.
    pub fn rename_inputs(&mut self, old: &Name, new: &Name) {
        for gate in self.gates.values_mut() {
            if let Some((x, y)) = gate.inputs_mut() {
                if x == old {
                    *x = new.clone();
                }
                if y == old {
                    *y = new.clone();
                }
            }
        }
        self.mark_dirty();
    }

    /// Remove a gate. Does not fix up consumers; callers are expected to
    /// only erase genuinely dead gates (see the dead-code-elimination pass).
    pub fn erase_gate(&mut self, name: &Name) -> IrResult<Gate> {
        let gate = self.gates.remove(name).ok_or_else(|| IrError::UnknownInput {
            consumer: "erase_gate".into(),
            input: name.to_string(),
        })?;
        self.init_values.remove(name);
        self.mark_dirty();
        Ok(gate)
    }

    /// Set the designated output gate. Must be `t` or a present gate name
    /// (enforced by `finalize`/`validate`, not eagerly here, so callers can
    /// set the output before the gate it names has been inserted).
    pub fn set_output(&mut self, output: Name) {
        debug!(circuit = %self.name, output = %output, "set_output");
        self.output = Some(output);
        self.mark_dirty();
    }

    /// Set an integration gate's initial value. Errors (without mutating)
    /// if `name` does not name an `Int` gate.
    pub fn set_init_value(&mut self, name: &Name, value: f64) -> IrResult<()> {
        match self.gates.get(name) {
            Some(Gate::Int(..)) => {
                self.init_values.insert(name.clone(), value);
                self.mark_dirty();
                Ok(())
            }
            Some(_) => Err(IrError::NotAnIntegrationGate(name.to_string())),
            None => Err(IrError::UnknownInput {
                consumer: "set_init_value".into(),
                input: name.to_string(),
            }),
        }
    }

    /// Merge initial values for gates present in this circuit, ignoring
    /// entries whose name is not a gate here.
    pub fn import_values(&mut self, values: &BTreeMap<Name, f64>) {
        for (name, v) in values {
            if self.gates.contains_key(name) {
                self.init_values.insert(name.clone(), *v);
            }
        }
        self.mark_dirty();
    }

    // === Accessors ===

    /// The circuit's informational name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override the circuit's informational name. Used by builtins that are
    /// assembled by splicing other builtins together and then need to take
    /// on a name of their own (e.g. `Upsilon`, `Select`).
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether this circuit is a builtin-library block.
    pub fn is_block(&self) -> bool {
        self.block
    }

    /// Whether per-insertion validation is enabled.
    pub fn validation_on_insert(&self) -> bool {
        self.validation_on_insert
    }

    /// All gates, keyed by name, in lexicographic order.
    pub fn gates(&self) -> &BTreeMap<Name, Gate> {
        &self.gates
    }

    /// Mutable access to the gate map. Exposed for `gpac-compile`'s passes;
    /// mutating through here does not flip `finalized` — callers that use
    /// it must call [`Circuit::invalidate`] themselves. Kept `pub(crate)`
    /// plus a crate-visibility re-export so only this workspace's own
    /// compile crate can reach in, not arbitrary downstream users.
    #[doc(hidden)]
    pub fn gates_mut(&mut self) -> &mut BTreeMap<Name, Gate> {
        &mut self.gates
    }

    /// Flip `finalized` back to `false` and clear the cached `int_gates`.
    /// Public so `gpac-compile`'s passes (which mutate via [`Circuit::gates_mut`])
    /// can restore the invariant after a batch of edits.
    pub fn invalidate(&mut self) {
        self.mark_dirty();
    }

    /// Mutable access to the init-value map. Exposed, like [`Circuit::gates_mut`],
    /// so `gpac-compile`'s normalizer can drop an Int gate's initial value
    /// when in-place rewriting turns it into an `Add`.
    #[doc(hidden)]
    pub fn init_values_mut(&mut self) -> &mut BTreeMap<Name, f64> {
        &mut self.init_values
    }

    /// Replace the gate at `name` with `Int(x, y)` in place, keeping any
    /// initial value already recorded under `name`. `name` must already be a gate.
    #[doc(hidden)]
    pub fn set_gate_int(&mut self, name: &Name, x: Name, y: Name) {
        self.gates.insert(name.clone(), Gate::Int(x, y));
        self.mark_dirty();
    }

    /// Replace the gate at `name` with `Add(x, y)` in place, dropping any
    /// initial value recorded under `name` (it is no longer an `Int` gate).
    /// `name` must already be a gate.
    #[doc(hidden)]
    pub fn set_gate_add(&mut self, name: &Name, x: Name, y: Name) {
        self.gates.insert(name.clone(), Gate::Add(x, y));
        self.init_values.remove(name);
        self.mark_dirty();
    }

    /// Replace the gate at `name` with `Constant(value)` in place, dropping
    /// any initial value recorded under `name`. Used by the constant-folding
    /// pass. `name` must already be a gate.
    #[doc(hidden)]
    pub fn set_gate_constant(&mut self, name: &Name, value: f64) {
        self.gates.insert(name.clone(), Gate::Constant(value));
        self.init_values.remove(name);
        self.mark_dirty();
    }

    /// The designated output, if set.
    pub fn output(&self) -> Option<&Name> {
        self.output.as_ref()
    }

    /// Initial values of integration gates.
    pub fn init_values(&self) -> &BTreeMap<Name, f64> {
        &self.init_values
    }

    /// Whether `finalize` has succeeded and no mutation has happened since.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The cached, finalize-order list of integration gates, if finalized.
    pub fn int_gates(&self) -> Option<&[Name]> {
        self.int_gates.as_deref()
    }

    /// Called only by `gpac_compile::finalize` to install the computed
    /// `int_gates` cache and lock the `finalized` flag.
    #[doc(hidden)]
    pub fn set_finalized(&mut self, int_gates: Vec<Name>) {
        self.int_gates = Some(int_gates);
        self.finalized = true;
    }

    /// Allocate a fresh `_<k>` name without inserting a gate for it.
    pub fn fresh_name(&mut self) -> Name {
        self.fresh.next_name()
    }

    /// Copy every gate of `other` into `self`, renaming any gate whose name
    /// collides with one already in `self` to a fresh name (and rewriting
    /// that gate's own inputs and any input pointing at the renamed gate
    /// *within the copied portion*). Returns `other`'s output name as seen
    /// from inside `self` after the splice — i.e. the renamed name if it
    /// collided, otherwise `other`'s original output name (or `t`
    /// unchanged, since `t` is never a gate).
    ///
    /// This is the shared plumbing behind `+`, `*`, and `∘`: each composer
    /// copies one operand's gates into a clone of the other and then adds
    /// one more combinator gate on top.
    ///
    /// `pub` (not `pub(crate)`) and `doc(hidden)`, like [`Circuit::gates_mut`]:
    /// `gpac-algebra`'s `compose`/`invert` need it for the same reason this
    /// crate's own `builder` does, and it lives above `gpac-ir` in the
    /// dependency graph (see that crate's module docs).
    #[doc(hidden)]
    pub fn splice(&mut self, other: &Circuit) -> Name {
        let mut rename: BTreeMap<Name, Name> = BTreeMap::new();
        for name in other.gates.keys() {
            if self.gates.contains_key(name) {
                rename.insert(name.clone(), self.fresh.next_name());
            }
        }
        let remap = |n: &Name| -> Name { rename.get(n).cloned().unwrap_or_else(|| n.clone()) };

        for (name, gate) in &other.gates {
            let new_name = remap(name);
            let mut new_gate = gate.clone();
            if let Some((x, y)) = new_gate.inputs_mut() {
                if !x.is_t() {
                    *x = remap(x);
                }
                if !y.is_t() {
                    *y = remap(y);
                }
            }
            self.fresh.observe(&new_name);
            self.gates.insert(new_name, new_gate);
        }
        for (name, v) in &other.init_values {
            self.init_values.insert(remap(name), *v);
        }
        self.mark_dirty();

        match &other.output {
            Some(out) if !out.is_t() => remap(out),
            _ => Name::t(),
        }
    }

    /// Create an identical copy of this circuit with every gate name
    /// remapped through a fresh allocator seeded past this circuit's own
    /// counter. Used when a builtin block needs to be instantiated more
    /// than once in the same larger circuit without colliding with itself.
    pub fn fresh_copy(&self) -> Circuit {
        let mut scratch = Circuit::new(&self.name);
        scratch.block = self.block;
        let new_output = scratch.splice(self);
        scratch.output = Some(new_output);
        scratch
    }
}
