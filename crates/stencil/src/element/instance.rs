//! The symbol instance controller.
//!
//! An instance node starts unbound. [`ElementTree::set_master`] binds it:
//! the node keeps a private copy of the master and its children are rebuilt
//! from the master's child list. Alternate states are presented by swapping
//! the master id while remembering the previous ones on a stack.

use log::debug;
use serde_json::Value;

use stencil_core::model::{SymbolInstance, SymbolMaster, VariableAssign};

use super::{ElementId, ElementTree, Payload};
use crate::error::OverrideError;

/// Payload of a symbol instance node.
#[derive(Debug, Clone)]
pub struct SymbolInstanceState {
    model: SymbolInstance,
    /// Private copy of the bound master, child list emptied.
    master: Option<SymbolMaster>,
    /// Master ids to return to, most recent last.
    state_stack: Vec<String>,
    /// Snapshot of the instance subtree taken before its first state change.
    baseline: Option<Box<ElementTree>>,
}

impl SymbolInstanceState {
    pub(crate) fn new(model: SymbolInstance) -> Self {
        Self {
            model,
            master: None,
            state_stack: Vec::new(),
            baseline: None,
        }
    }

    pub fn model(&self) -> &SymbolInstance {
        &self.model
    }

    pub(crate) fn model_mut(&mut self) -> &mut SymbolInstance {
        &mut self.model
    }

    pub fn master_id(&self) -> &str {
        &self.model.master_id
    }

    pub fn master(&self) -> Option<&SymbolMaster> {
        self.master.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.master.is_some()
    }

    /// The override key of the bound master, if it has one.
    pub fn master_override_key(&self) -> Option<&str> {
        self.master.as_ref()?.object.override_key.as_deref()
    }

    pub fn state_stack(&self) -> &[String] {
        &self.state_stack
    }

    pub fn baseline(&self) -> Option<&ElementTree> {
        self.baseline.as_deref()
    }
}

impl ElementTree {
    /// The instance state of `id`, or `None` if it is not an instance.
    pub fn instance(&self, id: ElementId) -> Option<&SymbolInstanceState> {
        match self.get(id)?.payload() {
            Payload::SymbolInstance(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn instance_mut(&mut self, id: ElementId) -> Option<&mut SymbolInstanceState> {
        match self.get_mut(id)?.payload_mut() {
            Payload::SymbolInstance(state) => Some(state),
            _ => None,
        }
    }

    /// Bind instance `id` to `master`.
    ///
    /// Existing children are dropped and rebuilt from the master's child
    /// list. The master's style and variable declarations are copied onto
    /// the instance. `master` must be the master the instance names.
    pub fn set_master(&mut self, id: ElementId, master: &SymbolMaster) {
        let Some(state) = self.instance_mut(id) else {
            debug_assert!(false, "set_master called on non-instance node {id}");
            return;
        };
        if state.model.master_id != master.object.id {
            debug_assert!(
                false,
                "instance names master `{}` but was given `{}`",
                state.model.master_id, master.object.id
            );
            return;
        }

        let mut private = master.clone();
        let children = std::mem::take(&mut private.child_objects);
        state.model.object.style = private.object.style.clone();
        state.model.object.variable_defs = private.object.variable_defs.clone();
        state.master = Some(private);

        for child in self.detach_children(id) {
            self.remove_subtree(child);
        }
        for child in children {
            self.build_child(Some(id), child);
        }
    }

    /// Point instance `id` at another master.
    ///
    /// The current children are detached and handed to the caller, who
    /// decides whether to keep them.
    pub fn update_master_id(&mut self, id: ElementId, master_id: &str) -> Vec<ElementId> {
        let Some(state) = self.instance_mut(id) else {
            return Vec::new();
        };
        state.model.master_id = master_id.to_string();
        self.detach_children(id)
    }

    /// Switch instance `id` to the state master `master_id`.
    ///
    /// Returns `None` if that master is already current. Otherwise the
    /// current master id is pushed onto the state stack and the detached
    /// children are returned.
    pub fn present_state(&mut self, id: ElementId, master_id: &str) -> Option<Vec<ElementId>> {
        let state = self.instance_mut(id)?;
        if state.model.master_id == master_id {
            return None;
        }
        let previous = std::mem::replace(&mut state.model.master_id, master_id.to_string());
        debug!(
            instance = state.model.object.id.as_str(),
            from = previous.as_str(),
            to = master_id;
            "Presenting state"
        );
        state.state_stack.push(previous);
        Some(self.detach_children(id))
    }

    /// Return instance `id` to the master it showed before the last
    /// [`present_state`](Self::present_state).
    ///
    /// Returns the restored master id, or `None` when no state is presented.
    /// Children are left for the caller to rebuild.
    pub fn dismiss_state(&mut self, id: ElementId) -> Option<String> {
        let state = self.instance_mut(id)?;
        let previous = state.state_stack.pop()?;
        state.model.master_id = previous.clone();
        Some(previous)
    }

    /// Forget every presented state of instance `id`.
    pub fn reset_state(&mut self, id: ElementId) {
        if let Some(state) = self.instance_mut(id) {
            state.state_stack.clear();
        }
    }

    /// Snapshot the subtree of instance `id` the first time this is called.
    pub fn save_override_tree_if_needed(&mut self, id: ElementId) {
        if self.instance(id).is_none_or(|state| state.baseline.is_some()) {
            return;
        }
        let baseline = Box::new(self.clone_tree(id));
        if let Some(state) = self.instance_mut(id) {
            state.baseline = Some(baseline);
        }
    }

    /// Whether event listeners attached inside instance `id` are still valid.
    ///
    /// They are while a state is presented, before any baseline exists, and
    /// while the baseline still names the current master.
    pub fn should_keep_listeners(&self, id: ElementId) -> bool {
        let Some(state) = self.instance(id) else {
            return false;
        };
        if !state.state_stack.is_empty() {
            return true;
        }
        let Some(baseline) = state.baseline() else {
            return true;
        };
        baseline
            .root()
            .and_then(|root| baseline.instance(root))
            .is_some_and(|original| original.master_id() == state.master_id())
    }

    /// Replace the variable assignments of instance `id` from JSON.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not an instance or `json` is not a list of
    /// assignments.
    pub fn update_variable_assignments(
        &mut self,
        id: ElementId,
        json: Value,
    ) -> Result<(), OverrideError> {
        let state = self.instance_mut(id).ok_or(OverrideError::NoPayload)?;
        let assignments: Vec<VariableAssign> =
            serde_json::from_value(json).map_err(|source| OverrideError::Incompatible {
                kind: "symbolInstance",
                source,
            })?;
        state.model.variable_assignments = Some(assignments);
        Ok(())
    }
}
