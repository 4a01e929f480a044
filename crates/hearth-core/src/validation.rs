//! Desync debugging: state diffs and determinism checks.
//!
//! Two nodes replaying the same block must produce byte-identical player
//! state. These helpers pinpoint where two aggregates diverge and re-run an
//! action to confirm it is deterministic.

use crate::action::{Action, ActionError};
use crate::context::ActionContext;
use crate::id::{SpaceNumber, StateId};
use crate::ledger::LedgerState;
use crate::state::RootState;

// ---------------------------------------------------------------------------
// State diff types
// ---------------------------------------------------------------------------

/// Where two aggregates disagree about one instance or slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceDiff {
    OnlyInA(StateId),
    OnlyInB(StateId),
    Mismatch(StateId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDiff {
    pub edibles: Vec<InstanceDiff>,
    pub equipment: Vec<InstanceDiff>,
    /// Appliance spaces whose installation or reservation differs.
    pub spaces: Vec<SpaceNumber>,
    /// One side has a house and the other does not, or the house differs
    /// outside of its kitchen.
    pub house_differs: bool,
}

impl StateDiff {
    pub fn is_identical(&self) -> bool {
        self.edibles.is_empty()
            && self.equipment.is_empty()
            && self.spaces.is_empty()
            && !self.house_differs
    }
}

/// Compute a detailed diff between two player states.
pub fn diff_root_states(a: &RootState, b: &RootState) -> StateDiff {
    let mut diff = StateDiff::default();

    for edible in a.inventory.edibles() {
        match b.inventory.edible(edible.state_id) {
            None => diff.edibles.push(InstanceDiff::OnlyInA(edible.state_id)),
            Some(other) if other != edible => {
                diff.edibles.push(InstanceDiff::Mismatch(edible.state_id))
            }
            Some(_) => {}
        }
    }
    for edible in b.inventory.edibles() {
        if a.inventory.edible(edible.state_id).is_none() {
            diff.edibles.push(InstanceDiff::OnlyInB(edible.state_id));
        }
    }

    for equipment in a.inventory.equipment_iter() {
        match b.inventory.equipment(equipment.state_id) {
            None => diff.equipment.push(InstanceDiff::OnlyInA(equipment.state_id)),
            Some(other) if other != equipment => {
                diff.equipment.push(InstanceDiff::Mismatch(equipment.state_id))
            }
            Some(_) => {}
        }
    }
    for equipment in b.inventory.equipment_iter() {
        if a.inventory.equipment(equipment.state_id).is_none() {
            diff.equipment.push(InstanceDiff::OnlyInB(equipment.state_id));
        }
    }

    match (a.village.as_ref(), b.village.as_ref()) {
        (None, None) => {}
        (Some(va), Some(vb)) => {
            let (ha, hb) = (&va.house, &vb.house);
            diff.house_differs = ha.village_id != hb.village_id || ha.x != hb.x || ha.y != hb.y;
            for number in SpaceNumber::ALL {
                if ha.kitchen.space(number) != hb.kitchen.space(number) {
                    diff.spaces.push(number);
                }
            }
        }
        _ => diff.house_differs = true,
    }

    diff
}

// ---------------------------------------------------------------------------
// Determinism check
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DeterminismError {
    #[error("run {run} produced a different ledger state")]
    Diverged { run: usize },
    #[error("run {run} {outcome} while run 0 did not")]
    OutcomeChanged { run: usize, outcome: &'static str },
}

/// Execute `action` `runs` times against the same snapshot, building a fresh
/// context for every run with `make_ctx`, and require identical results.
///
/// Returns the first run's outcome when every run agrees.
pub fn check_determinism<'c, A, F>(
    action: &A,
    mut make_ctx: F,
    previous: &LedgerState,
    runs: usize,
) -> Result<Result<LedgerState, ActionError>, DeterminismError>
where
    A: Action + ?Sized,
    F: FnMut() -> ActionContext<'c>,
{
    let mut ctx = make_ctx();
    let first = action.execute(&mut ctx, previous);

    for run in 1..runs.max(1) {
        let mut ctx = make_ctx();
        let next = action.execute(&mut ctx, previous);
        match (&first, &next) {
            (Ok(a), Ok(b)) if a != b => return Err(DeterminismError::Diverged { run }),
            (Err(a), Err(b)) if a != b => return Err(DeterminismError::Diverged { run }),
            (Ok(_), Err(_)) => {
                return Err(DeterminismError::OutcomeChanged { run, outcome: "failed" });
            }
            (Err(_), Ok(_)) => {
                return Err(DeterminismError::OutcomeChanged { run, outcome: "succeeded" });
            }
            _ => {}
        }
    }

    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::KitchenState;
    use crate::test_utils::*;

    #[test]
    fn identical_states_have_empty_diff() {
        let catalog = test_catalog();
        let root = preset_for(&catalog, FEAST).root;
        assert!(diff_root_states(&root, &root.clone()).is_identical());
    }

    #[test]
    fn diff_reports_instances_on_each_side() {
        let catalog = test_catalog();
        let a = preset_for(&catalog, CHOP).root;
        let only_b = StateId([0xee; 16]);
        let b = a.clone().with_inventory(
            a.inventory
                .clone()
                .remove_edible(StateId([1; 16]))
                .unwrap()
                .add_edible(ingredient(only_b, 7))
                .unwrap(),
        );
        let diff = diff_root_states(&a, &b);
        assert_eq!(
            diff.edibles,
            vec![InstanceDiff::OnlyInA(StateId([1; 16])), InstanceDiff::OnlyInB(only_b)]
        );
        assert!(diff.equipment.is_empty());
        assert!(!diff.is_identical());
    }

    #[test]
    fn diff_reports_changed_spaces() {
        let catalog = test_catalog();
        let a = preset_for(&catalog, ROAST).root;
        let b = a.clone().with_kitchen(KitchenState::new()).unwrap();
        assert_eq!(diff_root_states(&a, &b).spaces, vec![SpaceNumber::FIRST]);
    }

    #[test]
    fn diff_reports_missing_house() {
        let a = empty_house();
        let b = RootState::default();
        assert!(diff_root_states(&a, &b).house_differs);
    }

    #[test]
    fn create_food_is_deterministic() {
        let catalog = test_catalog();
        let preset = preset_for(&catalog, FEAST);
        let action = preset.create_food(FEAST, StateId([0xf0; 16]));
        let outcome = check_determinism(
            &action,
            || ActionContext::new(&catalog, signer(), 1),
            &preset.ledger(),
            5,
        )
        .unwrap();
        assert!(outcome.is_ok());
    }

    #[test]
    fn rejected_action_is_deterministic_too() {
        let catalog = test_catalog();
        let preset = preset_for(&catalog, FEAST);
        let action = preset.create_food(SOUP, StateId([0xf0; 16]));
        let outcome = check_determinism(
            &action,
            || ActionContext::new(&catalog, signer(), 1),
            &preset.ledger(),
            3,
        )
        .unwrap();
        assert!(outcome.is_err());
    }
}
