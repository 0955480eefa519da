//! Pure step calculators.
//!
//! # Architecture
//!
//! ```text
//! [ AttributeChange (definition, pre, post) ]
//!      ↓
//! [ Potential (cost/refund + synergy multiplier) ]
//!      ↓
//! [ Material (layered cost per material type) ]
//!      ↓
//! [ Success (single + expected rate) ]
//! ```
//!
//! ## Principles
//!
//! 1. **Pure**: No state, no I/O; the record feeds snapshots in
//! 2. **Exact**: Integer and fixed-point arithmetic only, truncation spelled out
//! 3. **Order-independent**: Inputs are sorted maps so results never depend on
//!    iteration order

pub mod material;
pub mod potential;
pub mod success;

pub use material::{MaterialCosts, attribute_material_cost, layer_cost, step_material_costs};
pub use potential::{
    StepPotential, calculate_step_potential, decrease_refund, increase_cost,
    property_potential_delta, synergy_multiplier,
};
pub use success::{expected_success_rate, single_success_rate};

use crate::catalog::PropertyDefinition;

/// One attribute moving from `pre` to `post` within a step.
#[derive(Clone, Copy, Debug)]
pub struct AttributeChange<'a> {
    pub definition: &'a PropertyDefinition,
    pub pre: i32,
    pub post: i32,
}

impl<'a> AttributeChange<'a> {
    pub fn new(definition: &'a PropertyDefinition, pre: i32, post: i32) -> Self {
        Self {
            definition,
            pre,
            post,
        }
    }

    pub fn delta(&self) -> i64 {
        i64::from(self.post) - i64::from(self.pre)
    }

    pub fn is_noop(&self) -> bool {
        self.pre == self.post
    }
}
