pub mod align;
pub mod validation;

pub use align::{align_by_key, align_picks, AlignError};
pub use validation::{accepted_edits, validate_picks, InvalidPoints, TierCheck, ValidationReport};
