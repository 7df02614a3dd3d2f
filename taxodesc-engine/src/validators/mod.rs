//! Article and result validators
//!
//! # Validators
//! 1. **admissibility** - Pre-filters deciding whether an article is eligible
//! 2. **criteria** - Lead and title criteria from the task configuration
//! 3. **plausibility** - Rank versus title-shape check on a resolved rank

pub mod admissibility;
pub mod criteria;
pub mod plausibility;

pub use admissibility::check_admissible;
pub use criteria::check_criteria;
pub use plausibility::assess_plausibility;
