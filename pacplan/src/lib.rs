mod collision;
mod decide;
mod mapping;
mod orphan;
mod plan;
mod sanitise;

pub use mapping::candidate_rel;
pub use plan::plan;
pub use sanitise::{sanitise_rel_path, sanitise_segment};
