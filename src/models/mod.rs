pub mod entry;
pub mod settings;

pub use entry::WeightEntry;
pub use settings::PlanSettings;
