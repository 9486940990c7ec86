pub mod enrollment;
pub mod roster_import;
