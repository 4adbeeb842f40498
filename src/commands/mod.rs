pub mod install;
pub mod read_only;
