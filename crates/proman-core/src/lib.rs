pub mod audit;
pub(crate) mod command_adapter;
pub mod command_runner;
pub mod config;
pub mod doctor;
pub mod editor;
pub mod git;
pub mod github;
pub mod local_state;
pub mod names;
pub mod path_safety;
pub mod remote;
#[cfg(test)]
pub(crate) mod test_support;
pub mod time;
