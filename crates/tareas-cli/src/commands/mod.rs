pub mod add;
pub mod delete;
pub mod list;
pub mod serve;
pub mod set;
pub mod show;
pub mod stats;
