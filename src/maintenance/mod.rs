// Destructive maintenance operations

pub mod delete_flow;

pub use delete_flow::{DeleteFlow, DeleteFlowState};
