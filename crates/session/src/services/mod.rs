//! Typed API services built on the client pipeline

pub mod employee;

pub use employee::{Employee, EmployeeDraft, EmployeePage, EmployeeService};
