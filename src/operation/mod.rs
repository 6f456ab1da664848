// src/operation/mod.rs

//! Value types describing what to run.
//!
//! - [`descriptor`] holds `OperationDescriptor`, the immutable description of
//!   one `brew` invocation.
//! - [`package`] and [`install_option`] are the plain data a descriptor can
//!   refer to.

pub mod descriptor;
pub mod install_option;
pub mod package;

pub use descriptor::OperationDescriptor;
pub use install_option::InstallOption;
pub use package::PackageRef;
