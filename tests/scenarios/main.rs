//! Scenario-based tests for image pipeline assembly

mod helpers;

mod component_ordering;
mod defaults;
mod end_to_end;
mod template_substitution;
mod unsupported_os;
