//! This module contains models that predict the next label in a sequence of
//! labels, and the policies that combine them.

pub mod mixer;
pub mod model;
pub mod runs;
pub mod transitions;
