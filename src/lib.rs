//! Method Workflow - revision and dual-approval engine for test method documents.
//!
//! Documents move from draft through review to publication. Publishing
//! needs two approvals from distinct reviewers plus an administrator, and a
//! published document is changed only through a revision that is merged
//! back into it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
