// Shared HTTP plumbing
pub mod rest;

pub mod tool1;
pub mod tool2;
pub mod tool3;
