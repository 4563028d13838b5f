//! GitHub App that checks whether pull requests reference an issue.
pub mod checker;
pub mod config;
pub mod github;

#[cfg(test)]
mod tests;
