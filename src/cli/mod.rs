//! CLI command implementations

pub mod challenge;
pub mod init;
pub mod library;
pub mod profile;
pub mod user;

/// Truncate a string for table output
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
