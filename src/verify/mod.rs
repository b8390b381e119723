// src/verify/mod.rs

pub mod checks;
pub mod client;

/// Render the delimited banner used by the verification binaries.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(80);
    format!("{rule}\n  {title}\n{rule}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_delimited_and_names_the_run() {
        let banner = banner("VERIFICATION: INCIDENTS & DISPUTES");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1], "  VERIFICATION: INCIDENTS & DISPUTES");
        assert_eq!(lines[2], lines[0]);
    }
}
