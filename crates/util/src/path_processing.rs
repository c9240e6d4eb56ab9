use std::path::PathBuf;

use dirs_next::home_dir;

/// Expand a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home().join(rest);
    }
    PathBuf::from(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        temp_env::with_var("HOME", Some("/home/analyst"), || {
            assert_eq!(expand_tilde("~"), PathBuf::from("/home/analyst"));
            assert_eq!(expand_tilde("~/soar/manifests"), PathBuf::from("/home/analyst/soar/manifests"));
        });
    }

    #[test]
    fn leaves_other_paths_untouched() {
        assert_eq!(expand_tilde(" /etc/soar.json "), PathBuf::from("/etc/soar.json"));
        assert_eq!(expand_tilde("relative/~/dir"), PathBuf::from("relative/~/dir"));
    }
}
