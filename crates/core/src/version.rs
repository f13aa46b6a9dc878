/// Version line shown by the command-line tools, e.g.
/// `hc2 1.1.0 (git: main 3f2c1ab)`.
pub fn format_full_version(cmd_name: &str, version: &str, branch: &str, commit: &str) -> String {
    let mut parts = vec![cmd_name.to_string()];

    parts.push(if version.is_empty() { "unknown" } else { version }.to_string());

    if !branch.is_empty() || !commit.is_empty() {
        let branch = if branch.is_empty() { "unknown" } else { branch };
        let commit = if commit.is_empty() { "unknown" } else { commit };
        parts.push(format!("(git: {branch} {commit})"));
    }

    parts.join(" ")
}
