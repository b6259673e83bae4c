use heck::ToLowerCamelCase;

use crate::flatten::command::{Command, CommandTable};

/// Domain whose lifecycle members resolve without a view/action segment.
pub const SESSION_DOMAIN: &str = "session";

/// Candidate canonical names probed for a `(domain, member)` access, in
/// probe order. Source documents encode read-only and mutating operations
/// with a fixed `view`/`action` identifier substring; the caller surface
/// must not require knowing which category a member belongs to, so both
/// are tried.
pub fn candidates(domain: &str, member: &str) -> Vec<String> {
    let mut names = vec![
        format!("{domain}-view-{member}").to_lower_camel_case(),
        format!("{domain}-action-{member}").to_lower_camel_case(),
    ];
    if domain == SESSION_DOMAIN {
        names.push(member.to_lower_camel_case());
    }
    names
}

impl CommandTable {
    /// Resolve a caller-typed `(domain, member)` pair to a registered
    /// command; first candidate wins.
    pub fn resolve(&self, domain: &str, member: &str) -> Option<&Command> {
        candidates(domain, member)
            .iter()
            .find_map(|name| self.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_probe_view_then_action() {
        assert_eq!(
            candidates("core", "alertsSummary"),
            vec!["coreViewAlertsSummary", "coreActionAlertsSummary"]
        );
    }

    #[test]
    fn test_session_domain_adds_bare_member() {
        assert_eq!(
            candidates("session", "create"),
            vec!["sessionViewCreate", "sessionActionCreate", "create"]
        );
    }
}
