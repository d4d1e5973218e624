// ABOUTME: Command alias expansion from the `alias` config section.
// ABOUTME: Rewrites the first argument into its configured replacement words.

use std::collections::HashMap;

/// Expand a configured alias in `args` (program name first).
///
/// Only the first argument after the program name is considered, so
/// global flags must follow an alias (`ecs cls --arn`).
pub fn expand_alias(args: Vec<String>, aliases: &HashMap<String, String>) -> Vec<String> {
    let Some(first) = args.get(1) else {
        return args;
    };
    let Some(replacement) = aliases.get(first) else {
        return args;
    };

    let mut expanded = Vec::with_capacity(args.len() + 2);
    expanded.push(args[0].clone());
    expanded.extend(replacement.split_whitespace().map(str::to_string));
    expanded.extend(args.into_iter().skip(2));
    tracing::debug!("expanded alias {:?}", expanded);
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn aliases() -> HashMap<String, String> {
        HashMap::from([
            ("cls".to_string(), "cluster ls".to_string()),
            ("dp".to_string(), "service deploy".to_string()),
        ])
    }

    #[test]
    fn expands_alias_in_first_position() {
        let out = expand_alias(args(&["ecs", "cls", "--arn"]), &aliases());
        assert_eq!(out, args(&["ecs", "cluster", "ls", "--arn"]));
    }

    #[test]
    fn keeps_trailing_arguments() {
        let out = expand_alias(args(&["ecs", "dp", "production", "app1", "v2"]), &aliases());
        assert_eq!(
            out,
            args(&["ecs", "service", "deploy", "production", "app1", "v2"])
        );
    }

    #[test]
    fn leaves_unknown_commands_alone() {
        let input = args(&["ecs", "service", "ls", "production"]);
        assert_eq!(expand_alias(input.clone(), &aliases()), input);
    }

    #[test]
    fn ignores_alias_in_later_position() {
        let input = args(&["ecs", "service", "cls"]);
        assert_eq!(expand_alias(input.clone(), &aliases()), input);
    }

    #[test]
    fn no_arguments() {
        let input = args(&["ecs"]);
        assert_eq!(expand_alias(input.clone(), &aliases()), input);
    }
}
