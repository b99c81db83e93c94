// Command abbreviation matching

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands.iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix.
/// Exact matches win over prefix matches. `Err` carries the candidates,
/// empty when nothing matched.
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    let prefix_lower = prefix.to_lowercase();
    if let Some(cmd) = commands.iter().find(|cmd| cmd.to_lowercase() == prefix_lower) {
        return Ok(*cmd);
    }

    let matches = find_matching_commands(prefix, commands);
    match matches.len() {
        1 => Ok(matches[0]),
        _ => Err(matches),
    }
}

/// Top-level commands
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "add", "list", "show", "modify", "delete", "board", "move", "summary", "stages", "log", "seed",
];

/// Commands accepted in `<id> <command>` form
pub const LEAD_SUBCOMMANDS: &[&str] = &[
    "show", "modify", "delete", "move", "log",
];

fn ambiguous(kind: &str, arg: &str, matches: &[&str]) -> String {
    format!("Ambiguous {} '{}'. Did you mean one of: {}?", kind, arg, matches.join(", "))
}

/// Expand command abbreviations in the argument list.
///
/// `<id> <command> ...` is rewritten to `<command> <id> ...`, and a lone id
/// becomes `show <id>`. Anything unrecognised passes through untouched so
/// clap can report it.
pub fn expand_command_abbreviations(args: Vec<String>) -> Result<Vec<String>, String> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    if first.starts_with('-') {
        return Ok(args);
    }

    let mut expanded = Vec::with_capacity(args.len() + 1);

    if first.parse::<i64>().is_ok() {
        match args.get(1) {
            None => {
                expanded.push("show".to_string());
                expanded.push(first.clone());
                return Ok(expanded);
            }
            Some(next) if !next.starts_with('-') => match find_unique_command(next, LEAD_SUBCOMMANDS) {
                Ok(full_subcmd) => {
                    expanded.push(full_subcmd.to_string());
                    expanded.push(first.clone());
                    expanded.extend(args.into_iter().skip(2));
                    return Ok(expanded);
                }
                Err(matches) if !matches.is_empty() => {
                    return Err(ambiguous("lead command", next, &matches));
                }
                Err(_) => {}
            },
            Some(_) => {}
        }
        return Ok(args);
    }

    match find_unique_command(first, TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => {
            expanded.push(full_cmd.to_string());
            expanded.extend(args.into_iter().skip(1));
            Ok(expanded)
        }
        Err(matches) if !matches.is_empty() => Err(ambiguous("command", first, &matches)),
        Err(_) => Ok(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_unique_command() {
        assert_eq!(find_unique_command("b", TOP_LEVEL_COMMANDS), Ok("board"));
        assert_eq!(find_unique_command("mov", TOP_LEVEL_COMMANDS), Ok("move"));
        assert_eq!(find_unique_command("list", TOP_LEVEL_COMMANDS), Ok("list"));

        let matches = find_unique_command("m", TOP_LEVEL_COMMANDS).unwrap_err();
        assert_eq!(matches, vec!["modify", "move"]);
        assert!(find_unique_command("zzz", TOP_LEVEL_COMMANDS).unwrap_err().is_empty());
    }

    #[test]
    fn test_expand_top_level() {
        assert_eq!(expand_command_abbreviations(args(&["bo"])), Ok(args(&["board"])));
        assert_eq!(
            expand_command_abbreviations(args(&["su", "assignee=maria"])),
            Ok(args(&["summary", "assignee=maria"]))
        );

        let err = expand_command_abbreviations(args(&["s"])).unwrap_err();
        assert!(err.contains("Ambiguous command"));
    }

    #[test]
    fn test_expand_id_first() {
        assert_eq!(
            expand_command_abbreviations(args(&["3", "mov", "won"])),
            Ok(args(&["move", "3", "won"]))
        );
        assert_eq!(expand_command_abbreviations(args(&["3"])), Ok(args(&["show", "3"])));
        assert_eq!(
            expand_command_abbreviations(args(&["3", "del", "-y"])),
            Ok(args(&["delete", "3", "-y"]))
        );
        assert!(expand_command_abbreviations(args(&["3", "m"])).is_err());

        // Flags and unknown words pass through
        assert_eq!(expand_command_abbreviations(args(&["--help"])), Ok(args(&["--help"])));
        assert_eq!(expand_command_abbreviations(args(&["3", "--json"])), Ok(args(&["3", "--json"])));
    }
}
