use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unknown variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    env_var_pattern()
        .replace_all(value, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Expand environment variables in every value of a map
pub fn expand_env_vars(vars: &HashMap<String, String>) -> HashMap<String, String> {
    vars.iter()
        .map(|(key, value)| (key.clone(), expand_env_var_in_string(value)))
        .collect()
}
