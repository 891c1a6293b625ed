//! Reading settings from environment variables.

use std::{env, str::FromStr, fmt::Display};

use anyhow::{anyhow, bail, Result};

/// `Ok(None)` if the variable is not set, an error if it is set but
/// can't be decoded or parsed.
pub fn opt_get_env<T: FromStr>(varname: &str) -> Result<Option<T>>
    where T::Err: Display
{
    match env::var(varname) {
        Ok(s) => {
            Ok(Some(s.parse().map_err(
                |e| anyhow!("could not parse {varname:?} env var with contents {s:?}: {e}"))?))
        },
        Err(e) => match e {
            env::VarError::NotPresent => Ok(None),
            env::VarError::NotUnicode(_) => bail!("could not decode {varname:?} env var: {e}")
        }
    }
}

/// Parse a switch the way shell users write them.
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim() {
        "0" | "" | "off" | "false" | "no" => Ok(false),
        "1" | "on" | "true" | "yes" => Ok(true),
        _ => bail!("not a boolean value: {s:?}")
    }
}

/// Unset means false.
pub fn get_env_bool(varname: &str) -> Result<bool> {
    match opt_get_env::<String>(varname)? {
        Some(s) => parse_bool(&s).map_err(|e| anyhow!("{varname:?} env var: {e}")),
        None => Ok(false)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_parse_bool() {
        assert_eq!(parse_bool("").unwrap(), false);
        assert_eq!(parse_bool("0").unwrap(), false);
        assert_eq!(parse_bool("off").unwrap(), false);
        assert_eq!(parse_bool(" yes\n").unwrap(), true);
        assert_eq!(parse_bool("1").unwrap(), true);
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn t_get_env_bool_unset() {
        assert_eq!(get_env_bool("BEMPLATE_TEST_SURELY_UNSET_VARIABLE").unwrap(), false);
        assert_eq!(opt_get_env::<u32>("BEMPLATE_TEST_SURELY_UNSET_VARIABLE").unwrap(), None);
    }
}
