#[cfg(test)]
#[path = "path_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

/// Path convention server launch arguments should be rewritten to.
/// Detection is best-effort: anything that is neither Windows nor WSL
/// passes arguments through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Native,
    /// Running under WSL: Windows drive paths become /mnt/<drive>/...
    Wsl,
    /// Running on Windows: WSL mount paths become drive-letter paths
    Windows,
}

static WINDOWS_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]):\\(.*)$").expect("valid windows path pattern"));
static WSL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/mnt/([a-z])/(.*)$").expect("valid wsl path pattern"));

pub fn detect_convention() -> Convention {
    if cfg!(windows) {
        return Convention::Windows;
    }
    let osrelease = std::fs::read_to_string("/proc/sys/kernel/osrelease").unwrap_or_default();
    if osrelease.to_lowercase().contains("microsoft") {
        return Convention::Wsl;
    }
    Convention::Native
}

/// Rewrites launch arguments that look like filesystem paths to the
/// detected host convention.
pub fn normalize_args(args: &[String]) -> Vec<String> {
    normalize_args_for(detect_convention(), args)
}

fn normalize_args_for(convention: Convention, args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| normalize_arg(convention, arg))
        .collect()
}

fn normalize_arg(convention: Convention, arg: &str) -> String {
    match convention {
        Convention::Native => arg.to_string(),
        Convention::Wsl => match WINDOWS_PATH.captures(arg) {
            Some(cap) => format!(
                "/mnt/{}/{}",
                cap[1].to_lowercase(),
                cap[2].replace('\\', "/")
            ),
            None => arg.to_string(),
        },
        Convention::Windows => match WSL_PATH.captures(arg) {
            Some(cap) => format!(
                "{}:\\{}",
                cap[1].to_uppercase(),
                cap[2].replace('/', "\\")
            ),
            None => arg.to_string(),
        },
    }
}
