//! Required tool detection
//!
//! Runs before any network or filesystem work.

use tracing::debug;

use crate::error::{InstallError, Result};

/// Fail on the first tool in `tools` that cannot be found on `PATH`
pub fn check_dependencies<S: AsRef<str>>(tools: &[S]) -> Result<()> {
    for tool in tools {
        let tool = tool.as_ref();
        match which::which(tool) {
            Ok(path) => debug!(tool = tool, path = %path.display(), "found required tool"),
            Err(_) => return Err(InstallError::missing_dependency(tool)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "kubev-install-no-such-tool-7f3a";

    #[test]
    fn test_empty_list_passes() {
        let tools: [&str; 0] = [];
        assert!(check_dependencies(&tools).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_present_tool_passes() {
        assert!(check_dependencies(&["sh"]).is_ok());
    }

    #[test]
    fn test_missing_tool_is_named() {
        let err = check_dependencies(&[MISSING]).unwrap_err();
        assert!(matches!(err, InstallError::MissingDependency { ref tool } if tool == MISSING));
        assert!(err.to_string().contains(MISSING));
    }

    #[cfg(unix)]
    #[test]
    fn test_reports_first_missing_tool() {
        let second = format!("{}-second", MISSING);
        let err = check_dependencies(&["sh", MISSING, second.as_str()]).unwrap_err();
        assert!(matches!(err, InstallError::MissingDependency { ref tool } if tool == MISSING));
    }
}
