use std::env;
use std::fmt;
use std::path::Path;

use crate::command_runner::{CommandRunner, SystemCommandRunner};
use crate::config::{ProjectConfig, home_dir, load_config_or_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

/// Where the token may come from; the doctor only checks presence.
#[derive(Debug, Clone, Copy)]
pub struct TokenSources<'a> {
    pub token_file: &'a Path,
    pub env_token_present: bool,
}

pub fn run_doctor(config_path: &Path, tokens: TokenSources<'_>) -> DoctorReport {
    let runner = SystemCommandRunner::new();
    run_doctor_with_runner(&runner, config_path, tokens)
}

pub fn run_doctor_with_runner(
    runner: &dyn CommandRunner,
    config_path: &Path,
    tokens: TokenSources<'_>,
) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match env::consts::OS {
        "macos" => pass_check("os is supported", "detected macOS"),
        "linux" => pass_check("os is supported", "detected Linux"),
        detected => fail_check(
            "os is supported",
            format!("detected {detected}, expected macOS or Linux"),
        ),
    });

    checks.push(check_version_callable(runner, "git", "git is installed"));

    let config = match load_config_or_default(config_path) {
        Ok(config) => {
            checks.push(pass_check(
                "config parses and validates",
                if config_path.exists() {
                    format!("loaded {}", config_path.display())
                } else {
                    format!("{} not found, using defaults", config_path.display())
                },
            ));
            Some(config)
        }
        Err(error) => {
            checks.push(fail_check("config parses and validates", error.to_string()));
            None
        }
    };

    let settings = match (config, home_dir()) {
        (Some(config), Ok(home)) => Some(ProjectConfig::from_config(&config, &home)),
        (Some(_), Err(error)) => {
            checks.push(fail_check("home directory resolves", error.to_string()));
            None
        }
        (None, _) => None,
    };

    match settings {
        Some(settings) => {
            checks.push(check_version_callable(
                runner,
                &settings.editor_program,
                "editor is installed",
            ));
            checks.push(check_projects_root(&settings.projects_root));
        }
        None => {
            push_skipped_checks(
                &mut checks,
                &["editor is installed", "projects root usable"],
                "config is invalid",
            );
        }
    }

    checks.push(check_token_sources(tokens));

    DoctorReport { checks }
}

fn check_version_callable(runner: &dyn CommandRunner, program: &str, name: &str) -> DoctorCheck {
    if !is_executable_in_path(program) {
        return fail_check(name, format!("{program} executable not found in PATH"));
    }

    match runner.run(program, &["--version"], None) {
        Ok(output) if output.status_code == 0 => pass_check(
            name,
            output
                .stdout
                .lines()
                .next()
                .unwrap_or(program)
                .trim()
                .to_string(),
        ),
        Ok(output) => fail_check(
            name,
            format!(
                "{program} returned exit code {} with output: {}",
                output.status_code,
                output.stderr.trim()
            ),
        ),
        Err(error) => fail_check(name, format!("failed to execute {program}: {error}")),
    }
}

fn check_projects_root(projects_root: &Path) -> DoctorCheck {
    const NAME: &str = "projects root usable";

    if projects_root.is_dir() {
        pass_check(NAME, format!("found {}", projects_root.display()))
    } else if projects_root.exists() {
        fail_check(
            NAME,
            format!("{} exists but is not a directory", projects_root.display()),
        )
    } else {
        pass_check(
            NAME,
            format!(
                "{} will be created on first clone",
                projects_root.display()
            ),
        )
    }
}

fn check_token_sources(tokens: TokenSources<'_>) -> DoctorCheck {
    const NAME: &str = "github token available";

    if tokens.token_file.is_file() {
        pass_check(NAME, format!("found {}", tokens.token_file.display()))
    } else if tokens.env_token_present {
        pass_check(NAME, "GITHUB_TOKEN is set")
    } else {
        fail_check(
            NAME,
            format!(
                "neither {} nor GITHUB_TOKEN found; proman will prompt for a token",
                tokens.token_file.display()
            ),
        )
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}

pub fn is_executable_in_path(program: &str) -> bool {
    let program_path = Path::new(program);

    if program_path.is_absolute() || program.contains('/') {
        return is_executable_file(program_path);
    }

    let path_value = match env::var_os("PATH") {
        Some(value) => value,
        None => return false,
    };

    env::split_paths(&path_value)
        .map(|directory| directory.join(program))
        .any(|candidate| is_executable_file(&candidate))
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match path.metadata() {
            Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRunner;

    #[test]
    fn check_state_display_is_uppercase_label() {
        assert_eq!(CheckState::Pass.to_string(), "PASS");
        assert_eq!(CheckState::Fail.to_string(), "FAIL");
    }

    #[test]
    fn doctor_summary_counts_pass_and_fail() {
        let report = DoctorReport {
            checks: vec![
                pass_check("a", "ok"),
                fail_check("b", "no"),
                pass_check("c", "ok"),
            ],
        };

        assert_eq!(report.summary(), "2 passed, 1 failed");
        assert!(report.has_failures());
    }

    #[test]
    fn projects_root_that_is_a_file_fails() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        assert_eq!(check_projects_root(file.path()).state, CheckState::Fail);

        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(check_projects_root(dir.path()).state, CheckState::Pass);
        assert_eq!(
            check_projects_root(&dir.path().join("later")).state,
            CheckState::Pass
        );
    }

    #[test]
    fn token_check_accepts_file_or_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let token_file = dir.path().join(".proman");

        let missing = check_token_sources(TokenSources {
            token_file: &token_file,
            env_token_present: false,
        });
        assert_eq!(missing.state, CheckState::Fail);

        let from_env = check_token_sources(TokenSources {
            token_file: &token_file,
            env_token_present: true,
        });
        assert_eq!(from_env.state, CheckState::Pass);

        std::fs::write(&token_file, "ghp_x\n").expect("token file");
        let from_file = check_token_sources(TokenSources {
            token_file: &token_file,
            env_token_present: false,
        });
        assert_eq!(from_file.state, CheckState::Pass);
    }

    #[test]
    fn invalid_config_skips_dependent_checks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "version = 9\n").expect("config");
        let runner = RecordingRunner::default();

        let report = run_doctor_with_runner(
            &runner,
            &config_path,
            TokenSources {
                token_file: &dir.path().join(".proman"),
                env_token_present: true,
            },
        );

        let config_check = report
            .checks
            .iter()
            .find(|check| check.name == "config parses and validates")
            .expect("config check");
        assert_eq!(config_check.state, CheckState::Fail);

        let editor_check = report
            .checks
            .iter()
            .find(|check| check.name == "editor is installed")
            .expect("editor check");
        assert!(editor_check.details.contains("skipped because config is invalid"));
        assert!(report.has_failures());
    }
}
