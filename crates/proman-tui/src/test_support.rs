use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proman_app::App;
use proman_app::record::RepositoryRecord;
use proman_core::audit::AuditLog;
use proman_core::command_runner::{CommandOutput, CommandRunner};
use proman_core::config::{CloneProtocol, ProjectConfig, PromanConfig};
use proman_core::editor::ReadinessPolicy;
use proman_core::remote::{
    NewRepository, RemoteError, RemoteOwner, RemoteRepository, RepositoryEdit, RepositoryPage,
    RepositorySource,
};
use proman_core::time::FixedClock;
use tempfile::TempDir;

pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub(crate) fn remote_repository(full_name: &str) -> RemoteRepository {
    let (owner, name) = full_name.split_once('/').expect("owner/name");
    RemoteRepository {
        full_name: full_name.to_string(),
        name: name.to_string(),
        owner: RemoteOwner {
            login: owner.to_string(),
        },
        description: None,
        private: false,
        html_url: format!("https://github.com/{full_name}"),
        ssh_url: Some(format!("git@github.com:{full_name}.git")),
        clone_url: Some(format!("https://github.com/{full_name}.git")),
        stargazers_count: 0,
        forks_count: 0,
        open_issues_count: 0,
        language: None,
        default_branch: Some("main".to_string()),
        topics: Vec::new(),
        created_at: None,
        updated_at: None,
        archived: false,
        disabled: false,
    }
}

/// A record resolved against `/home/u` with default settings.
pub(crate) fn record(full_name: &str) -> RepositoryRecord {
    let settings = ProjectConfig::from_config(&PromanConfig::default(), Path::new("/home/u"));
    RepositoryRecord::from_remote(remote_repository(full_name), &settings)
}

pub(crate) fn page(full_names: &[&str]) -> RepositoryPage {
    RepositoryPage {
        items: full_names
            .iter()
            .map(|name| remote_repository(name))
            .collect(),
        next_page: None,
        total_hint: Some(full_names.len()),
    }
}

#[derive(Default)]
pub(crate) struct ScriptedRunner {
    outputs: RefCell<VecDeque<CommandOutput>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn push_success(&self) {
        self.outputs.borrow_mut().push_back(CommandOutput {
            status_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));
        self.outputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("missing scripted output"))
    }

    fn spawn_detached(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("spawn {program} {}", args.join(" ")));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct ScriptedRemote {
    pub(crate) pages: RefCell<VecDeque<Result<RepositoryPage, RemoteError>>>,
    pub(crate) results: RefCell<VecDeque<Result<RemoteRepository, RemoteError>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRemote {
    pub(crate) fn push_page(&self, page: Result<RepositoryPage, RemoteError>) {
        self.pages.borrow_mut().push_back(page);
    }

    pub(crate) fn push_result(&self, result: Result<RemoteRepository, RemoteError>) {
        self.results.borrow_mut().push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn next_result(&self) -> Result<RemoteRepository, RemoteError> {
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Parse("no scripted result".to_string())))
    }
}

impl RepositorySource for ScriptedRemote {
    fn fetch_page(&self, page: u32) -> Result<RepositoryPage, RemoteError> {
        self.calls.borrow_mut().push(format!("fetch {page}"));
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Parse("no scripted page".to_string())))
    }

    fn create_repository(&self, request: &NewRepository) -> Result<RemoteRepository, RemoteError> {
        self.calls
            .borrow_mut()
            .push(format!("create {} private={}", request.name, request.private));
        self.next_result()
    }

    fn edit_repository(
        &self,
        full_name: &str,
        edit: &RepositoryEdit,
    ) -> Result<RemoteRepository, RemoteError> {
        self.calls
            .borrow_mut()
            .push(format!("edit {full_name} {:?}", edit.name));
        self.next_result()
    }

    fn delete_repository(&self, full_name: &str) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(format!("delete {full_name}"));
        self.next_result().map(|_| ())
    }
}

pub(crate) struct Harness {
    _temp: TempDir,
    pub(crate) settings: ProjectConfig,
    pub(crate) audit: AuditLog,
    pub(crate) runner: ScriptedRunner,
    pub(crate) remote: ScriptedRemote,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let settings = ProjectConfig {
            projects_root: temp.path().join("projekte"),
            audit_log: temp.path().join("proman.log"),
            fixed_timestamp: Some("2025-01-01T00:00:00Z".to_string()),
            api_base: "https://api.github.invalid".to_string(),
            per_page: 100,
            clone_protocol: CloneProtocol::Ssh,
            editor_program: "nvim".to_string(),
            socket_dir: temp.path().join("sockets"),
        };
        let audit = AuditLog::new(
            settings.audit_log.clone(),
            Box::new(FixedClock("2025-01-01T00:00:00Z".to_string())),
        );

        Self {
            _temp: temp,
            settings,
            audit,
            runner: ScriptedRunner::default(),
            remote: ScriptedRemote::default(),
        }
    }

    pub(crate) fn app(&self) -> App<'_> {
        App::new(&self.runner, &self.remote, &self.settings, &self.audit).with_editor_readiness(
            ReadinessPolicy {
                attempts: 2,
                interval: Duration::ZERO,
            },
        )
    }

    pub(crate) fn make_local_copy(&self, short_name: &str) -> PathBuf {
        let path = self.settings.projects_root.join(short_name);
        fs::create_dir_all(path.join(".git")).expect("create local copy");
        path
    }

    pub(crate) fn audit_lines(&self) -> Vec<String> {
        fs::read_to_string(&self.settings.audit_log)
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
