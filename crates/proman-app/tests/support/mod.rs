use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use proman_app::App;
use proman_app::inventory::{Inventory, SilentProgress};
use proman_core::audit::AuditLog;
use proman_core::command_runner::{CommandOutput, CommandRunner};
use proman_core::config::{CloneProtocol, ProjectConfig};
use proman_core::editor::ReadinessPolicy;
use proman_core::remote::{
    NewRepository, RemoteError, RemoteOwner, RemoteRepository, RepositoryEdit, RepositoryPage,
    RepositorySource,
};
use proman_core::time::FixedClock;
use tempfile::TempDir;

pub const FIXED_TIMESTAMP: &str = "2025-01-01T00:00:00Z";

#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    #[allow(dead_code)]
    pub detached: bool,
}

#[derive(Default)]
pub struct QueueRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    calls: Mutex<Vec<Call>>,
}

impl QueueRunner {
    pub fn new(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], detached: bool) {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
            detached,
        });
    }
}

impl CommandRunner for QueueRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.record(program, args, false);

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing scripted output")))
    }

    fn spawn_detached(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<()> {
        self.record(program, args, true);
        Ok(())
    }
}

pub fn output(stdout: &str, stderr: &str, status: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code: status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

pub fn remote_repository(full_name: &str) -> RemoteRepository {
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

pub fn single_page(full_names: &[&str]) -> RepositoryPage {
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
pub struct FakeRemote {
    pub pages: RefCell<VecDeque<Result<RepositoryPage, RemoteError>>>,
    pub delete_results: RefCell<VecDeque<Result<(), RemoteError>>>,
    pub edit_results: RefCell<VecDeque<Result<RemoteRepository, RemoteError>>>,
    pub create_results: RefCell<VecDeque<Result<RemoteRepository, RemoteError>>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub fn with_pages(pages: Vec<Result<RepositoryPage, RemoteError>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl RepositorySource for FakeRemote {
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
            .push(format!("create {}", request.name));
        self.create_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Parse("no scripted create".to_string())))
    }

    fn edit_repository(
        &self,
        full_name: &str,
        _edit: &RepositoryEdit,
    ) -> Result<RemoteRepository, RemoteError> {
        self.calls.borrow_mut().push(format!("edit {full_name}"));
        self.edit_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Parse("no scripted edit".to_string())))
    }

    fn delete_repository(&self, full_name: &str) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(format!("delete {full_name}"));
        self.delete_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Parse("no scripted delete".to_string())))
    }
}

pub struct Fixture {
    pub temp: TempDir,
    pub settings: ProjectConfig,
    pub audit: AuditLog,
    pub runner: QueueRunner,
    pub remote: FakeRemote,
}

impl Fixture {
    pub fn new(outputs: Vec<anyhow::Result<CommandOutput>>, remote: FakeRemote) -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let settings = ProjectConfig {
            projects_root: temp.path().join("projekte"),
            audit_log: temp.path().join("logs").join("proman.log"),
            fixed_timestamp: Some(FIXED_TIMESTAMP.to_string()),
            api_base: "https://api.github.invalid".to_string(),
            per_page: 100,
            clone_protocol: CloneProtocol::Ssh,
            editor_program: "nvim".to_string(),
            socket_dir: temp.path().join("sockets"),
        };
        let audit = AuditLog::new(
            settings.audit_log.clone(),
            Box::new(FixedClock(FIXED_TIMESTAMP.to_string())),
        );

        Self {
            temp,
            settings,
            audit,
            runner: QueueRunner::new(outputs),
            remote,
        }
    }

    pub fn app(&self) -> App<'_> {
        App::new(&self.runner, &self.remote, &self.settings, &self.audit).with_editor_readiness(
            ReadinessPolicy {
                attempts: 3,
                interval: Duration::ZERO,
            },
        )
    }

    pub fn fetch(&self) -> Inventory {
        self.app()
            .fetch_inventory(&mut SilentProgress)
            .expect("fetch inventory")
    }

    pub fn projects_root(&self) -> &Path {
        &self.settings.projects_root
    }

    pub fn local_path(&self, short_name: &str) -> PathBuf {
        self.settings.projects_root.join(short_name)
    }

    /// Creates a fake working copy on disk.
    pub fn make_local_copy(&self, short_name: &str) -> PathBuf {
        let path = self.local_path(short_name);
        fs::create_dir_all(path.join(".git")).expect("create local copy");
        fs::write(path.join("README.md"), "local work").expect("write file");
        path
    }

    pub fn audit_lines(&self) -> Vec<String> {
        match fs::read_to_string(&self.settings.audit_log) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}
