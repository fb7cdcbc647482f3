//! In-memory doubles for the application tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::domain::ports::{
    CommandOutput, CommandRunner, DeployEvent, DeployEventSink, EntryKind, FsError, FsResult,
    Level, RemoteConnector, RemoteFs, RemoteSession, Sleeper,
};
use crate::domain::value_objects::RemotePath;
use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
    Link(String),
}

#[derive(Default)]
struct MemoryState {
    nodes: RefCell<BTreeMap<String, Node>>,
    ops: RefCell<Vec<String>>,
    failing: RefCell<BTreeSet<String>>,
    closed: Cell<usize>,
}

/// Remote file system kept in a map of absolute path -> node.
///
/// Clones share state, so a test can keep a handle while the pipeline owns
/// the boxed session.
#[derive(Clone, Default)]
pub struct MemoryRemoteFs {
    state: Rc<MemoryState>,
}

impl MemoryRemoteFs {
    /// Empty file system containing only `/`
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state.nodes.borrow_mut().insert("/".to_string(), Node::Dir);
        fs
    }

    /// Create a directory and all its parents
    pub fn with_dir(self, path: &str) -> Self {
        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            self.state
                .nodes
                .borrow_mut()
                .entry(current.clone())
                .or_insert(Node::Dir);
        }
        self
    }

    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        let fs = match parent_of(path) {
            Some(parent) => self.with_dir(&parent),
            None => self,
        };
        fs.state
            .nodes
            .borrow_mut()
            .insert(path.to_string(), Node::File(content.to_vec()));
        fs
    }

    pub fn with_link(self, path: &str, target: &str) -> Self {
        let fs = match parent_of(path) {
            Some(parent) => self.with_dir(&parent),
            None => self,
        };
        fs.state
            .nodes
            .borrow_mut()
            .insert(path.to_string(), Node::Link(target.to_string()));
        fs
    }

    /// Make every mutating operation on `path` fail with permission denied
    pub fn failing_on(self, path: &str) -> Self {
        self.state.failing.borrow_mut().insert(path.to_string());
        self
    }

    pub fn node(&self, path: &str) -> Option<Node> {
        self.state.nodes.borrow().get(path).cloned()
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.node(path) {
            Some(Node::File(content)) => Some(content),
            _ => None,
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.nodes.borrow().keys().cloned().collect()
    }

    /// Operation log, e.g. `["list /srv/nodejs/assets", "upload /srv/nodejs/index.html"]`
    pub fn ops(&self) -> Vec<String> {
        self.state.ops.borrow().clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.closed.get()
    }

    fn record(&self, op: &str, path: &RemotePath) {
        self.state
            .ops
            .borrow_mut()
            .push(format!("{} {}", op, path.as_str()));
    }

    fn check_writable(&self, path: &RemotePath) -> FsResult<()> {
        if self.state.failing.borrow().contains(path.as_str()) {
            return Err(FsError::PermissionDenied(path.to_string()));
        }
        Ok(())
    }

    fn require_parent_dir(&self, path: &RemotePath) -> FsResult<()> {
        let parent = path.parent().unwrap_or_else(|| RemotePath::new("/"));
        match self.node(parent.as_str()) {
            Some(Node::Dir) => Ok(()),
            _ => Err(FsError::NotFound(parent.to_string())),
        }
    }

    fn has_children(&self, path: &str) -> bool {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.state
            .nodes
            .borrow()
            .keys()
            .any(|key| key.starts_with(&prefix))
    }

    fn kind(node: &Node) -> EntryKind {
        match node {
            Node::Dir => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
            Node::Link(_) => EntryKind::Symlink,
        }
    }
}

fn parent_of(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    if idx == 0 {
        return None;
    }
    Some(trimmed[..idx].to_string())
}

/// Resolve `target` relative to the directory containing `link`
fn resolve_link(link: &str, target: &str) -> String {
    let parent = if target.starts_with('/') {
        String::new()
    } else {
        parent_of(link).unwrap_or_default()
    };
    let mut parts: Vec<&str> = parent.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

impl RemoteFs for MemoryRemoteFs {
    fn stat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        self.record("stat", path);
        match self.node(path.as_str()) {
            Some(Node::Link(target)) => {
                let resolved = resolve_link(path.as_str(), &target);
                self.node(&resolved)
                    .map(|node| Self::kind(&node))
                    .ok_or_else(|| FsError::NotFound(resolved))
            }
            Some(node) => Ok(Self::kind(&node)),
            None => Err(FsError::NotFound(path.to_string())),
        }
    }

    fn lstat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        self.record("lstat", path);
        self.node(path.as_str())
            .map(|node| Self::kind(&node))
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn list_dir(&self, path: &RemotePath) -> FsResult<Vec<String>> {
        self.record("list", path);
        match self.node(path.as_str()) {
            Some(Node::Dir) => {}
            Some(_) => return Err(FsError::Other(format!("Not a directory: {}", path))),
            None => return Err(FsError::NotFound(path.to_string())),
        }
        let prefix = format!("{}/", path.as_str().trim_end_matches('/'));
        let names = self
            .state
            .nodes
            .borrow()
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn create_dir(&self, path: &RemotePath) -> FsResult<()> {
        self.record("mkdir", path);
        self.check_writable(path)?;
        self.require_parent_dir(path)?;
        if self.node(path.as_str()).is_some() {
            return Err(FsError::Other(format!("File exists: {}", path)));
        }
        self.state
            .nodes
            .borrow_mut()
            .insert(path.to_string(), Node::Dir);
        Ok(())
    }

    fn remove_file(&self, path: &RemotePath) -> FsResult<()> {
        self.record("remove", path);
        self.check_writable(path)?;
        match self.node(path.as_str()) {
            Some(Node::Dir) => Err(FsError::Other(format!("Is a directory: {}", path))),
            Some(_) => {
                self.state.nodes.borrow_mut().remove(path.as_str());
                Ok(())
            }
            None => Err(FsError::NotFound(path.to_string())),
        }
    }

    fn remove_dir(&self, path: &RemotePath) -> FsResult<()> {
        self.record("rmdir", path);
        self.check_writable(path)?;
        match self.node(path.as_str()) {
            Some(Node::Dir) if self.has_children(path.as_str()) => {
                Err(FsError::Other(format!("Directory not empty: {}", path)))
            }
            Some(Node::Dir) => {
                self.state.nodes.borrow_mut().remove(path.as_str());
                Ok(())
            }
            Some(_) => Err(FsError::Other(format!("Not a directory: {}", path))),
            None => Err(FsError::NotFound(path.to_string())),
        }
    }

    fn upload(&self, local: &Path, remote: &RemotePath) -> FsResult<u64> {
        self.record("upload", remote);
        self.check_writable(remote)?;
        self.require_parent_dir(remote)?;
        if let Some(Node::Dir) = self.node(remote.as_str()) {
            return Err(FsError::Other(format!("Is a directory: {}", remote)));
        }
        let content = std::fs::read(local)?;
        let len = content.len() as u64;
        self.state
            .nodes
            .borrow_mut()
            .insert(remote.to_string(), Node::File(content));
        Ok(len)
    }

    fn read_to_string(&self, path: &RemotePath) -> FsResult<String> {
        self.record("read", path);
        match self.node(path.as_str()) {
            Some(Node::File(content)) => Ok(String::from_utf8_lossy(&content).into_owned()),
            Some(_) => Err(FsError::Other(format!("Not a file: {}", path))),
            None => Err(FsError::NotFound(path.to_string())),
        }
    }

    fn symlink(&self, target: &str, link: &RemotePath) -> FsResult<()> {
        self.record("symlink", link);
        self.check_writable(link)?;
        self.require_parent_dir(link)?;
        if self.node(link.as_str()).is_some() {
            return Err(FsError::Other(format!("File exists: {}", link)));
        }
        self.state
            .nodes
            .borrow_mut()
            .insert(link.to_string(), Node::Link(target.to_string()));
        Ok(())
    }

    fn read_link(&self, path: &RemotePath) -> FsResult<PathBuf> {
        self.record("readlink", path);
        match self.node(path.as_str()) {
            Some(Node::Link(target)) => Ok(PathBuf::from(target)),
            Some(_) => Err(FsError::Other(format!("Not a symlink: {}", path))),
            None => Err(FsError::NotFound(path.to_string())),
        }
    }
}

impl RemoteSession for MemoryRemoteFs {
    fn close(&mut self) -> FsResult<()> {
        self.state.closed.set(self.state.closed.get() + 1);
        self.state.ops.borrow_mut().push("close".to_string());
        Ok(())
    }
}

/// Hands out clones of one `MemoryRemoteFs`, or fails to connect
pub struct MemoryConnector {
    pub fs: MemoryRemoteFs,
    pub refuse: bool,
    pub connects: Cell<usize>,
}

impl MemoryConnector {
    pub fn new(fs: MemoryRemoteFs) -> Self {
        Self {
            fs,
            refuse: false,
            connects: Cell::new(0),
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(MemoryRemoteFs::new())
        }
    }
}

impl RemoteConnector for MemoryConnector {
    fn destination(&self) -> String {
        "memory://".to_string()
    }

    fn connect(&self) -> DeployResult<Box<dyn RemoteSession>> {
        self.connects.set(self.connects.get() + 1);
        if self.refuse {
            return Err(DeployError::Connect {
                host: "memory".to_string(),
                port: 22,
                message: "connection refused".to_string(),
            });
        }
        Ok(Box::new(self.fs.clone()))
    }
}

/// Collects every event
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.borrow().clone()
    }

    /// Log messages of one level
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DeployEvent::Log { level: l, message } if *l == level => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn stage_titles(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DeployEvent::StageStarted {
                    number,
                    total,
                    title,
                } => Some(format!("[{}/{}] {}", number, total, title)),
                _ => None,
            })
            .collect()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Command runner answering from a script.
///
/// Rules match on the command line prefix (`"git push"`); unmatched commands
/// succeed with empty output. `None` as a response simulates a spawn failure.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Option<CommandOutput>)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.rules.push((prefix.to_string(), Some(output)));
        self
    }

    pub fn fail_spawn(mut self, prefix: &str) -> Self {
        self.rules.push((prefix.to_string(), None));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn answer(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());

        let rule = self.rules.iter().find(|(prefix, _)| line.starts_with(prefix));
        match rule {
            Some((_, Some(output))) => Ok(output.clone()),
            Some((_, None)) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: not found", program),
            )),
            None => Ok(ok_output("")),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_inherited(
        &self,
        program: &str,
        args: &[String],
        _cwd: &Path,
    ) -> std::io::Result<CommandOutput> {
        self.answer(program, args)
    }

    fn run_captured(
        &self,
        program: &str,
        args: &[String],
        _cwd: &Path,
    ) -> std::io::Result<CommandOutput> {
        self.answer(program, args)
    }
}

pub fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed_output(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        success: false,
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Records requested sleeps instead of sleeping
#[derive(Default)]
pub struct RecordingSleeper {
    calls: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.calls.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.calls.borrow_mut().push(duration);
    }
}

/// Local build output tree from `(relative path, content)` pairs
pub fn local_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn resolve_link_handles_parent_segments() {
    assert_eq!(resolve_link("/srv/public_html/nodejs", "../nodejs"), "/srv/nodejs");
    assert_eq!(resolve_link("/srv/public_html/nodejs", "/abs"), "/abs");
}
