use std::io;
use std::process::{Child, Command, Stdio};
use clap::ValueEnum;
use log::{debug, info, warn};
use thiserror::Error;
use crate::model::CatalogEntry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("command not found: {command}")]
    NotFound { command: String },
    #[error("{0}")]
    OsFailure(String),
}

/// How a catalog command is turned into a process, chosen once per OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LaunchStrategy {
    /// The whole command is the executable path.
    #[value(name = "direct")]
    DirectExecute,
    /// Whitespace-separated program and arguments.
    #[value(name = "split-args")]
    SplitArgsExecute,
    /// Application bundles go through `open`.
    #[value(name = "open-by-name")]
    OpenByNameIndirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchStrategy {
    // Only the Wayland front end builds; other hosts' strategies run via `--launch-strategy`.
    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" => Self::OpenByNameIndirection,
            "windows" => Self::DirectExecute,
            _ => Self::SplitArgsExecute,
        }
    }

    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Returns `None` when there is nothing to execute.
    pub fn invocation(&self, command: &str) -> Option<Invocation> {
        if command.trim().is_empty() {
            return None;
        }

        match self {
            Self::DirectExecute => Some(Invocation {
                program: command.to_string(),
                args: vec![],
            }),
            Self::SplitArgsExecute => split_command(command),
            Self::OpenByNameIndirection => {
                if command.starts_with("open -a") {
                    split_command(command)
                } else {
                    Some(Invocation {
                        program: "open".to_string(),
                        args: vec![command.to_string()],
                    })
                }
            }
        }
    }
}

fn split_command(command: &str) -> Option<Invocation> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some(Invocation {
        program,
        args: parts.collect(),
    })
}

/// The OS process-creation capability.
pub trait ProcessSpawner {
    fn spawn(&mut self, invocation: &Invocation) -> io::Result<()>;
}

/// Spawns detached children with null stdio and never waits on them.
#[derive(Default)]
pub struct SystemSpawner {
    children: Vec<Child>,
}

impl SystemSpawner {
    // Collects children that already exited so they don't linger as zombies.
    fn reap_exited(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Reaped pid {}: {}", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!("Could not poll pid {}: {}", child.id(), err);
                false
            }
        });
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(&mut self, invocation: &Invocation) -> io::Result<()> {
        self.reap_exited();

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut command);

        let child = command.spawn()?;
        debug!("Spawned {} as pid {}", invocation.program, child.id());
        self.children.push(child);
        Ok(())
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn detach(_command: &mut Command) {}

pub struct Launcher {
    strategy: LaunchStrategy,
    spawner: Box<dyn ProcessSpawner>,
}

impl Launcher {
    pub fn new(strategy: LaunchStrategy, spawner: Box<dyn ProcessSpawner>) -> Self {
        debug!("Launcher: using {:?}", strategy);
        Self { strategy, spawner }
    }

    pub fn system(strategy: LaunchStrategy) -> Self {
        Self::new(strategy, Box::new(SystemSpawner::default()))
    }

    pub fn launch(&mut self, entry: &CatalogEntry) -> Result<(), LaunchError> {
        let not_found = || LaunchError::NotFound {
            command: entry.command.clone(),
        };

        let invocation = self.strategy.invocation(&entry.command).ok_or_else(not_found)?;
        info!(
            "Attempting to launch: {} ({} {:?})",
            entry.name, invocation.program, invocation.args
        );

        self.spawner.spawn(&invocation).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => not_found(),
            _ => LaunchError::OsFailure(err.to_string()),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSpawner;
    use super::*;

    fn inv(program: &str, args: &[&str]) -> Option<Invocation> {
        Some(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    #[test]
    fn strategy_follows_host_os() {
        assert_eq!(LaunchStrategy::for_os("macos"), LaunchStrategy::OpenByNameIndirection);
        assert_eq!(LaunchStrategy::for_os("windows"), LaunchStrategy::DirectExecute);
        assert_eq!(LaunchStrategy::for_os("linux"), LaunchStrategy::SplitArgsExecute);
        assert_eq!(LaunchStrategy::for_os("freebsd"), LaunchStrategy::SplitArgsExecute);
    }

    #[test]
    fn direct_execute_keeps_command_whole() {
        let strategy = LaunchStrategy::DirectExecute;

        assert_eq!(
            strategy.invocation(r"C:\Program Files\App\app.exe"),
            inv(r"C:\Program Files\App\app.exe", &[])
        );
    }

    #[test]
    fn split_args_separates_program_and_arguments() {
        let strategy = LaunchStrategy::SplitArgsExecute;

        assert_eq!(strategy.invocation("firefox"), inv("firefox", &[]));
        assert_eq!(
            strategy.invocation("  gnome-terminal   --window  -t x "),
            inv("gnome-terminal", &["--window", "-t", "x"])
        );
    }

    #[test]
    fn open_by_name_passes_through_open_a() {
        let strategy = LaunchStrategy::OpenByNameIndirection;

        assert_eq!(strategy.invocation("open -a Finder"), inv("open", &["-a", "Finder"]));
        assert_eq!(
            strategy.invocation("/Applications/Safari.app"),
            inv("open", &["/Applications/Safari.app"])
        );
    }

    #[test]
    fn blank_command_has_no_invocation() {
        for strategy in [
            LaunchStrategy::DirectExecute,
            LaunchStrategy::SplitArgsExecute,
            LaunchStrategy::OpenByNameIndirection,
        ] {
            assert_eq!(strategy.invocation("   "), None, "{strategy:?}");
        }
    }

    #[test]
    fn launch_hands_invocation_to_spawner() {
        let spawner = RecordingSpawner::default();
        let calls = spawner.calls.clone();
        let mut launcher = Launcher::new(LaunchStrategy::SplitArgsExecute, Box::new(spawner));

        let result = launcher.launch(&CatalogEntry::new("Terminal", "gnome-terminal --window"));

        assert_eq!(result, Ok(()));
        assert_eq!(calls.borrow().as_slice(), [Invocation {
            program: "gnome-terminal".to_string(),
            args: vec!["--window".to_string()],
        }]);
    }

    #[test]
    fn missing_executable_maps_to_not_found() {
        let spawner = RecordingSpawner::failing(io::ErrorKind::NotFound);
        let mut launcher = Launcher::new(LaunchStrategy::SplitArgsExecute, Box::new(spawner));

        let result = launcher.launch(&CatalogEntry::new("Paint", "mspaint.exe"));

        assert_eq!(result, Err(LaunchError::NotFound { command: "mspaint.exe".to_string() }));
    }

    #[test]
    fn other_spawn_errors_carry_message() {
        let spawner = RecordingSpawner::failing(io::ErrorKind::PermissionDenied);
        let mut launcher = Launcher::new(LaunchStrategy::SplitArgsExecute, Box::new(spawner));

        let result = launcher.launch(&CatalogEntry::new("Paint", "mspaint.exe"));

        assert_eq!(result, Err(LaunchError::OsFailure("simulated failure".to_string())));
    }

    #[test]
    fn blank_command_is_not_found_without_spawning() {
        let spawner = RecordingSpawner::default();
        let calls = spawner.calls.clone();
        let mut launcher = Launcher::new(LaunchStrategy::SplitArgsExecute, Box::new(spawner));

        let result = launcher.launch(&CatalogEntry::new("Broken", " "));

        assert!(matches!(result, Err(LaunchError::NotFound { .. })));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn system_spawner_reports_missing_program() {
        let mut launcher = Launcher::system(LaunchStrategy::SplitArgsExecute);

        let result = launcher.launch(&CatalogEntry::new(
            "Ghost",
            "/nonexistent/quick-launcher-test-binary --flag",
        ));

        assert_eq!(result, Err(LaunchError::NotFound {
            command: "/nonexistent/quick-launcher-test-binary --flag".to_string(),
        }));
    }

    #[cfg(unix)]
    #[test]
    fn system_spawner_runs_real_program() {
        let mut spawner = SystemSpawner::default();

        spawner.spawn(&Invocation { program: "true".to_string(), args: vec![] })
            .expect("`true` should be on PATH");

        assert_eq!(spawner.children.len(), 1);
    }
}
