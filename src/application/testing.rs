//! Fake ports shared by the application-layer tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, Sleeper};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone)]
enum Reply {
    Ok(String),
    Fail(String),
}

/// Control plane answering from per-command scripts.
///
/// Each command (args joined by spaces) has a queue of replies; the last
/// reply repeats once the queue is down to one entry. Unscripted commands
/// succeed with empty output.
#[derive(Default)]
pub struct ScriptedPlane {
    scripts: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, command: &str, output: &str) -> Self {
        self.push(command, Reply::Ok(output.to_string()));
        self
    }

    pub fn fail(self, command: &str, output: &str) -> Self {
        self.push(command, Reply::Fail(output.to_string()));
        self
    }

    fn push(&self, command: &str, reply: Reply) {
        self.scripts
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == command).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl ControlPlane for ScriptedPlane {
    fn run(&self, _namespace: &Namespace, args: &[&str]) -> DeployResult<String> {
        let command = args.join(" ");
        self.calls.borrow_mut().push(command.clone());

        let reply = {
            let mut scripts = self.scripts.borrow_mut();
            match scripts.get_mut(&command) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Ok(output)) => Ok(output),
            Some(Reply::Fail(output)) => Err(DeployError::Command {
                args: args.iter().map(|a| a.to_string()).collect(),
                status: "exit status: 1".to_string(),
                output,
            }),
            None => Ok(String::new()),
        }
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn ns(name: &str) -> Namespace {
    Namespace::parse(name).unwrap()
}
