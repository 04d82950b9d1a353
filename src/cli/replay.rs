use anyhow::{anyhow, Context, Result};
use clap::Args;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dock::{
    DialogDock, DialogHandle, DialogId, DialogKind, DockEvent, DockSnapshot, LayoutDirection,
    OpenDialogs, SlotContainer,
};

/// Replay a script of dock operations and print the dock state after each step
#[derive(Args)]
pub struct ReplayCommand {
    /// Script file (YAML or JSON). Use "-" to read from stdin
    pub script: PathBuf,

    /// Container width when the script does not set one
    #[arg(long = "width", default_value_t = 80)]
    pub width: u16,

    /// Container height when the script does not set one
    #[arg(long = "height", default_value_t = 24)]
    pub height: u16,

    /// Pretty-print each step report
    #[arg(short = 'p', long = "pretty")]
    pub pretty: bool,
}

impl ReplayCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing replay command");

        let source = self.read_script().await?;
        let script = ReplayScript::parse(&source)
            .with_context(|| format!("Invalid replay script {}", self.script.display()))?;

        info!("Replaying {} steps", script.steps.len());
        let defaults = ReplayDefaults {
            area: Rect::new(0, 0, self.width, self.height),
            layout_direction: config.layout_direction,
        };

        for report in run_script(&script, defaults) {
            let line = if self.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", line);
        }

        Ok(())
    }

    async fn read_script(&self) -> Result<String> {
        if self.script.as_os_str() == "-" {
            debug!("Reading replay script from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
            return Ok(buffer);
        }

        tokio::fs::read_to_string(&self.script)
            .await
            .with_context(|| format!("Failed to read {}", self.script.display()))
    }
}

/// Container size in a replay script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContainerSize {
    pub width: u16,
    pub height: u16,
}

impl From<ContainerSize> for Rect {
    fn from(size: ContainerSize) -> Self {
        Rect::new(0, 0, size.width, size.height)
    }
}

/// Dialog named by an `add` step: a bare id or a full description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DialogSpec {
    Id(String),
    Full {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        kind: DialogKind,
    },
}

impl DialogSpec {
    fn handle(&self) -> DialogHandle {
        match self {
            Self::Id(id) => DialogHandle::new(id.as_str()),
            Self::Full { id, title, .. } => {
                let handle = DialogHandle::new(id.as_str());
                match title {
                    Some(title) => handle.with_title(title.as_str()),
                    None => handle,
                }
            }
        }
    }

    fn kind(&self) -> DialogKind {
        match self {
            Self::Id(_) => DialogKind::Main,
            Self::Full { kind, .. } => *kind,
        }
    }
}

/// One operation in a replay script
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Open a dockable dialog and dock it
    Add(DialogSpec),
    /// Open a popup dialog
    Popup(String),
    /// Close any open dialog, undocking it if it was docked
    Close(String),
    /// Undock a dialog, or the topmost one when empty
    Remove(Option<String>),
    SideBarWidth(u16),
    Resize(ContainerSize),
    CouldDock,
    CloseRequest,
    Paint,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Popup(_) => "popup",
            Self::Close(_) => "close",
            Self::Remove(_) => "remove",
            Self::SideBarWidth(_) => "side_bar_width",
            Self::Resize(_) => "resize",
            Self::CouldDock => "could_dock",
            Self::CloseRequest => "close_request",
            Self::Paint => "paint",
        }
    }
}

/// A replay script
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub container: Option<ContainerSize>,

    #[serde(default)]
    pub layout_direction: Option<LayoutDirection>,

    #[serde(default)]
    pub side_bar_width: Option<u16>,

    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl ReplayScript {
    /// Parse a YAML script. JSON scripts parse the same way.
    pub fn parse(source: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(source)?;
        if script.steps.is_empty() {
            return Err(anyhow!("Script has no steps"));
        }
        Ok(script)
    }
}

/// Settings used where the script is silent
#[derive(Debug, Clone, Copy)]
pub struct ReplayDefaults {
    pub area: Rect,
    pub layout_direction: LayoutDirection,
}

/// Outcome of one replayed step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    pub result: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<DockEvent>,
    pub snapshot: DockSnapshot,
}

/// Run `script` against a fresh dock
pub fn run_script(script: &ReplayScript, defaults: ReplayDefaults) -> Vec<StepReport> {
    let area = script.container.map(Rect::from).unwrap_or(defaults.area);
    let registry = Rc::new(RefCell::new(OpenDialogs::new()));
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let mut dock = DialogDock::new(Box::new(SlotContainer::new(area)));
    dock.set_registry(registry.clone());
    dock.set_event_sender(sender);
    dock.set_layout_direction(script.layout_direction.unwrap_or(defaults.layout_direction));
    if let Some(width) = script.side_bar_width {
        dock.set_side_bar_width(width);
    }

    script
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let result = apply_step(&mut dock, &registry, step);
            let mut events = Vec::new();
            while let Ok(event) = receiver.try_recv() {
                events.push(event);
            }

            StepReport {
                step: index + 1,
                op: step.name(),
                result,
                events,
                snapshot: dock.snapshot(),
            }
        })
        .collect()
}

fn apply_step(
    dock: &mut DialogDock,
    registry: &RefCell<OpenDialogs>,
    step: &Step,
) -> serde_json::Value {
    use serde_json::{json, Value};

    match step {
        Step::Add(spec) => {
            let handle = spec.handle();
            let kind = spec.kind();
            if !kind.is_dockable() {
                warn!("Dialog {} is a popup and cannot be docked", handle.id());
                registry.borrow_mut().open(handle, kind);
                return json!(false);
            }
            let opened = registry.borrow_mut().open(handle.clone(), kind);
            if !opened {
                let dockable = registry
                    .borrow()
                    .get(handle.id())
                    .map_or(false, |dialog| dialog.kind.is_dockable());
                if !dockable {
                    warn!("Dialog {} is already open as a popup and cannot be docked", handle.id());
                    return json!(false);
                }
            }
            json!(dock.add(handle))
        }
        Step::Popup(id) => {
            let opened = registry
                .borrow_mut()
                .open(DialogHandle::new(id.as_str()), DialogKind::Popup);
            json!(opened)
        }
        Step::Close(id) => {
            let id = DialogId::new(id.as_str());
            let closed = registry.borrow_mut().close(&id).is_some();
            // Closing a dialog always tries to undock it
            dock.remove(Some(&id));
            json!(closed)
        }
        Step::Remove(id) => {
            let id = id.as_deref().map(DialogId::from);
            match dock.remove(id.as_ref()) {
                Some(handle) => json!(handle.id()),
                None => Value::Null,
            }
        }
        Step::SideBarWidth(width) => {
            dock.set_side_bar_width(*width);
            Value::Null
        }
        Step::Resize(size) => {
            dock.handle_resize((*size).into());
            Value::Null
        }
        Step::CouldDock => json!(dock.could_dock()),
        Step::CloseRequest => {
            dock.handle_close_request();
            Value::Null
        }
        Step::Paint => {
            dock.handle_paint();
            Value::Null
        }
    }
}
